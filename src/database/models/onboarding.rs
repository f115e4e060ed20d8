use serde::{Deserialize, Deserializer};

/// Onboarding answers as submitted by the frontend form.
///
/// Every field is optional. A missing field or a JSON `null` becomes the
/// empty value for its type, and that empty value is what gets written.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OnboardingForm {
    #[serde(rename = "displayName", deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(rename = "userRole", deserialize_with = "nullable")]
    pub user_role: String,
    #[serde(deserialize_with = "nullable")]
    pub preferred_website_language: String,
    #[serde(deserialize_with = "nullable")]
    pub preferred_course_explanation_language: String,
    #[serde(deserialize_with = "nullable")]
    pub preferred_course_material_language: String,
    #[serde(deserialize_with = "nullable")]
    pub major: String,
    #[serde(deserialize_with = "nullable")]
    pub major_level: String,
    #[serde(deserialize_with = "nullable")]
    pub studied_subjects: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub interested_majors: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub hobbies: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub subscribed_to_newsletter: bool,
    #[serde(deserialize_with = "nullable")]
    pub receive_quotes: bool,
    #[serde(deserialize_with = "nullable")]
    pub bio: String,
    #[serde(deserialize_with = "nullable")]
    pub github_url: String,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
