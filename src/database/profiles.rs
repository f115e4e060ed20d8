use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::OnboardingForm;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile {0} not found")]
    NotFound(Uuid),

    #[error("Failed to encode list field: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence seam for profile rows.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write the onboarding answers onto an existing profile and mark
    /// onboarding as completed. Never creates a row.
    async fn complete_onboarding(
        &self,
        id: Uuid,
        form: &OnboardingForm,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// How the list-valued columns are sent to Postgres. One encoding is chosen
/// at startup and used for all three list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEncoding {
    /// Native `text[]` parameters
    TextArray,
    /// JSON arrays bound as `jsonb`
    JsonText,
}

impl FromStr for ListEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" | "text[]" => Ok(ListEncoding::TextArray),
            "json" | "jsonb" => Ok(ListEncoding::JsonText),
            other => Err(format!("unknown list encoding: {}", other)),
        }
    }
}

impl std::fmt::Display for ListEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListEncoding::TextArray => write!(f, "array"),
            ListEncoding::JsonText => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ListParam {
    TextArray(Vec<String>),
    Json(Value),
}

impl ListEncoding {
    fn encode(&self, items: &[String]) -> Result<ListParam, serde_json::Error> {
        match self {
            ListEncoding::TextArray => Ok(ListParam::TextArray(items.to_vec())),
            ListEncoding::JsonText => Ok(ListParam::Json(serde_json::to_value(items)?)),
        }
    }
}

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

fn bind_list(query: PgQuery<'_>, param: ListParam) -> PgQuery<'_> {
    match param {
        ListParam::TextArray(items) => query.bind(items),
        ListParam::Json(value) => query.bind(Json(value)),
    }
}

const COMPLETE_ONBOARDING_SQL: &str = r#"
    UPDATE public.profiles
    SET display_name = $2,
        user_role = $3,
        preferred_website_language = $4,
        preferred_course_explanation_language = $5,
        preferred_course_material_language = $6,
        major = $7,
        major_level = $8,
        studied_subjects = $9,
        interested_majors = $10,
        hobbies = $11,
        subscribed_to_newsletter = $12,
        receive_quotes = $13,
        bio = $14,
        github_url = $15,
        has_completed_onboarding = TRUE,
        updated_at = $16
    WHERE id = $1
"#;

/// `ProfileStore` backed by the shared Postgres pool
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
    list_encoding: ListEncoding,
}

impl PgProfileStore {
    pub fn new(pool: PgPool, list_encoding: ListEncoding) -> Self {
        Self {
            pool,
            list_encoding,
        }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn complete_onboarding(
        &self,
        id: Uuid,
        form: &OnboardingForm,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // Encode before touching the pool so a failure here never holds a connection
        let studied_subjects = self.list_encoding.encode(&form.studied_subjects)?;
        let interested_majors = self.list_encoding.encode(&form.interested_majors)?;
        let hobbies = self.list_encoding.encode(&form.hobbies)?;

        let mut query = sqlx::query(COMPLETE_ONBOARDING_SQL)
            .bind(id)
            .bind(&form.display_name)
            .bind(&form.user_role)
            .bind(&form.preferred_website_language)
            .bind(&form.preferred_course_explanation_language)
            .bind(&form.preferred_course_material_language)
            .bind(&form.major)
            .bind(&form.major_level);
        query = bind_list(query, studied_subjects);
        query = bind_list(query, interested_majors);
        query = bind_list(query, hobbies);

        let result = query
            .bind(form.subscribed_to_newsletter)
            .bind(form.receive_quotes)
            .bind(&form.bio)
            .bind(&form.github_url)
            .bind(updated_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::debug!(profile_id = %id, "Updated profile row");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::database::manager::health_check(&self.pool).await?;
        Ok(())
    }
}
