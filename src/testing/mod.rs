//! Test doubles for the profile store and token helpers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::OnboardingForm;
use crate::database::{ProfileStore, StoreError};

pub const SECRET: &str = "test-shared-secret";
pub const SUBJECT: &str = "11111111-1111-1111-1111-111111111111";

/// HS256 token over arbitrary claims
pub fn sign_token(secret: &str, claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("token encodes")
}

/// In-memory copy of a `profiles` row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredProfile {
    pub display_name: String,
    pub user_role: String,
    pub preferred_website_language: String,
    pub preferred_course_explanation_language: String,
    pub preferred_course_material_language: String,
    pub major: String,
    pub major_level: String,
    pub studied_subjects: Vec<String>,
    pub interested_majors: Vec<String>,
    pub hobbies: Vec<String>,
    pub subscribed_to_newsletter: bool,
    pub receive_quotes: bool,
    pub bio: String,
    pub github_url: String,
    pub has_completed_onboarding: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredProfile {
    pub fn without_timestamp(&self) -> Self {
        Self {
            updated_at: None,
            ..self.clone()
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<Mutex<HashMap<Uuid, StoredProfile>>>,
    updates: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn with_profile(id: &str) -> Self {
        let store = Self::default();
        store
            .profiles
            .lock()
            .unwrap()
            .insert(Uuid::parse_str(id).unwrap(), StoredProfile::default());
        store
    }

    pub fn profile(&self, id: &str) -> Option<StoredProfile> {
        let id = Uuid::parse_str(id).unwrap();
        self.profiles.lock().unwrap().get(&id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn complete_onboarding(
        &self,
        id: Uuid,
        form: &OnboardingForm,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        let row = profiles.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *row = StoredProfile {
            display_name: form.display_name.clone(),
            user_role: form.user_role.clone(),
            preferred_website_language: form.preferred_website_language.clone(),
            preferred_course_explanation_language: form.preferred_course_explanation_language.clone(),
            preferred_course_material_language: form.preferred_course_material_language.clone(),
            major: form.major.clone(),
            major_level: form.major_level.clone(),
            studied_subjects: form.studied_subjects.clone(),
            interested_majors: form.interested_majors.clone(),
            hobbies: form.hobbies.clone(),
            subscribed_to_newsletter: form.subscribed_to_newsletter,
            receive_quotes: form.receive_quotes,
            bio: form.bio.clone(),
            github_url: form.github_url.clone(),
            has_completed_onboarding: true,
            updated_at: Some(updated_at),
        };
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Fails the test if the request ever reaches persistence
pub struct UntouchableStore;

#[async_trait]
impl ProfileStore for UntouchableStore {
    async fn complete_onboarding(
        &self,
        id: Uuid,
        _form: &OnboardingForm,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        panic!("store must not be touched (update for {})", id);
    }

    async fn ping(&self) -> Result<(), StoreError> {
        panic!("store must not be touched (ping)");
    }
}

/// Every call fails as if the database were unreachable
pub struct FailingStore;

#[async_trait]
impl ProfileStore for FailingStore {
    async fn complete_onboarding(
        &self,
        _id: Uuid,
        _form: &OnboardingForm,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub struct SlowStore(pub Duration);

#[async_trait]
impl ProfileStore for SlowStore {
    async fn complete_onboarding(
        &self,
        _id: Uuid,
        _form: &OnboardingForm,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
