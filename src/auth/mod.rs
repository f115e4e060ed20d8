use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Profile id used for every update while authentication is disabled
pub const PLACEHOLDER_PROFILE_ID: Uuid = Uuid::nil();

/// Only the claims this service reads. The issuer adds more; they are ignored.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid subject in token")]
    InvalidSubject,

    #[error("JWT secret not configured")]
    MissingSecret,
}

/// HMAC token verifier bound to the shared secret
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, audience: Option<&str>, leeway_secs: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = leeway_secs;
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify the token and return its subject as a profile id
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        let sub = data.claims.sub;
        if sub.is_empty() {
            return Err(AuthError::InvalidSubject);
        }
        Uuid::parse_str(&sub).map_err(|_| AuthError::InvalidSubject)
    }
}

/// Resolves the profile a request acts on. The mode is fixed at startup.
pub enum Authenticator {
    Jwt(TokenVerifier),
    /// Degraded mode: every request targets `PLACEHOLDER_PROFILE_ID`
    Disabled,
}

impl Authenticator {
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AuthError> {
        if !config.auth_enabled {
            tracing::warn!(
                profile_id = %PLACEHOLDER_PROFILE_ID,
                "Authentication disabled; all updates target the placeholder profile"
            );
            return Ok(Authenticator::Disabled);
        }

        let secret = config.jwt_secret.as_deref().ok_or(AuthError::MissingSecret)?;
        let verifier = TokenVerifier::new(
            secret,
            config.jwt_audience.as_deref(),
            config.jwt_leeway_secs,
        )?;
        Ok(Authenticator::Jwt(verifier))
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        match self {
            Authenticator::Disabled => Ok(PLACEHOLDER_PROFILE_ID),
            Authenticator::Jwt(verifier) => {
                let token = extract_bearer(headers)?;
                verifier.verify(token)
            }
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}
