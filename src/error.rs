// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::database::StoreError;

pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update profile";
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Request failure. Client-side variants carry a descriptive message;
/// `Internal` carries a detail that is logged but never sent.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{message}")]
    Internal {
        message: &'static str,
        profile_id: Option<Uuid>,
        detail: String,
    },
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: &'static str, profile_id: Option<Uuid>, detail: impl Into<String>) -> Self {
        ApiError::Internal {
            message,
            profile_id,
            detail: detail.into(),
        }
    }

    /// Map a store failure for the given profile
    pub fn from_store(profile_id: Uuid, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::not_found("Profile not found"),
            other => ApiError::internal(UPDATE_FAILED_MESSAGE, Some(profile_id), other.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }

    fn log(&self) {
        match self {
            ApiError::Internal {
                profile_id: Some(id),
                detail,
                ..
            } => tracing::error!(profile_id = %id, error = %detail, "Profile update failed"),
            ApiError::Internal { detail, .. } => {
                tracing::error!(error = %detail, "Request failed")
            }
            other => tracing::warn!(
                status = other.status_code().as_u16(),
                error = %other,
                "Request rejected"
            ),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Server misconfiguration, not a caller mistake
            AuthError::MissingSecret => {
                ApiError::internal(UPDATE_FAILED_MESSAGE, None, "JWT secret not configured")
            }
            other => ApiError::unauthenticated(other.to_string()),
        }
    }
}

// Automatic HTTP response conversion for Axum. Every failed request passes
// through here exactly once, so this is where it gets logged.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
