// handlers/mod.rs - HTTP handlers
//
// /api/v1/onboarding  POST + OPTIONS, everything else 405
// /health             GET + OPTIONS
// anything else       OPTIONS 200, otherwise 404

pub mod health;
pub mod onboarding;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

pub use health::health;
pub use onboarding::{method_not_allowed, onboarding_post, preflight};

/// Unknown routes. Pre-flight requests still get a plain 200.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    ApiError::not_found("Not found").into_response()
}
