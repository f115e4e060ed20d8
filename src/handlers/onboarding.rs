// handlers/onboarding.rs - POST/OPTIONS /api/v1/onboarding

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::OnboardingForm;
use crate::error::{ApiError, TIMEOUT_MESSAGE};
use crate::server::AppState;

pub const SUCCESS_MESSAGE: &str = "Profile updated successfully";

/**
 * POST /api/v1/onboarding - Save onboarding answers for the caller's profile
 *
 * The profile id comes from the bearer token subject (or the placeholder id
 * when authentication is disabled). The profile row must already exist.
 *
 * Success: 200 `{"message": "Profile updated successfully"}`
 * Failure: `{"error": "..."}` with 400, 401, 404 or 500
 */
pub async fn onboarding_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let budget = state.request_timeout;
    let deadline = tokio::time::Instant::now() + budget;

    let profile_id = state.auth.authenticate(&headers)?;

    tokio::time::timeout_at(deadline, submit(&state, profile_id, body))
        .await
        .map_err(|_| {
            ApiError::internal(
                TIMEOUT_MESSAGE,
                Some(profile_id),
                format!("onboarding request exceeded {}ms deadline", budget.as_millis()),
            )
        })?
}

async fn submit(
    state: &AppState,
    profile_id: Uuid,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = body.map_err(|e| ApiError::invalid_request(format!("Invalid request body: {}", e.body_text())))?;
    let form: OnboardingForm = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_request(format!("Invalid request body: {}", e)))?;

    state
        .store
        .complete_onboarding(profile_id, &form, Utc::now())
        .await
        .map_err(|e| ApiError::from_store(profile_id, e))?;

    tracing::info!(profile_id = %profile_id, "Successfully updated profile");
    Ok(Json(json!({ "message": SUCCESS_MESSAGE })))
}

/// OPTIONS - pre-flight on any route; CORS headers are added by the router layer
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
