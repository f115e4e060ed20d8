use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::auth::Authenticator;
use crate::config::ServerConfig;
use crate::database::ProfileStore;
use crate::handlers;

pub const ONBOARDING_PATH: &str = "/api/v1/onboarding";

/// Per-process handler state. Cloned into every request; the store holds
/// the shared connection pool.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub auth: Arc<Authenticator>,
    pub request_timeout: Duration,
    pub max_request_size_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn ProfileStore>, auth: Authenticator, server: &ServerConfig) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
            request_timeout: server.request_timeout(),
            max_request_size_bytes: server.max_request_size_bytes,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.max_request_size_bytes;

    Router::new()
        .route(
            ONBOARDING_PATH,
            post(handlers::onboarding_post)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::fallback)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("POST, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type, Authorization"),
                ))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
