//! Health check endpoints

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use storefront_auth::{GUARDED_PATHS, InvalidTokenPolicy};

use crate::state::AppState;

/// Health status, plus how the session layer is configured
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub session: SessionStatus,
}

#[derive(Serialize)]
pub struct SessionStatus {
    pub cookie: String,
    pub invalid_token_policy: InvalidTokenPolicy,
    pub guarded_paths: [&'static str; 3],
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    metrics::counter!("storefront_health_checks_total").increment(1);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        session: SessionStatus {
            cookie: state.verifier.cookie_name().to_string(),
            invalid_token_policy: state.verifier.policy(),
            guarded_paths: GUARDED_PATHS,
        },
    })
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}
