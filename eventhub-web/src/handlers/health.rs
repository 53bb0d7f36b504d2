//! Liveness endpoint

use super::types::HealthResponse;
use crate::AppState;
use axum::{extract::State, response::Json};

/// Report liveness and the active credential scheme
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        credential_scheme: state.config.auth.credential_scheme.to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
