use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether object-storage credentials are present.
    pub storage_configured: bool,
    /// Whether an employee database is configured.
    pub db_configured: bool,
    /// Whether the employee database is reachable.
    pub db_healthy: bool,
}

/// GET /health -- returns service and collaborator health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_configured = state.storage.is_some();

    let (db_configured, db_healthy) = match &state.employees {
        Some(store) => (true, store.health_check().await.is_ok()),
        None => (false, false),
    };

    let status = if storage_configured && db_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage_configured,
        db_configured,
        db_healthy,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
