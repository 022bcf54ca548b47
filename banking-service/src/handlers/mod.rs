pub mod auth;
pub mod dashboard;
pub mod payments;
pub mod verification;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "banking-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
