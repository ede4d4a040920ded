// src/handlers/health.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::db;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Question Generator API" }))
}

/// Readiness probe: 200 when the database answers, 503 otherwise.
pub async fn health(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match db::ping(&pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "database": "error",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
