//! Health check handler

use axum::{response::IntoResponse, Json};
use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,

    /// Today's calendar date, ISO-8601
    #[schema(example = "2025-06-02")]
    pub date: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/rag/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        date: Local::now().date_naive().to_string(),
    })
}
