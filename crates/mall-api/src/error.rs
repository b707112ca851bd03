//! API error handling
//!
//! Maps the core error taxonomy onto HTTP responses. Each error kind has
//! its own status code; the underlying message is exposed in `detail`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mall_core::AssistError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable message
    pub detail: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    DataSource(String),
    Retrieval(String),
    Generation(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("VALIDATION_ERROR", msg),
            ),
            AppError::DataSource(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("DATA_SOURCE_ERROR", format!("Internal server error: {msg}")),
            ),
            AppError::Retrieval(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("RETRIEVAL_ERROR", format!("Internal server error: {msg}")),
            ),
            AppError::Generation(msg) => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("GENERATION_ERROR", format!("Internal server error: {msg}")),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", format!("Internal server error: {msg}")),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<AssistError> for AppError {
    fn from(err: AssistError) -> Self {
        match err {
            AssistError::Validation(msg) => AppError::Validation(msg),
            AssistError::DataSource(msg) => AppError::DataSource(msg),
            AssistError::Retrieval(msg) => AppError::Retrieval(msg),
            AssistError::Generation(msg) => AppError::Generation(msg),
            AssistError::Config(msg) => AppError::Internal(format!("configuration error: {msg}")),
            AssistError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}
