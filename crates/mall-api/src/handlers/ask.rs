//! Ask-assistant handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Ask request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    /// Free-text question about the mall
    #[schema(example = "What are Shop A's hours on Monday?")]
    pub query: String,
}

/// Ask response body
#[derive(Debug, Serialize, ToSchema)]
pub struct AskResponse {
    /// Generated answer
    pub answer: String,

    /// Chunk texts given to the model, in retrieval order
    pub context: Vec<String>,
}

/// Handle assistant queries
#[utoipa::path(
    post,
    path = "/rag/ask",
    tag = "assistant",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer generated", body = AskResponse),
        (status = 400, description = "Empty query", body = crate::error::ApiError),
        (status = 500, description = "Data source or retrieval failure", body = crate::error::ApiError),
        (status = 502, description = "Model failure", body = crate::error::ApiError)
    )
)]
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query cannot be empty.".to_string()));
    }

    let outcome = state.pipeline.ask(query).await?;

    Ok((
        StatusCode::OK,
        Json(AskResponse {
            answer: outcome.answer,
            context: outcome.context,
        }),
    ))
}
