//! API route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{ask, health};
use crate::state::AppState;

/// Create assistant routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rag/health", get(health::health_check))
        .route("/rag/ask", post(ask::ask_handler))
}
