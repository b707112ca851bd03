//! Mall assistant HTTP server
//!
//! Provides the `/rag/health` and `/rag/ask` endpoints plus generated
//! OpenAPI documentation.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mall Assistant Backend",
        description = "API for the mall AI assistant: retrieval-augmented \
                       answers about store locations, hours, and promotions.",
        version = "1.0.0",
        license(name = "MIT License")
    ),
    paths(handlers::health::health_check, handlers::ask::ask_handler),
    components(schemas(
        handlers::health::HealthResponse,
        handlers::ask::AskRequest,
        handlers::ask::AskResponse,
        error::ApiError,
    )),
    tags(
        (name = "assistant", description = "Retrieval-augmented assistant endpoints"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Build the application router with CORS and request tracing layers.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
