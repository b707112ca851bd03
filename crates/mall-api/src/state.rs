//! Application state management
//!
//! All service handles (fact store, embedding client, LLM client) are
//! constructed once at startup and injected here; handlers receive them
//! through the shared state rather than through globals.

use std::sync::Arc;

use mall_core::config::AppConfig;
use mall_core::{FactStore, LlmClient, Result};
use mall_rag::{create_llm_client, AskPipeline};
use mall_retrieval::{create_embedding_client, EmbeddingClient};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Retrieval-and-answer pipeline
    pub pipeline: Arc<AskPipeline>,
}

impl AppState {
    /// Construct all service handles from configuration.
    pub fn initialize(config: AppConfig) -> Result<Self> {
        let facts = Arc::new(FactStore::new(config.database.url.clone()));
        let embedder: Arc<dyn EmbeddingClient> = Arc::from(create_embedding_client(&config.llm)?);
        let llm: Arc<dyn LlmClient> = Arc::from(create_llm_client(&config.llm)?);

        let pipeline = Arc::new(AskPipeline::new(facts, embedder, llm, config.rag.clone()));

        Ok(Self { config, pipeline })
    }

    /// State around an externally supplied pipeline (used by tests).
    pub fn with_pipeline(config: AppConfig, pipeline: Arc<AskPipeline>) -> Self {
        Self { config, pipeline }
    }
}
