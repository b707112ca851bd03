//! Mall assistant core - domain types, errors, configuration, fact retrieval
//!
//! This crate defines the shared abstractions used throughout the service:
//! - Error taxonomy for the request pipeline
//! - The `FactDocument` retrieval unit
//! - Configuration management
//! - The PostgreSQL fact store
//! - The `LlmClient` trait implemented by the rag crate

pub mod config;
pub mod facts;

pub use config::{AppConfig, ConfigError, DatabaseConfig, LlmConfig, LlmProvider, RagConfig};
pub use facts::{FactSource, FactStore};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Error taxonomy for the assistant pipeline.
///
/// Each stage of the request flow tags its failures so the API layer can
/// map them to distinct status codes instead of a single catch-all.
#[derive(Error, Debug)]
pub enum AssistError {
    /// The request itself is malformed (empty query).
    #[error("{0}")]
    Validation(String),

    /// The relational database could not be reached or queried.
    #[error("data source error: {0}")]
    DataSource(String),

    /// Embedding or similarity-index failure.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// The language model failed to produce a completion.
    #[error("generation error: {0}")]
    Generation(String),

    /// Startup-time configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AssistError>;

// ============================================================================
// Domain Types
// ============================================================================

/// A unit of retrievable mall knowledge.
///
/// Synthesized per request from one row of the shop/hours/promotion/
/// directory join. Carries no identity beyond its text and lives only for
/// the duration of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactDocument {
    pub content: String,
}

impl FactDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for LLM completion clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_document_construction() {
        let doc = FactDocument::new("Shop A is located on floor 2.");
        assert_eq!(doc.content, "Shop A is located on floor 2.");
    }

    #[test]
    fn test_error_display_keeps_underlying_message() {
        let err = AssistError::DataSource("connection refused".to_string());
        assert_eq!(err.to_string(), "data source error: connection refused");

        let err = AssistError::Validation("Query cannot be empty.".to_string());
        assert_eq!(err.to_string(), "Query cannot be empty.");
    }
}
