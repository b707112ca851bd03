//! Retrieval primitives for the mall assistant
//!
//! Provides the three pieces of the per-request retrieval flow:
//! - deterministic recursive text splitting
//! - embedding generation via external APIs (OpenAI, Gemini, Ollama)
//! - an ephemeral in-memory similarity index, rebuilt for every request

pub mod embedding;
pub mod index;
pub mod splitter;

pub use embedding::{
    create_embedding_client, EmbeddingClient, GeminiEmbedding, OllamaEmbedding, OpenAiEmbedding,
};
pub use index::{EphemeralIndex, ScoredChunk};
pub use splitter::{RecursiveSplitter, SplitterConfig};
