//! Retrieval-and-answer pipeline
//!
//! Implements the linear per-request flow of the mall assistant:
//! fetch facts from the database, split them into chunks, embed the
//! chunks, build an ephemeral similarity index, retrieve the chunks
//! nearest to the query, and ask the LLM for a spoken-style answer
//! grounded in them. Nothing is cached or persisted between requests.

use std::sync::Arc;

use mall_core::{AssistError, FactSource, LlmClient, RagConfig, Result};
use mall_retrieval::{EmbeddingClient, EphemeralIndex, RecursiveSplitter, SplitterConfig};

pub mod llm;

pub use llm::{create_llm_client, GeminiClient, OllamaClient, OpenAiClient};

/// Answer substituted when the model returns nothing usable.
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't find a response.";

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    /// Generated answer text
    pub answer: String,

    /// Chunk texts given to the model, in retrieval order
    pub context: Vec<String>,
}

/// Per-request retrieval-and-answer orchestrator.
///
/// All service handles are injected at construction and shared across
/// requests; the pipeline itself holds no mutable state.
pub struct AskPipeline {
    facts: Arc<dyn FactSource>,
    embedder: Arc<dyn EmbeddingClient>,
    llm: Arc<dyn LlmClient>,
    splitter: RecursiveSplitter,
    config: RagConfig,
}

impl AskPipeline {
    pub fn new(
        facts: Arc<dyn FactSource>,
        embedder: Arc<dyn EmbeddingClient>,
        llm: Arc<dyn LlmClient>,
        config: RagConfig,
    ) -> Self {
        let splitter = RecursiveSplitter::new(SplitterConfig {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        });

        Self {
            facts,
            embedder,
            llm,
            splitter,
            config,
        }
    }

    /// Answer a free-text question about the mall.
    ///
    /// The caller validates that `query` is non-empty; this method assumes
    /// a usable query and tags each stage's failures for the API layer.
    pub async fn ask(&self, query: &str) -> Result<AskOutcome> {
        tracing::info!("ask pipeline started");

        let documents = self.facts.fetch_documents(self.config.fact_limit).await?;
        tracing::debug!("fetched {} fact documents", documents.len());

        if documents.is_empty() {
            return Err(AssistError::Retrieval(
                "the fact query returned no rows; cannot build an index over an empty corpus"
                    .to_string(),
            ));
        }

        let chunks: Vec<String> = documents
            .iter()
            .flat_map(|doc| self.splitter.split(&doc.content))
            .collect();
        tracing::debug!("split into {} chunks", chunks.len());

        let vectors = self.embedder.embed_batch(&chunks).await?;
        let index = EphemeralIndex::build(chunks, vectors)?;

        let query_vector = self.embedder.embed(query).await?;
        let retrieved = index.search(&query_vector, self.config.top_k)?;
        tracing::debug!("retrieved {} chunks", retrieved.len());

        let context: Vec<String> = retrieved.into_iter().map(|c| c.content).collect();
        let prompt = build_prompt(&context, query);

        tracing::info!("calling LLM with prompt length {} chars", prompt.len());
        let answer = self.llm.generate(&prompt).await?;

        let answer = if answer.trim().is_empty() {
            FALLBACK_ANSWER.to_string()
        } else {
            answer
        };

        Ok(AskOutcome { answer, context })
    }
}

/// Build the fixed assistant prompt from retrieved chunks and the query.
fn build_prompt(context: &[String], query: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a friendly virtual assistant that helps customers with \
         mall-related questions such as directions, store timings, and \
         current offers.\n\n",
    );
    prompt.push_str(
        "Use the information below to answer the customer's question. \
         If no relevant information is found, say so politely.\n\n",
    );
    prompt.push_str(
        "Answer in plain, spoken-friendly text. Do not use symbols like \
         '*', '-', or markdown. Present lists as sentences.\n\n",
    );

    prompt.push_str("Context:\n");
    prompt.push_str(&context.join("\n\n"));
    prompt.push_str("\n\nCustomer question:\n");
    prompt.push_str(query);

    prompt
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mall_core::FactDocument;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFacts {
        documents: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl StaticFacts {
        fn new(documents: Vec<&'static str>) -> Self {
            Self {
                documents,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FactSource for StaticFacts {
        async fn fetch_documents(&self, limit: i64) -> mall_core::Result<Vec<FactDocument>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .documents
                .iter()
                .take(limit as usize)
                .map(|d| FactDocument::new(*d))
                .collect())
        }
    }

    /// Deterministic embedder: buckets byte values into a histogram.
    struct HistogramEmbedder;

    fn histogram(text: &str) -> Vec<f32> {
        let mut buckets = vec![1.0f32; 8];
        for byte in text.bytes() {
            buckets[(byte % 8) as usize] += 1.0;
        }
        buckets
    }

    #[async_trait]
    impl EmbeddingClient for HistogramEmbedder {
        async fn embed(&self, text: &str) -> mall_core::Result<Vec<f32>> {
            Ok(histogram(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> mall_core::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| histogram(t)).collect())
        }

        fn dimension(&self) -> usize {
            8
        }
    }

    struct CannedLlm {
        reply: &'static str,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn generate(&self, _prompt: &str) -> mall_core::Result<String> {
            Ok(self.reply.to_string())
        }
    }

    fn pipeline(documents: Vec<&'static str>, reply: &'static str) -> AskPipeline {
        AskPipeline::new(
            Arc::new(StaticFacts::new(documents)),
            Arc::new(HistogramEmbedder),
            Arc::new(CannedLlm { reply }),
            RagConfig::default(),
        )
    }

    const SHOP_A: &str = "Shop A is located on floor 2. It belongs to the 'Electronics' \
                          category. On Monday, it is open from 10:00 to 22:00. \
                          Current offer: 10% off.";

    #[tokio::test]
    async fn test_ask_returns_answer_and_context() {
        let pipeline = pipeline(
            vec![SHOP_A, "Shop B is located on floor 1."],
            "Shop A is open from 10:00 to 22:00 on Monday.",
        );

        let outcome = pipeline
            .ask("What are Shop A's hours on Monday?")
            .await
            .unwrap();

        assert_eq!(
            outcome.answer,
            "Shop A is open from 10:00 to 22:00 on Monday."
        );
        // both documents fit in single chunks; context is bounded by them
        assert!(!outcome.context.is_empty());
        assert!(outcome.context.len() <= 2);
        assert!(outcome
            .context
            .iter()
            .any(|c| c.contains("Shop A") && c.contains("floor 2")));
    }

    #[tokio::test]
    async fn test_ask_with_empty_corpus_is_a_retrieval_error() {
        let pipeline = pipeline(vec![], "unused");
        let err = pipeline.ask("anything").await.unwrap_err();
        assert!(matches!(err, AssistError::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_blank_model_reply_falls_back() {
        let pipeline = pipeline(vec![SHOP_A], "   ");
        let outcome = pipeline.ask("hours?").await.unwrap();
        assert_eq!(outcome.answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_context_is_bounded_by_top_k() {
        let documents = vec![
            "Shop A is on floor 1.",
            "Shop B is on floor 2.",
            "Shop C is on floor 3.",
            "Shop D is on floor 4.",
            "Shop E is on floor 5.",
            "Shop F is on floor 6.",
        ];
        let pipeline = pipeline(documents, "ok");
        let outcome = pipeline.ask("Where is Shop C?").await.unwrap();
        assert_eq!(outcome.context.len(), RagConfig::default().top_k);
    }

    #[test]
    fn test_prompt_contains_context_and_query() {
        let context = vec!["Shop A is located on floor 2.".to_string()];
        let prompt = build_prompt(&context, "Where is Shop A?");

        assert!(prompt.contains("Shop A is located on floor 2."));
        assert!(prompt.contains("Customer question:\nWhere is Shop A?"));
        assert!(prompt.contains("plain, spoken-friendly text"));
    }
}
