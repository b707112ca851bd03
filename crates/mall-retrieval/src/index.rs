//! Ephemeral in-memory similarity index
//!
//! Built fresh from the current request's chunks and discarded when the
//! request ends; nothing survives a restart or is shared across requests.
//! Vectors are L2-normalized at build time so search reduces to an inner
//! product (cosine similarity).

use mall_core::{AssistError, Result};

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
}

#[derive(Debug)]
struct IndexEntry {
    content: String,
    vector: Vec<f32>,
}

/// Per-request nearest-neighbor index over embedded chunks.
#[derive(Debug)]
pub struct EphemeralIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl EphemeralIndex {
    /// Build an index from parallel chunk/vector lists.
    pub fn build(chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(AssistError::Retrieval(
                "cannot build an index over an empty corpus".to_string(),
            ));
        }
        if chunks.len() != vectors.len() {
            return Err(AssistError::Retrieval(format!(
                "chunk/vector count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(AssistError::Retrieval(
                "embedding dimension is zero".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (content, mut vector) in chunks.into_iter().zip(vectors) {
            if vector.len() != dimension {
                return Err(AssistError::Retrieval(format!(
                    "inconsistent embedding dimensions: expected {dimension}, got {}",
                    vector.len()
                )));
            }
            if !l2_normalize(&mut vector) {
                return Err(AssistError::Retrieval(
                    "zero-magnitude chunk embedding".to_string(),
                ));
            }
            entries.push(IndexEntry { content, vector });
        }

        Ok(Self { dimension, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the `k` chunks nearest to `query`, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimension {
            return Err(AssistError::Retrieval(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut normalized = query.to_vec();
        if !l2_normalize(&mut normalized) {
            return Err(AssistError::Retrieval(
                "zero-magnitude query embedding".to_string(),
            ));
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                content: entry.content.clone(),
                score: dot(&entry.vector, &normalized),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }
}

/// Normalize in place; returns false for a zero-magnitude vector.
fn l2_normalize(vector: &mut [f32]) -> bool {
    let norm = dot(vector, vector).sqrt();
    if norm <= f32::EPSILON {
        return false;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
    true
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> EphemeralIndex {
        EphemeralIndex::build(
            vec![
                "about hours".to_string(),
                "about offers".to_string(),
                "about floors".to_string(),
            ],
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_search_returns_nearest_first() {
        let index = sample_index();
        let results = index.search(&[0.9, 0.1, 0.0], 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "about hours");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_search_scores_are_cosine() {
        let index = EphemeralIndex::build(
            vec!["a".to_string()],
            // magnitude is irrelevant after normalization
            vec![vec![3.0, 0.0]],
        )
        .unwrap();

        let results = index.search(&[7.0, 0.0], 1).unwrap();
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_k_larger_than_corpus_returns_everything() {
        let index = sample_index();
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 10).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let err = EphemeralIndex::build(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, AssistError::Retrieval(_)));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let index = sample_index();
        assert!(index.search(&[1.0, 0.0], 1).is_err());

        let err = EphemeralIndex::build(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, AssistError::Retrieval(_)));
    }

    #[test]
    fn test_zero_vector_is_an_error() {
        let err =
            EphemeralIndex::build(vec!["a".to_string()], vec![vec![0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, AssistError::Retrieval(_)));
    }
}
