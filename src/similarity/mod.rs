//! Cosine similarity and top-K retrieval over catalog embeddings.


use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::{CatalogIndex, CatalogItem};

/// Minimum similarity a candidate must reach to be retrieved.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// Maximum candidates returned per retrieval query.
pub const DEFAULT_TOP_K: usize = 2;

/// A scored catalog candidate. Ephemeral: produced per retrieval call,
/// never persisted.
#[derive(Debug, Clone)]
pub struct SimilarityResult {
    /// The matched catalog row.
    pub item: Arc<CatalogItem>,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
}

/// Tunables for one retrieval pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalParams {
    /// Candidates scoring below this are discarded.
    pub threshold: f32,
    /// Maximum number of results to return.
    pub top_k: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCORE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Cosine similarity of two vectors.
///
/// Returns `0.0` when the lengths differ or either vector has zero
/// magnitude, so degenerate inputs rank below any usable threshold.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Scores `query` against every row of `index` and returns the best matches.
///
/// Results are sorted by descending score; equal scores keep catalog order
/// (stable sort). An empty return means no candidate cleared the threshold,
/// which is a valid "no match" outcome rather than an error.
pub fn retrieve(
    query: &[f32],
    index: &CatalogIndex,
    params: &RetrievalParams,
) -> Vec<SimilarityResult> {
    let mut results: Vec<SimilarityResult> = index
        .rows()
        .iter()
        .map(|item| SimilarityResult {
            item: Arc::clone(item),
            score: cosine_similarity(query, &item.embedding),
        })
        .filter(|r| r.score >= params.threshold)
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(params.top_k);

    debug!(
        candidates = index.len(),
        returned = results.len(),
        "Retrieval pass complete"
    );

    results
}
