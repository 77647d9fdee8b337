//! Vector similarity ranking.
//!
//! Pure-Rust implementations of:
//! - Cosine similarity
//! - Threshold, rank, limit and token-budget selection of embedded chunks

use selene_config::RetrievalConfig;
use selene_core::{EmbeddedChunk, ScoredChunk};
use serde::{Deserialize, Serialize};

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if the vectors are empty, differ in length, or either has a
/// zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Query-time ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalParams {
    pub limit: usize,
    pub min_similarity: f32,
    pub token_budget: Option<usize>,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        RetrievalConfig::default().into()
    }
}

impl From<&RetrievalConfig> for RetrievalParams {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            limit: config.limit,
            min_similarity: config.min_similarity,
            token_budget: config.token_budget,
        }
    }
}

impl From<RetrievalConfig> for RetrievalParams {
    fn from(config: RetrievalConfig) -> Self {
        Self::from(&config)
    }
}

/// Rank candidates by cosine similarity to a query embedding.
///
/// Candidates below `min_similarity` (or scoring NaN) are dropped first. The
/// rest are sorted by descending similarity, where ties keep input order,
/// and truncated to `limit`. With a `token_budget`, the longest prefix
/// whose summed `estimated_tokens` stays within the budget is returned; a
/// chunk that does not fit ends the selection even if a later one would.
pub fn retrieve_top(
    query: &[f32],
    candidates: &[EmbeddedChunk],
    limit: usize,
    min_similarity: f32,
    token_budget: Option<usize>,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = candidates
        .iter()
        .filter_map(|candidate| {
            let similarity = cosine_similarity(query, &candidate.embedding);
            if similarity.is_nan() || similarity < min_similarity {
                return None;
            }
            Some(ScoredChunk {
                chunk: candidate.chunk.clone(),
                similarity,
            })
        })
        .collect();

    let dropped = candidates.len() - scored.len();
    if dropped > 0 {
        tracing::debug!(dropped, min_similarity, "Candidates below similarity threshold");
    }

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);

    let Some(budget) = token_budget else {
        return scored;
    };

    let mut used = 0usize;
    let kept: Vec<ScoredChunk> = scored
        .into_iter()
        .take_while(|s| {
            let next = used.saturating_add(s.chunk.estimated_tokens);
            if next > budget {
                return false;
            }
            used = next;
            true
        })
        .collect();

    tracing::debug!(kept = kept.len(), used, budget, "Applied retrieval token budget");
    kept
}

/// [`retrieve_top`] with parameters taken from a [`RetrievalParams`].
pub fn retrieve(
    query: &[f32],
    candidates: &[EmbeddedChunk],
    params: &RetrievalParams,
) -> Vec<ScoredChunk> {
    retrieve_top(
        query,
        candidates,
        params.limit,
        params.min_similarity,
        params.token_budget,
    )
}
