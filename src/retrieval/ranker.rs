//! Cosine-similarity ranking over a store snapshot
//!
//! Pure functions of the embeddings supplied — no I/O, no hidden state.
//! Ordering is strictly descending by similarity with ties broken by
//! insertion order (stable sort), so repeated calls over the same snapshot
//! are deterministic.

use tracing::{debug, warn};

use crate::config::RetrievalConfig;
use crate::types::{QueryMode, RankedCandidate};

use super::store::StoreSnapshot;

/// Guard against division by zero for degenerate (all-zero) embeddings.
const NORM_EPSILON: f32 = 1e-10;

/// Cosine similarity between two equal-length vectors, in [-1, 1].
///
/// `dot(a, b) / ((|a| + eps) · (|b| + eps))` — the epsilon keeps all-zero
/// embeddings at similarity 0 instead of NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / ((norm_a.sqrt() + NORM_EPSILON) * (norm_b.sqrt() + NORM_EPSILON))
}

/// Rank a snapshot's fragments against a query embedding.
///
/// Returns at most `config.top_k` candidates above `config.min_similarity`,
/// highest similarity first, re-ranked 1-based after any provenance filter.
/// The restricted modes ([`QueryMode::TextOnly`], [`QueryMode::ImagesOnly`])
/// over-fetch `overfetch_factor × top_k` before filtering so the final count
/// still reaches `top_k` when enough qualifying fragments exist.
///
/// An empty result is a normal outcome ("no relevant evidence"), never an
/// error. The caller guarantees the query embedding matches the store's
/// dimension; a mismatch is logged and yields an empty result.
pub fn rank(
    query_embedding: &[f32],
    snapshot: &StoreSnapshot,
    mode: QueryMode,
    config: &RetrievalConfig,
) -> Vec<RankedCandidate> {
    if snapshot.fragments.is_empty() || config.top_k == 0 {
        return Vec::new();
    }
    if query_embedding.len() != snapshot.matrix.cols {
        warn!(
            query_dim = query_embedding.len(),
            store_dim = snapshot.matrix.cols,
            "Query embedding dimension does not match store; returning no evidence"
        );
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = (0..snapshot.matrix.rows)
        .map(|i| (i, cosine_similarity(query_embedding, snapshot.matrix.row(i))))
        .collect();

    // Stable sort keeps insertion order among exact ties
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let fetch_limit = match mode {
        QueryMode::All => config.top_k,
        QueryMode::TextOnly | QueryMode::ImagesOnly => {
            config.top_k.saturating_mul(config.overfetch_factor.max(1))
        }
    };

    let candidates: Vec<RankedCandidate> = scored
        .into_iter()
        .filter(|(_, similarity)| *similarity >= config.min_similarity)
        .take(fetch_limit)
        .filter(|(idx, _)| match mode {
            QueryMode::All => true,
            QueryMode::TextOnly => !snapshot.fragments[*idx].is_image_derived,
            QueryMode::ImagesOnly => snapshot.fragments[*idx].is_image_derived,
        })
        .take(config.top_k)
        .enumerate()
        .map(|(pos, (idx, similarity))| RankedCandidate {
            fragment: snapshot.fragments[idx].clone(),
            similarity,
            rank: pos + 1,
        })
        .collect();

    debug!(
        mode = %mode,
        candidates = candidates.len(),
        top_k = config.top_k,
        "Ranked fragments"
    );

    candidates
}
