//! Append-only fragment store with copy-on-write snapshots
//!
//! Fragments are ingested in bulk batches keyed by well and never mutated
//! afterwards. Each append builds a complete successor snapshot (fragments,
//! flattened embedding matrix, well indexes with freshly recomputed
//! centroids) off to the side and publishes it atomically through
//! `arc_swap::ArcSwap`. A concurrent reader therefore sees either the
//! pre-append or the post-append state, never a partially written matrix.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{Fragment, ProvenanceStats, WellIndex};

// ============================================================================
// Embedding Matrix
// ============================================================================

/// Row-major flattened embedding matrix of shape `[rows, cols]`.
///
/// Row `i` is the embedding of fragment `i` in the owning snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl EmbeddingMatrix {
    /// Empty matrix with a fixed column count.
    pub const fn empty(cols: usize) -> Self {
        Self { rows: 0, cols, data: Vec::new() }
    }

    /// Borrow row `i`. Panics only on an out-of-range index, which would be
    /// a snapshot-construction bug.
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }
}

// ============================================================================
// Store Snapshot
// ============================================================================

/// One immutable published state of the store.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// All fragments in insertion order, across all wells
    pub fragments: Vec<Fragment>,
    /// Flattened embeddings, row `i` belonging to `fragments[i]`
    pub matrix: EmbeddingMatrix,
    /// Per-well membership and centroids, in first-ingestion order
    pub wells: Vec<WellIndex>,
}

impl StoreSnapshot {
    fn empty(embedding_dim: usize) -> Self {
        Self {
            fragments: Vec::new(),
            matrix: EmbeddingMatrix::empty(embedding_dim),
            wells: Vec::new(),
        }
    }

    /// Centroid embedding for a well, if the well is present.
    pub fn well_centroid(&self, well_name: &str) -> Option<&[f32]> {
        self.wells
            .iter()
            .find(|w| w.well_name == well_name)
            .map(|w| w.centroid.as_slice())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Ingestion errors. Structural problems only — an empty search result is
/// never an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("embedding dimension mismatch for {fragment_id}: expected {expected}, got {actual}")]
    DimensionMismatch {
        fragment_id: String,
        expected: usize,
        actual: usize,
    },
    #[error("fragment {fragment_id} belongs to well '{fragment_well}', batch is keyed by well '{batch_well}'")]
    WellMismatch {
        fragment_id: String,
        fragment_well: String,
        batch_well: String,
    },
}

// ============================================================================
// Fragment Store
// ============================================================================

/// Append-only store of well documentation fragments.
///
/// Readers call [`FragmentStore::snapshot`] and rank against the returned
/// state without further coordination; writers serialize through an internal
/// append lock and publish complete successor snapshots.
#[derive(Debug)]
pub struct FragmentStore {
    embedding_dim: usize,
    snapshot: ArcSwap<StoreSnapshot>,
    /// Serializes appends; readers never take this
    append_lock: Mutex<()>,
}

impl FragmentStore {
    /// Create an empty store with a fixed embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            embedding_dim,
            snapshot: ArcSwap::from_pointee(StoreSnapshot::empty(embedding_dim)),
            append_lock: Mutex::new(()),
        }
    }

    /// Rebuild a store from previously persisted parts.
    ///
    /// Used by [`crate::retrieval::persistence::load_index`]; the caller has
    /// already validated matrix shape against the fragment list.
    pub(crate) fn from_parts(
        embedding_dim: usize,
        fragments: Vec<Fragment>,
        matrix: EmbeddingMatrix,
        wells: Vec<WellIndex>,
    ) -> Self {
        Self {
            embedding_dim,
            snapshot: ArcSwap::from_pointee(StoreSnapshot { fragments, matrix, wells }),
            append_lock: Mutex::new(()),
        }
    }

    /// Embedding dimension shared by every fragment in this store.
    pub const fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Current published state. The returned snapshot stays valid (and
    /// internally consistent) even if an append lands afterwards.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshot.load_full()
    }

    /// Append a bulk batch of fragments for one well.
    ///
    /// Validates embedding dimensions and well ownership, recomputes the
    /// well's centroid from its full fragment set, and atomically publishes
    /// the successor snapshot. Returns the number of fragments appended.
    pub fn add_well_fragments(
        &self,
        well_name: &str,
        batch: Vec<Fragment>,
    ) -> Result<usize, StoreError> {
        if batch.is_empty() {
            warn!(well = well_name, "Ignoring empty fragment batch");
            return Ok(0);
        }

        for fragment in &batch {
            if fragment.embedding.len() != self.embedding_dim {
                return Err(StoreError::DimensionMismatch {
                    fragment_id: fragment.id(),
                    expected: self.embedding_dim,
                    actual: fragment.embedding.len(),
                });
            }
            if fragment.well_name != well_name {
                return Err(StoreError::WellMismatch {
                    fragment_id: fragment.id(),
                    fragment_well: fragment.well_name.clone(),
                    batch_well: well_name.to_string(),
                });
            }
        }

        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.snapshot.load_full();
        let mut fragments = current.fragments.clone();
        let mut data = current.matrix.data.clone();
        let batch_len = batch.len();

        for fragment in batch {
            data.extend_from_slice(&fragment.embedding);
            fragments.push(fragment);
        }

        let matrix = EmbeddingMatrix {
            rows: fragments.len(),
            cols: self.embedding_dim,
            data,
        };
        let wells = rebuild_well_indexes(&fragments, self.embedding_dim);

        let next = StoreSnapshot { fragments, matrix, wells };
        info!(
            well = well_name,
            appended = batch_len,
            total_fragments = next.fragments.len(),
            total_wells = next.wells.len(),
            "Fragment store updated"
        );
        self.snapshot.store(Arc::new(next));

        Ok(batch_len)
    }

    /// Total fragments in the current snapshot.
    pub fn fragment_count(&self) -> usize {
        self.snapshot.load().fragments.len()
    }

    /// Number of wells in the current snapshot.
    pub fn well_count(&self) -> usize {
        self.snapshot.load().wells.len()
    }

    /// Fragment counts by provenance across the whole store.
    pub fn provenance_stats(&self) -> ProvenanceStats {
        let snapshot = self.snapshot.load();
        let image_fragments = snapshot
            .fragments
            .iter()
            .filter(|f| f.is_image_derived)
            .count();
        ProvenanceStats {
            total_fragments: snapshot.fragments.len(),
            image_fragments,
            text_fragments: snapshot.fragments.len() - image_fragments,
        }
    }
}

/// Recompute every well index from the full fragment list.
///
/// Centroids are always derived from the complete per-well fragment set —
/// the incremental path does not exist on purpose.
fn rebuild_well_indexes(fragments: &[Fragment], embedding_dim: usize) -> Vec<WellIndex> {
    let mut wells: Vec<WellIndex> = Vec::new();

    for fragment in fragments {
        if !wells.iter().any(|w| w.well_name == fragment.well_name) {
            wells.push(WellIndex {
                well_name: fragment.well_name.clone(),
                fragment_count: 0,
                document_count: 0,
                centroid: vec![0.0; embedding_dim],
            });
        }
    }

    for well in &mut wells {
        let members: Vec<&Fragment> = fragments
            .iter()
            .filter(|f| f.well_name == well.well_name)
            .collect();

        well.fragment_count = members.len();
        well.document_count = {
            let mut files: Vec<&str> = members.iter().map(|f| f.source_file.as_str()).collect();
            files.sort_unstable();
            files.dedup();
            files.len()
        };

        // f64 accumulation keeps the mean stable for large wells
        let mut sums = vec![0.0f64; embedding_dim];
        for fragment in &members {
            for (sum, value) in sums.iter_mut().zip(&fragment.embedding) {
                *sum += f64::from(*value);
            }
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let centroid: Vec<f32> = sums
            .iter()
            .map(|s| (*s / members.len() as f64) as f32)
            .collect();
        well.centroid = centroid;
    }

    wells
}
