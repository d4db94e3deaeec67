//! Versioned persistence for the fragment index
//!
//! The whole index is serialized as one JSON bundle: wells, fragments,
//! embedding matrix, and well centroids, stamped with a schema version so
//! load-time validation can detect drift instead of deserializing blindly.
//! Round-tripping a store through save/load reproduces identical ranking
//! results because fragment order and embeddings are preserved exactly.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{Fragment, WellIndex};

use super::store::{EmbeddingMatrix, FragmentStore};

/// Current bundle schema version. Bump on any incompatible layout change.
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Bundle Schema
// ============================================================================

/// Serialized form of a complete fragment store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBundle {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub embedding_dim: usize,
    pub wells: Vec<WellIndex>,
    pub fragments: Vec<Fragment>,
    /// Shape `[fragments.len(), embedding_dim]`
    pub embedding_matrix: EmbeddingMatrix,
    /// well name → centroid vector, duplicated from `wells` for consumers
    /// that only need the map
    pub well_centroids: HashMap<String, Vec<f32>>,
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsupported index schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },
    #[error("corrupt index bundle: {0}")]
    ShapeMismatch(String),
}

// ============================================================================
// Save / Load
// ============================================================================

/// Serialize the store's current snapshot to `path`.
pub fn save_index(store: &FragmentStore, path: &Path) -> Result<(), IndexError> {
    let snapshot = store.snapshot();

    let well_centroids = snapshot
        .wells
        .iter()
        .map(|w| (w.well_name.clone(), w.centroid.clone()))
        .collect();

    let bundle = IndexBundle {
        schema_version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        embedding_dim: store.embedding_dim(),
        wells: snapshot.wells.clone(),
        fragments: snapshot.fragments.clone(),
        embedding_matrix: snapshot.matrix.clone(),
        well_centroids,
    };

    let bytes = serde_json::to_vec(&bundle)?;
    std::fs::write(path, &bytes)?;

    info!(
        path = %path.display(),
        wells = bundle.wells.len(),
        fragments = bundle.fragments.len(),
        size_bytes = bytes.len(),
        "Saved index bundle"
    );
    Ok(())
}

/// Load a store from a bundle written by [`save_index`].
///
/// Validates the schema version and every shape constraint before
/// reconstructing the store, so a truncated or drifted bundle fails loudly
/// rather than producing a store that ranks incorrectly.
pub fn load_index(path: &Path) -> Result<FragmentStore, IndexError> {
    let bytes = std::fs::read(path)?;
    let bundle: IndexBundle = serde_json::from_slice(&bytes)?;

    if bundle.schema_version != SCHEMA_VERSION {
        return Err(IndexError::SchemaVersion {
            found: bundle.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let matrix = &bundle.embedding_matrix;
    if matrix.cols != bundle.embedding_dim {
        return Err(IndexError::ShapeMismatch(format!(
            "matrix has {} columns, bundle declares embedding_dim {}",
            matrix.cols, bundle.embedding_dim
        )));
    }
    if matrix.rows != bundle.fragments.len() {
        return Err(IndexError::ShapeMismatch(format!(
            "matrix has {} rows, bundle holds {} fragments",
            matrix.rows,
            bundle.fragments.len()
        )));
    }
    if matrix.data.len() != matrix.rows * matrix.cols {
        return Err(IndexError::ShapeMismatch(format!(
            "matrix data length {} does not equal rows × cols = {}",
            matrix.data.len(),
            matrix.rows * matrix.cols
        )));
    }
    for fragment in &bundle.fragments {
        if fragment.embedding.len() != bundle.embedding_dim {
            return Err(IndexError::ShapeMismatch(format!(
                "fragment {} has embedding length {}, expected {}",
                fragment.id(),
                fragment.embedding.len(),
                bundle.embedding_dim
            )));
        }
    }
    for well in &bundle.wells {
        if well.centroid.len() != bundle.embedding_dim {
            return Err(IndexError::ShapeMismatch(format!(
                "well '{}' centroid length {} does not match embedding_dim {}",
                well.well_name,
                well.centroid.len(),
                bundle.embedding_dim
            )));
        }
    }

    info!(
        path = %path.display(),
        wells = bundle.wells.len(),
        fragments = bundle.fragments.len(),
        "Loaded index bundle"
    );

    Ok(FragmentStore::from_parts(
        bundle.embedding_dim,
        bundle.fragments,
        bundle.embedding_matrix,
        bundle.wells,
    ))
}
