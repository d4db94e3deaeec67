//! Retrieval substrate types: fragments, well indexes, ranked candidates

use serde::{Deserialize, Serialize};

/// Immutable unit of retrievable text extracted from a well document.
///
/// Fragments are produced by an external chunker and never mutated after
/// insertion into a [`crate::retrieval::FragmentStore`]. The embedding is a
/// fixed-length vector; every fragment in a store carries the same dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fragment {
    /// Owning well (e.g. "ADK-01")
    pub well_name: String,
    /// Originating document name (often carries the borehole marker)
    pub source_file: String,
    /// Chunk position within its source document (0-based)
    pub sequence_index: usize,
    /// Total chunks in the source document, for context reconstruction
    pub total_in_document: usize,
    /// Fragment content (bounded length, chunker's concern)
    pub text: String,
    /// Fixed-length embedding vector
    pub embedding: Vec<f32>,
    /// Provenance: text extracted via OCR from an image vs. native text
    #[serde(default)]
    pub is_image_derived: bool,
}

impl Fragment {
    /// Stable identifier: well name + document name + sequence index.
    pub fn id(&self) -> String {
        format!(
            "{}/{}#{}",
            self.well_name, self.source_file, self.sequence_index
        )
    }
}

/// A well's membership in the store plus its derived centroid embedding.
///
/// The centroid is the mean of the well's fragment embeddings, recomputed
/// from the full fragment set whenever fragments are appended to the well,
/// never incrementally updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellIndex {
    pub well_name: String,
    /// Number of fragments currently held for this well
    pub fragment_count: usize,
    /// Number of distinct source documents for this well
    pub document_count: usize,
    /// Mean of the well's fragment embeddings
    pub centroid: Vec<f32>,
}

/// A fragment annotated with a query-time similarity score and rank.
///
/// Ephemeral: produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub fragment: Fragment,
    /// Cosine similarity against the query embedding, in [-1, 1]
    pub similarity: f32,
    /// 1-based rank, descending similarity
    pub rank: usize,
}

/// Provenance restriction applied by the ranker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// No restriction: rank over every fragment
    #[default]
    All,
    /// Only fragments with native (non-OCR) text
    TextOnly,
    /// Only fragments whose text was OCR-extracted from images
    ImagesOnly,
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::All => write!(f, "all"),
            QueryMode::TextOnly => write!(f, "text-only"),
            QueryMode::ImagesOnly => write!(f, "images-only"),
        }
    }
}

/// Fragment counts by provenance, per store or per well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ProvenanceStats {
    pub total_fragments: usize,
    pub image_fragments: usize,
    pub text_fragments: usize,
}

impl ProvenanceStats {
    /// Share of OCR-derived fragments, 0-100.
    pub fn image_percentage(&self) -> f64 {
        if self.total_fragments == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.image_fragments as f64 / self.total_fragments as f64 * 100.0
        }
    }
}
