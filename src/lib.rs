//! WellQuery: Petroleum Well Documentation Query Core
//!
//! Answers natural-language questions over petroleum well documentation by
//! retrieving relevant text fragments, resolving which physical wellbore the
//! evidence belongs to, and optionally running a production-capacity
//! calculation.
//!
//! ## Architecture
//!
//! - **Retrieval**: append-only fragment store + cosine-similarity ranker
//! - **Borehole Resolution**: collapses mixed evidence to the single most
//!   recently drilled wellbore (S2 > S1 > Main Hole)
//! - **Nodal Analysis**: intersects lift (VLP) and inflow (IPR) curves to
//!   find the well's natural operating point
//! - **Pipeline**: embed → rank → resolve → optional solve
//!
//! File handling, OCR, embedding inference, and answer generation are
//! external collaborators behind the [`pipeline::EmbeddingProvider`] trait
//! and the structured [`pipeline::QueryOutcome`] boundary.

pub mod borehole;
pub mod config;
pub mod nodal;
pub mod pipeline;
pub mod retrieval;
pub mod types;

// Re-export configuration
pub use config::{NodalConfig, QueryConfig, RetrievalConfig, SweepConfig};

// Re-export commonly used types
pub use types::{
    BoreholeSummary, BoreholeTag, Fragment, OperatingPoint, ProductionOutcome, ProvenanceStats,
    PumpCurve, QueryMode, RankedCandidate, ResolvedCandidate, SolveOutcome, SurveyStation,
    WellIndex, WellPhysicalModel,
};

// Re-export retrieval components
pub use retrieval::{load_index, save_index, FragmentStore, IndexBundle, IndexError, StoreError};

// Re-export nodal analysis entry points
pub use nodal::{solve, ValidationError};

// Re-export the pipeline
pub use pipeline::{
    EmbeddingError, EmbeddingProvider, FragmentDraft, QueryEngine, QueryError, QueryOutcome,
};
