//! Query Pipeline
//!
//! Orchestrates one question over the well documentation corpus:
//!
//! 1. Embed the query text (external [`EmbeddingProvider`])
//! 2. Rank fragments by cosine similarity
//! 3. Resolve the evidence to the single highest-priority borehole
//! 4. If the query asks for a production estimate, extract parameters from
//!    the resolved evidence and run the nodal solver
//!
//! The output is a structured [`QueryOutcome`]; phrasing it into prose is
//! the external answer service's job.

use std::sync::Arc;

use tracing::{debug, info};

use crate::borehole;
use crate::config::QueryConfig;
use crate::nodal::{self, extract_parameters};
use crate::retrieval::{rank, FragmentStore, StoreError};
use crate::types::{
    BoreholeSummary, Fragment, ProductionOutcome, QueryMode, ResolvedCandidate, SolveOutcome,
    WellPhysicalModel,
};

// ============================================================================
// External Collaborators
// ============================================================================

/// Embedding service boundary.
///
/// How vectors are produced (model, device, instruction prefixes for the
/// query side) is entirely the provider's concern; the pipeline only
/// requires fixed-length vectors comparable by cosine similarity.
/// Implementations must be thread-safe for shared access across concurrent
/// queries.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a user query.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed passage texts in bulk, one vector per input, input order kept.
    fn embed_passages(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Fixed vector dimension this provider produces.
    fn dimension(&self) -> usize;
}

/// Embedding boundary errors
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider error: {0}")]
    Provider(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

/// Pipeline errors. Empty evidence is never an error — only boundary
/// failures (embedding service, store ingestion) surface here.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// Ingestion Input
// ============================================================================

/// A chunk of document text awaiting embedding, as handed over by the
/// external chunker.
#[derive(Debug, Clone)]
pub struct FragmentDraft {
    pub source_file: String,
    pub sequence_index: usize,
    pub total_in_document: usize,
    pub text: String,
    pub is_image_derived: bool,
}

// ============================================================================
// Query Outcome
// ============================================================================

/// Structured result of one query: the resolved evidence plus the optional
/// production estimate. Sole output of the core.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    pub mode: QueryMode,
    /// All evidence from the winning borehole, ranked
    pub evidence: Vec<ResolvedCandidate>,
    /// Audit view of the pre-resolution borehole grouping
    pub borehole_summary: BoreholeSummary,
    /// Present only when the query asked for a production estimate
    pub production: Option<ProductionOutcome>,
}

// ============================================================================
// Query Engine
// ============================================================================

/// Ties the store, the embedding boundary, and the configuration together.
///
/// All methods take `&self`; the engine can be shared across threads and
/// queried concurrently while wells are being ingested.
pub struct QueryEngine {
    store: Arc<FragmentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: QueryConfig,
}

impl QueryEngine {
    pub fn new(
        store: Arc<FragmentStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: QueryConfig,
    ) -> Self {
        Self { store, embedder, config }
    }

    pub fn store(&self) -> &Arc<FragmentStore> {
        &self.store
    }

    /// Embed a batch of drafts and append them to the store as one well's
    /// atomic bulk batch. Returns the number of fragments ingested.
    pub fn ingest_well(
        &self,
        well_name: &str,
        drafts: Vec<FragmentDraft>,
    ) -> Result<usize, QueryError> {
        if drafts.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = drafts.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed_passages(&texts)?;
        if embeddings.len() != drafts.len() {
            return Err(EmbeddingError::Provider(format!(
                "provider returned {} vectors for {} passages",
                embeddings.len(),
                drafts.len()
            ))
            .into());
        }

        let fragments: Vec<Fragment> = drafts
            .into_iter()
            .zip(embeddings)
            .map(|(draft, embedding)| Fragment {
                well_name: well_name.to_string(),
                source_file: draft.source_file,
                sequence_index: draft.sequence_index,
                total_in_document: draft.total_in_document,
                text: draft.text,
                embedding,
                is_image_derived: draft.is_image_derived,
            })
            .collect();

        let count = self.store.add_well_fragments(well_name, fragments)?;
        info!(well = well_name, fragments = count, "Ingested well documents");
        Ok(count)
    }

    /// Keyword trigger: does this query ask for a production-capacity
    /// calculation?
    pub fn requires_production_estimate(&self, query: &str) -> bool {
        let normalized = query.to_lowercase();
        self.config
            .nodal
            .trigger_keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }

    /// Run one query end to end.
    pub fn run_query(&self, query: &str, mode: QueryMode) -> Result<QueryOutcome, QueryError> {
        let query_embedding = self.embedder.embed_query(query)?;
        if query_embedding.len() != self.store.embedding_dim() {
            return Err(EmbeddingError::Dimension {
                expected: self.store.embedding_dim(),
                actual: query_embedding.len(),
            }
            .into());
        }

        let snapshot = self.store.snapshot();
        let candidates = rank(&query_embedding, &snapshot, mode, &self.config.retrieval);
        let borehole_summary = borehole::summary(&candidates);
        let evidence = borehole::resolve(&candidates);

        let production = if self.requires_production_estimate(query) {
            Some(self.estimate_production(&evidence))
        } else {
            None
        };

        info!(
            query,
            mode = %mode,
            evidence = evidence.len(),
            production = production.is_some(),
            "Query complete"
        );

        Ok(QueryOutcome {
            query: query.to_string(),
            mode,
            evidence,
            borehole_summary,
            production,
        })
    }

    /// Build a model from the resolved evidence (defaults overlaid with
    /// whatever the regex extraction recovers) and solve it.
    fn estimate_production(&self, evidence: &[ResolvedCandidate]) -> ProductionOutcome {
        let combined: String = evidence
            .iter()
            .map(|c| c.candidate.fragment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let extracted = extract_parameters(&combined);
        debug!(
            recovered = extracted.count(),
            "Production estimate requested, parameters extracted"
        );
        let model = extracted.apply_to(&WellPhysicalModel::default());

        match nodal::solve(&model, &self.config.nodal.sweep) {
            Ok(SolveOutcome::Converged(op)) => ProductionOutcome::Solved(op),
            Ok(SolveOutcome::NoIntersection { min_residual_bar }) => {
                ProductionOutcome::NoIntersection { min_residual_bar }
            }
            Err(e) => ProductionOutcome::InvalidModel { reason: e.to_string() },
        }
    }
}
