//! Retrieval Module
//!
//! Vector retrieval over well documentation fragments:
//! - `store` — append-only fragment store with per-well centroids and a
//!   copy-on-write embedding matrix for lock-free concurrent reads
//! - `ranker` — cosine-similarity ranking with provenance-restricted modes
//! - `persistence` — versioned index bundle save/load
//!
//! Embedding computation is an external capability (see
//! [`crate::pipeline::EmbeddingProvider`]); this module only consumes
//! fixed-length vectors comparable by cosine similarity.

pub mod persistence;
pub mod ranker;
pub mod store;

pub use persistence::{load_index, save_index, IndexBundle, IndexError, SCHEMA_VERSION};
pub use ranker::{cosine_similarity, rank};
pub use store::{EmbeddingMatrix, FragmentStore, StoreError, StoreSnapshot};
