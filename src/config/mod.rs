//! Query Configuration Module
//!
//! All retrieval and solver tuning values as operator-editable TOML fields,
//! with built-in defaults matching the original deployment constants.
//!
//! ## Loading Order
//!
//! 1. `WELLQUERY_CONFIG` environment variable (path to TOML file)
//! 2. `wellquery.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Configuration is passed explicitly into each component (`QueryEngine`,
//! ranker, solver) rather than held in module-level state, so tests and
//! concurrent pipelines can carry independent configs.

mod query_config;

pub use query_config::*;
