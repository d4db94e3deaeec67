//! Query configuration structs
//!
//! Every struct implements `Default` with values matching the original
//! deployment constants, so behavior is unchanged when no config file is
//! present. All fields are `#[serde(default)]` — a partial TOML file only
//! overrides the keys it names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the query pipeline.
///
/// Load with `QueryConfig::load()` which searches:
/// 1. `$WELLQUERY_CONFIG` env var
/// 2. `./wellquery.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct QueryConfig {
    /// Fragment ranking parameters
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Nodal-analysis trigger and sweep parameters
    #[serde(default)]
    pub nodal: NodalConfig,
}

impl QueryConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("WELLQUERY_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded query config from WELLQUERY_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from WELLQUERY_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WELLQUERY_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("wellquery.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded query config from ./wellquery.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./wellquery.toml, using defaults");
                }
            }
        }

        Self::default()
    }

    /// Parse a specific TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        Ok(config)
    }
}

// ============================================================================
// Retrieval
// ============================================================================

/// Fragment ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of top candidates returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Candidates below this cosine similarity are discarded.
    /// 0.0 means pure top-k with no threshold.
    #[serde(default)]
    pub min_similarity: f32,

    /// Over-fetch multiplier for provenance-restricted query modes, so the
    /// post-filter can still fill `top_k` results.
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_overfetch_factor() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_similarity: 0.0,
            overfetch_factor: default_overfetch_factor(),
        }
    }
}

// ============================================================================
// Nodal Analysis
// ============================================================================

/// Nodal-analysis trigger keywords and intersection sweep parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodalConfig {
    /// Query keywords that trigger a production-capacity calculation
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,

    /// Flow sweep and intersection tolerance
    #[serde(default)]
    pub sweep: SweepConfig,
}

fn default_trigger_keywords() -> Vec<String> {
    [
        "calculate",
        "production",
        "flowrate",
        "nodal",
        "analysis",
        "capacity",
        "estimate",
        "performance",
        "vlp",
        "ipr",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

impl Default for NodalConfig {
    fn default() -> Self {
        Self {
            trigger_keywords: default_trigger_keywords(),
            sweep: SweepConfig::default(),
        }
    }
}

/// Flow-rate sweep grid and acceptance tolerance for the operating-point
/// search. The solver never refines or extrapolates beyond this grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepConfig {
    /// Minimum flow rate on the grid (m³/hr)
    #[serde(default = "default_flow_min")]
    pub flow_min_m3hr: f64,

    /// Maximum flow rate on the grid (m³/hr), inclusive
    #[serde(default = "default_flow_max")]
    pub flow_max_m3hr: f64,

    /// Number of grid points, endpoints included
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,

    /// Maximum |VLP − IPR| residual accepted as an intersection (bar)
    #[serde(default = "default_tolerance")]
    pub tolerance_bar: f64,
}

fn default_flow_min() -> f64 {
    1.0
}

fn default_flow_max() -> f64 {
    400.0
}

fn default_grid_points() -> usize {
    200
}

fn default_tolerance() -> f64 {
    3.0
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            flow_min_m3hr: default_flow_min(),
            flow_max_m3hr: default_flow_max(),
            grid_points: default_grid_points(),
            tolerance_bar: default_tolerance(),
        }
    }
}
