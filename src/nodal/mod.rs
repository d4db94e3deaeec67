//! Nodal Analysis Module
//!
//! Deterministic production-capacity calculation: intersect the well's
//! outflow capability (vertical lift performance) with its inflow
//! capability (reservoir performance) over a fixed flow sweep and report
//! the operating point. Pure math, no I/O.
//!
//! - `validation` — physical sanity checks; the solver is never invoked on
//!   an unvalidated model
//! - `solver` — Swamee–Jain friction, VLP/IPR curves, grid intersection
//! - `extract` — regex fallback extraction of parameters from evidence text

pub mod extract;
pub mod solver;
pub mod validation;

pub use extract::{extract_parameters, ExtractedParameters};
pub use solver::{find_operating_point, inflow_pressure_bar, lift_pressure_bar, swamee_jain};
pub use validation::{validate, ValidationError};

use crate::config::SweepConfig;
use crate::types::{SolveOutcome, WellPhysicalModel};

/// Validate a model, then run the operating-point search.
///
/// This is the only public entry point that couples validation to the
/// numeric core; callers that need the raw curves use [`solver`] directly
/// after validating themselves.
pub fn solve(
    model: &WellPhysicalModel,
    sweep: &SweepConfig,
) -> Result<SolveOutcome, ValidationError> {
    validate(model)?;
    Ok(find_operating_point(model, sweep))
}
