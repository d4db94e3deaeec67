//! Physical sanity validation for the well model
//!
//! Every condition that could drive the numeric core into division by zero
//! or a log of a non-positive argument is excluded here, before the solver
//! ever runs. Missing or malformed inputs are structured errors, never
//! arithmetic faults downstream.

use crate::types::WellPhysicalModel;

/// Reasons a model is rejected before solving.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("fluid density must be positive, got {0} kg/m³")]
    NonPositiveDensity(f64),

    #[error("viscosity must be positive, got {0} Pa·s")]
    NonPositiveViscosity(f64),

    #[error("productivity index must be positive, got {0} m³/hr per bar")]
    NonPositiveProductivityIndex(f64),

    #[error("gravitational acceleration must be positive, got {0} m/s²")]
    NonPositiveGravity(f64),

    #[error("pipe roughness must be non-negative, got {0} m")]
    NegativeRoughness(f64),

    #[error("parameter '{0}' is not a finite number")]
    NonFiniteParameter(&'static str),

    #[error("trajectory needs at least two survey stations, got {0}")]
    TrajectoryTooShort(usize),

    #[error("invalid trajectory: MD {md_m} m < TVD {tvd_m} m at station {index} (physically impossible)")]
    MdLessThanTvd { index: usize, md_m: f64, tvd_m: f64 },

    #[error("unrealistic inner diameter {diameter_m} m at station {index} (plausible range 0-2 m)")]
    UnrealisticDiameter { index: usize, diameter_m: f64 },

    #[error("malformed pump curve: {0}")]
    MalformedPumpCurve(String),
}

/// Validate a model against every physical sanity constraint.
pub fn validate(model: &WellPhysicalModel) -> Result<(), ValidationError> {
    let scalars = [
        ("density_kg_m3", model.density_kg_m3),
        ("viscosity_pa_s", model.viscosity_pa_s),
        ("gravity_m_s2", model.gravity_m_s2),
        ("roughness_m", model.roughness_m),
        ("reservoir_pressure_bar", model.reservoir_pressure_bar),
        ("wellhead_pressure_bar", model.wellhead_pressure_bar),
        ("productivity_index_m3hr_bar", model.productivity_index_m3hr_bar),
        ("pump_intake_depth_m", model.pump_intake_depth_m),
    ];
    for (name, value) in scalars {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteParameter(name));
        }
    }

    if model.density_kg_m3 <= 0.0 {
        return Err(ValidationError::NonPositiveDensity(model.density_kg_m3));
    }
    if model.viscosity_pa_s <= 0.0 {
        return Err(ValidationError::NonPositiveViscosity(model.viscosity_pa_s));
    }
    if model.productivity_index_m3hr_bar <= 0.0 {
        return Err(ValidationError::NonPositiveProductivityIndex(
            model.productivity_index_m3hr_bar,
        ));
    }
    if model.gravity_m_s2 <= 0.0 {
        return Err(ValidationError::NonPositiveGravity(model.gravity_m_s2));
    }
    if model.roughness_m < 0.0 {
        return Err(ValidationError::NegativeRoughness(model.roughness_m));
    }

    if model.trajectory.len() < 2 {
        return Err(ValidationError::TrajectoryTooShort(model.trajectory.len()));
    }
    for (index, station) in model.trajectory.iter().enumerate() {
        if !station.md_m.is_finite()
            || !station.tvd_m.is_finite()
            || !station.inner_diameter_m.is_finite()
        {
            return Err(ValidationError::NonFiniteParameter("trajectory"));
        }
        if station.md_m < station.tvd_m {
            return Err(ValidationError::MdLessThanTvd {
                index,
                md_m: station.md_m,
                tvd_m: station.tvd_m,
            });
        }
        if station.inner_diameter_m <= 0.0 || station.inner_diameter_m > 2.0 {
            return Err(ValidationError::UnrealisticDiameter {
                index,
                diameter_m: station.inner_diameter_m,
            });
        }
    }

    if let Some(curve) = &model.pump_curve {
        if curve.flow_m3hr.is_empty() {
            return Err(ValidationError::MalformedPumpCurve("empty flow axis".to_string()));
        }
        if curve.flow_m3hr.len() != curve.head_m.len() {
            return Err(ValidationError::MalformedPumpCurve(format!(
                "{} flow points but {} head points",
                curve.flow_m3hr.len(),
                curve.head_m.len()
            )));
        }
        if curve
            .flow_m3hr
            .iter()
            .chain(curve.head_m.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ValidationError::MalformedPumpCurve(
                "non-finite table value".to_string(),
            ));
        }
        if curve.flow_m3hr.windows(2).any(|w| w[1] < w[0]) {
            return Err(ValidationError::MalformedPumpCurve(
                "flow axis must be non-decreasing".to_string(),
            ));
        }
    }

    Ok(())
}
