//! Nodal analysis types: physical well model and solver outcomes
//!
//! Units follow the original field data: pressures in bar, depths and
//! diameters in metres, flow in m³/hr, density in kg/m³, viscosity in Pa·s.

use serde::{Deserialize, Serialize};

// ============================================================================
// Well Trajectory
// ============================================================================

/// One survey station along the well trajectory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SurveyStation {
    /// Measured depth along the wellbore (m)
    pub md_m: f64,
    /// True vertical depth (m) — never exceeds measured depth
    pub tvd_m: f64,
    /// Tubing inner diameter at this station (m)
    pub inner_diameter_m: f64,
}

impl SurveyStation {
    pub const fn new(md_m: f64, tvd_m: f64, inner_diameter_m: f64) -> Self {
        Self { md_m, tvd_m, inner_diameter_m }
    }
}

// ============================================================================
// Pump Curve
// ============================================================================

/// ESP pump performance curve: head delivered as a function of flow.
///
/// `flow_m3hr` must be non-decreasing; `head_m` pairs with it index-wise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpCurve {
    /// Flow axis (m³/hr), non-decreasing
    pub flow_m3hr: Vec<f64>,
    /// Head delivered at each flow point (m)
    pub head_m: Vec<f64>,
}

impl PumpCurve {
    /// Interpolate pump head at a given flow rate.
    ///
    /// Linear interpolation between table points; flows outside the table
    /// range clamp to the first/last head value (numpy `interp` semantics,
    /// which the original pump tables rely on).
    pub fn head_at(&self, flow_m3hr: f64) -> f64 {
        if self.flow_m3hr.is_empty() {
            return 0.0;
        }
        let first_flow = self.flow_m3hr[0];
        let last_idx = self.flow_m3hr.len() - 1;
        if flow_m3hr <= first_flow {
            return self.head_m[0];
        }
        if flow_m3hr >= self.flow_m3hr[last_idx] {
            return self.head_m[last_idx];
        }
        for i in 1..self.flow_m3hr.len() {
            let (x0, x1) = (self.flow_m3hr[i - 1], self.flow_m3hr[i]);
            if flow_m3hr <= x1 {
                let (y0, y1) = (self.head_m[i - 1], self.head_m[i]);
                if (x1 - x0).abs() < f64::EPSILON {
                    return y1;
                }
                let t = (flow_m3hr - x0) / (x1 - x0);
                return y0 + t * (y1 - y0);
            }
        }
        self.head_m[last_idx]
    }
}

// ============================================================================
// Well Physical Model
// ============================================================================

/// Complete physical description of a well for a nodal-analysis solve.
///
/// Immutable once constructed. `Default` supplies the documented field
/// defaults, including the reference 4-station trajectory and 5-point ESP
/// pump curve; callers may omit any subset of parameters and keep the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellPhysicalModel {
    /// Fluid density (kg/m³)
    #[serde(default = "defaults::density")]
    pub density_kg_m3: f64,
    /// Dynamic viscosity (Pa·s)
    #[serde(default = "defaults::viscosity")]
    pub viscosity_pa_s: f64,
    /// Gravitational acceleration (m/s²)
    #[serde(default = "defaults::gravity")]
    pub gravity_m_s2: f64,
    /// Pipe roughness (m)
    #[serde(default = "defaults::roughness")]
    pub roughness_m: f64,
    /// Reservoir pressure (bar)
    #[serde(default = "defaults::reservoir_pressure")]
    pub reservoir_pressure_bar: f64,
    /// Wellhead pressure (bar)
    #[serde(default = "defaults::wellhead_pressure")]
    pub wellhead_pressure_bar: f64,
    /// Productivity index (m³/hr per bar of drawdown)
    #[serde(default = "defaults::productivity_index")]
    pub productivity_index_m3hr_bar: f64,
    /// ESP pump intake depth (m, vertical)
    #[serde(default = "defaults::pump_intake_depth")]
    pub pump_intake_depth_m: f64,
    /// Ordered trajectory survey stations, shallowest first
    #[serde(default = "defaults::trajectory")]
    pub trajectory: Vec<SurveyStation>,
    /// Optional ESP pump performance curve
    #[serde(default = "defaults::pump_curve")]
    pub pump_curve: Option<PumpCurve>,
}

impl Default for WellPhysicalModel {
    fn default() -> Self {
        Self {
            density_kg_m3: defaults::density(),
            viscosity_pa_s: defaults::viscosity(),
            gravity_m_s2: defaults::gravity(),
            roughness_m: defaults::roughness(),
            reservoir_pressure_bar: defaults::reservoir_pressure(),
            wellhead_pressure_bar: defaults::wellhead_pressure(),
            productivity_index_m3hr_bar: defaults::productivity_index(),
            pump_intake_depth_m: defaults::pump_intake_depth(),
            trajectory: defaults::trajectory(),
            pump_curve: defaults::pump_curve(),
        }
    }
}

/// Documented default parameter values, shared between serde defaults and
/// `WellPhysicalModel::default()`.
pub mod defaults {
    use super::{PumpCurve, SurveyStation};

    pub fn density() -> f64 {
        1000.0
    }
    pub fn viscosity() -> f64 {
        1e-3
    }
    pub fn gravity() -> f64 {
        9.81
    }
    pub fn roughness() -> f64 {
        1e-5
    }
    pub fn reservoir_pressure() -> f64 {
        230.0
    }
    pub fn wellhead_pressure() -> f64 {
        10.0
    }
    pub fn productivity_index() -> f64 {
        5.0
    }
    pub fn pump_intake_depth() -> f64 {
        500.0
    }

    /// Reference vertical trajectory: 0-2500 m in three tapered sections.
    pub fn trajectory() -> Vec<SurveyStation> {
        vec![
            SurveyStation::new(0.0, 0.0, 0.3397),
            SurveyStation::new(500.0, 500.0, 0.2445),
            SurveyStation::new(1500.0, 1500.0, 0.1778),
            SurveyStation::new(2500.0, 2500.0, 0.1778),
        ]
    }

    /// Reference 5-point ESP pump curve.
    pub fn pump_curve() -> Option<PumpCurve> {
        Some(PumpCurve {
            flow_m3hr: vec![0.0, 100.0, 200.0, 300.0, 400.0],
            head_m: vec![600.0, 550.0, 450.0, 300.0, 100.0],
        })
    }
}

// ============================================================================
// Solver Outcomes
// ============================================================================

/// The well's natural operating point: where the lift curve meets the
/// inflow curve on the flow sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OperatingPoint {
    /// Flow rate at the intersection (m³/hr)
    pub flow_m3hr: f64,
    /// Bottomhole pressure at the intersection (bar)
    pub bottomhole_pressure_bar: f64,
    /// Pump head delivered at that flow (m); 0 when no pump curve applies
    pub pump_head_m: f64,
}

/// Result of an intersection search over the flow sweep.
///
/// `NoIntersection` is a normal, reportable outcome of a correct
/// computation, not an error: the curves simply never came within
/// tolerance anywhere on the grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum SolveOutcome {
    Converged(OperatingPoint),
    NoIntersection {
        /// Smallest |VLP − IPR| found anywhere on the grid (bar)
        min_residual_bar: f64,
    },
}

impl SolveOutcome {
    pub const fn is_converged(&self) -> bool {
        matches!(self, SolveOutcome::Converged(_))
    }

    pub const fn operating_point(&self) -> Option<OperatingPoint> {
        match self {
            SolveOutcome::Converged(op) => Some(*op),
            SolveOutcome::NoIntersection { .. } => None,
        }
    }
}

/// Production-capacity result attached to a query outcome.
///
/// Model validation failures are surfaced here as structured data rather
/// than propagated as faults, so a bad parameter extraction degrades the
/// answer instead of aborting the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProductionOutcome {
    Solved(OperatingPoint),
    NoIntersection { min_residual_bar: f64 },
    InvalidModel { reason: String },
}
