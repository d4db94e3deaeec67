//! Production-capacity solver: VLP/IPR curves and their intersection
//!
//! Two independently computed bottomhole-pressure curves over a fixed flow
//! sweep:
//! - Inflow (IPR): `max(p_res − q / PI, 0)` — direct productivity-index
//!   model, clipped at zero because pressure cannot go negative.
//! - Lift (VLP): wellhead pressure plus per-segment friction and gravity
//!   terms, minus the ESP pump boost once accumulated vertical depth
//!   reaches the pump intake depth.
//!
//! The operating point is the grid flow minimizing |VLP − IPR|, accepted
//! only within tolerance. The solver never refines or extrapolates beyond
//! the grid.
//!
//! Depth accounting note: friction uses the measured segment length while
//! the pump gate uses accumulated vertical depth (`L·sin θ`, with θ from
//! `atan2(ΔTVD, ΔMD)`). This mixed MD/TVD accounting matches the field
//! calculation this solver reproduces and must not be "corrected".

use tracing::{debug, info};

use crate::config::SweepConfig;
use crate::types::{OperatingPoint, SolveOutcome, SurveyStation, WellPhysicalModel};

/// Pascal per bar.
const PA_PER_BAR: f64 = 1e5;

// ============================================================================
// Friction Factor
// ============================================================================

/// Swamee–Jain explicit friction factor.
///
/// `f = 0.25 / (log10(roughness/(3.7·D) + 5.74/Re^0.9))²`
///
/// Defined as 0 for `Re ≤ 0` (stagnant flow has no friction loss).
pub fn swamee_jain(reynolds: f64, diameter_m: f64, roughness_m: f64) -> f64 {
    if reynolds <= 0.0 {
        return 0.0;
    }
    let argument = roughness_m / (3.7 * diameter_m) + 5.74 / reynolds.powf(0.9);
    0.25 / argument.log10().powi(2)
}

// ============================================================================
// Trajectory Segments
// ============================================================================

/// One computational segment between consecutive survey stations.
#[derive(Debug, Clone, Copy)]
struct Segment {
    /// Measured length (ΔMD, m)
    length_m: f64,
    /// Inner diameter at the deeper station (m)
    diameter_m: f64,
    /// Inclination from horizontal: `atan2(ΔTVD, ΔMD)`, 0 when ΔMD = 0
    inclination_rad: f64,
}

/// Derive segments from the ordered survey stations.
fn trajectory_segments(stations: &[SurveyStation]) -> Vec<Segment> {
    stations
        .windows(2)
        .map(|pair| {
            let d_md = pair[1].md_m - pair[0].md_m;
            let d_tvd = pair[1].tvd_m - pair[0].tvd_m;
            let inclination_rad = if d_md == 0.0 { 0.0 } else { d_tvd.atan2(d_md) };
            Segment {
                length_m: d_md,
                diameter_m: pair[1].inner_diameter_m,
                inclination_rad,
            }
        })
        .collect()
}

// ============================================================================
// Curves
// ============================================================================

/// Inflow performance: bottomhole pressure (bar) the reservoir sustains at
/// a given flow. Linear in flow, clipped at zero.
pub fn inflow_pressure_bar(
    flow_m3hr: f64,
    reservoir_pressure_bar: f64,
    productivity_index_m3hr_bar: f64,
) -> f64 {
    (reservoir_pressure_bar - flow_m3hr / productivity_index_m3hr_bar).max(0.0)
}

/// Vertical lift performance: bottomhole pressure (bar) required to lift a
/// given flow to the wellhead through the model's trajectory.
pub fn lift_pressure_bar(flow_m3hr: f64, model: &WellPhysicalModel) -> f64 {
    lift_pressure_over_segments(flow_m3hr, model, &trajectory_segments(&model.trajectory))
}

fn lift_pressure_over_segments(
    flow_m3hr: f64,
    model: &WellPhysicalModel,
    segments: &[Segment],
) -> f64 {
    let q_m3s = flow_m3hr / 3600.0;
    let rho = model.density_kg_m3;

    let mut dp_total_pa = 0.0;
    let mut vertical_depth_m = 0.0;

    for segment in segments {
        let area_m2 = std::f64::consts::PI * segment.diameter_m.powi(2) / 4.0;
        let velocity_ms = q_m3s / area_m2;
        let reynolds = rho * velocity_ms.abs() * segment.diameter_m / model.viscosity_pa_s;
        let friction = swamee_jain(reynolds, segment.diameter_m, model.roughness_m);

        let dp_friction = friction
            * (segment.length_m / segment.diameter_m)
            * (rho * velocity_ms.powi(2) / 2.0);
        let dp_gravity =
            rho * model.gravity_m_s2 * segment.length_m * segment.inclination_rad.sin();

        dp_total_pa += dp_friction + dp_gravity;
        vertical_depth_m += segment.length_m * segment.inclination_rad.sin();
    }

    // Pump boost applies once the trajectory reaches the intake depth
    if vertical_depth_m >= model.pump_intake_depth_m {
        if let Some(curve) = &model.pump_curve {
            dp_total_pa -= rho * model.gravity_m_s2 * curve.head_at(flow_m3hr);
        }
    }

    model.wellhead_pressure_bar + dp_total_pa / PA_PER_BAR
}

// ============================================================================
// Intersection Search
// ============================================================================

/// Inclusive flow grid over the sweep range.
fn flow_grid(sweep: &SweepConfig) -> Vec<f64> {
    let points = sweep.grid_points.max(2);
    #[allow(clippy::cast_precision_loss)]
    let step = (sweep.flow_max_m3hr - sweep.flow_min_m3hr) / (points - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    (0..points)
        .map(|i| sweep.flow_min_m3hr + step * i as f64)
        .collect()
}

/// Find the well's natural operating point on the flow sweep.
///
/// Evaluates both curves at every grid flow, takes the absolute difference,
/// and selects the minimizing grid point (first one on exact ties). Accepts
/// it only when the residual is strictly inside the tolerance; otherwise
/// reports [`SolveOutcome::NoIntersection`] with the minimum residual.
///
/// The caller must have validated the model (see
/// [`crate::nodal::validate`]); validated inputs cannot produce non-finite
/// arithmetic here.
pub fn find_operating_point(model: &WellPhysicalModel, sweep: &SweepConfig) -> SolveOutcome {
    let segments = trajectory_segments(&model.trajectory);
    let grid = flow_grid(sweep);

    let mut best_flow = grid[0];
    let mut best_vlp = 0.0;
    let mut min_residual = f64::INFINITY;

    for &flow in &grid {
        let vlp = lift_pressure_over_segments(flow, model, &segments);
        let ipr = inflow_pressure_bar(
            flow,
            model.reservoir_pressure_bar,
            model.productivity_index_m3hr_bar,
        );
        let residual = (vlp - ipr).abs();
        if residual < min_residual {
            min_residual = residual;
            best_flow = flow;
            best_vlp = vlp;
        }
    }

    debug!(
        grid_points = grid.len(),
        min_residual_bar = min_residual,
        at_flow_m3hr = best_flow,
        "Operating-point sweep complete"
    );

    if min_residual < sweep.tolerance_bar {
        let pump_head_m = model
            .pump_curve
            .as_ref()
            .map_or(0.0, |curve| curve.head_at(best_flow));
        let operating_point = OperatingPoint {
            flow_m3hr: best_flow,
            bottomhole_pressure_bar: best_vlp,
            pump_head_m,
        };
        info!(
            flow_m3hr = operating_point.flow_m3hr,
            bottomhole_pressure_bar = operating_point.bottomhole_pressure_bar,
            pump_head_m = operating_point.pump_head_m,
            "Operating point found"
        );
        SolveOutcome::Converged(operating_point)
    } else {
        info!(
            min_residual_bar = min_residual,
            tolerance_bar = sweep.tolerance_bar,
            "No intersection between lift and inflow curves"
        );
        SolveOutcome::NoIntersection { min_residual_bar: min_residual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SurveyStation;

    #[test]
    fn swamee_jain_is_zero_for_stagnant_flow() {
        assert!(swamee_jain(0.0, 0.1778, 1e-5).abs() < f64::EPSILON);
        assert!(swamee_jain(-100.0, 0.1778, 1e-5).abs() < f64::EPSILON);
    }

    #[test]
    fn swamee_jain_matches_hand_calculation() {
        // Re = 4e5, D = 0.1778 m, roughness = 1e-5 m → f ≈ 0.0144
        let f = swamee_jain(4.0e5, 0.1778, 1e-5);
        assert!((0.013..0.016).contains(&f), "f = {f}");
    }

    #[test]
    fn inflow_is_linear_and_clipped_at_zero() {
        assert!((inflow_pressure_bar(0.0, 230.0, 5.0) - 230.0).abs() < 1e-9);
        assert!((inflow_pressure_bar(100.0, 230.0, 5.0) - 210.0).abs() < 1e-9);
        assert!(inflow_pressure_bar(5000.0, 230.0, 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn horizontal_frictionless_lift_stays_near_wellhead_pressure() {
        // Zero inclination and negligible roughness: no hydrostatic column,
        // only a small friction term should remain at low flow.
        let model = WellPhysicalModel {
            roughness_m: 0.0,
            pump_curve: None,
            trajectory: vec![
                SurveyStation::new(0.0, 0.0, 0.3397),
                SurveyStation::new(1000.0, 0.0, 0.3397),
                SurveyStation::new(2000.0, 0.0, 0.3397),
            ],
            ..WellPhysicalModel::default()
        };
        let bhp = lift_pressure_bar(10.0, &model);
        assert!(
            (bhp - model.wellhead_pressure_bar).abs() < 0.5,
            "bhp = {bhp}, wellhead = {}",
            model.wellhead_pressure_bar
        );
    }

    #[test]
    fn vertical_lift_equals_wellhead_plus_hydrostatic_column() {
        // MD = TVD stations: θ = atan2(ΔTVD, ΔMD) = π/4, so the effective
        // column is L·sin(π/4). Pinned deliberately — see module docs on
        // the MD/TVD accounting.
        let model = WellPhysicalModel {
            roughness_m: 0.0,
            pump_curve: None,
            trajectory: vec![
                SurveyStation::new(0.0, 0.0, 0.3397),
                SurveyStation::new(2500.0, 2500.0, 0.3397),
            ],
            ..WellPhysicalModel::default()
        };
        let bhp = lift_pressure_bar(1.0, &model);
        let expected_column_bar = model.density_kg_m3
            * model.gravity_m_s2
            * 2500.0
            * std::f64::consts::FRAC_PI_4.sin()
            / 1e5;
        assert!(
            (bhp - model.wellhead_pressure_bar - expected_column_bar).abs() < 0.5,
            "bhp = {bhp}, expected column = {expected_column_bar}"
        );
    }

    #[test]
    fn productivity_index_shifts_inflow_without_touching_lift() {
        let model = WellPhysicalModel::default();
        let shifted = WellPhysicalModel {
            productivity_index_m3hr_bar: 10.0,
            ..WellPhysicalModel::default()
        };
        for flow in [10.0, 100.0, 250.0] {
            assert!((lift_pressure_bar(flow, &model) - lift_pressure_bar(flow, &shifted)).abs()
                < 1e-12);
            assert!(
                inflow_pressure_bar(flow, 230.0, 5.0) < inflow_pressure_bar(flow, 230.0, 10.0)
            );
        }
    }

    #[test]
    fn pump_boost_applies_only_below_intake_depth() {
        let shallow = WellPhysicalModel {
            // Vertical-ish trajectory reaches only ~70 m of vertical depth
            trajectory: vec![
                SurveyStation::new(0.0, 0.0, 0.3397),
                SurveyStation::new(100.0, 100.0, 0.3397),
            ],
            ..WellPhysicalModel::default()
        };
        let mut without_pump = shallow.clone();
        without_pump.pump_curve = None;
        // Intake at 500 m is never reached, so the pump changes nothing
        assert!(
            (lift_pressure_bar(200.0, &shallow) - lift_pressure_bar(200.0, &without_pump)).abs()
                < 1e-12
        );

        let deep = WellPhysicalModel::default();
        let mut deep_without_pump = deep.clone();
        deep_without_pump.pump_curve = None;
        assert!(lift_pressure_bar(200.0, &deep) < lift_pressure_bar(200.0, &deep_without_pump));
    }

    #[test]
    fn default_model_converges_reproducibly() {
        let model = WellPhysicalModel::default();
        let sweep = SweepConfig::default();

        let first = find_operating_point(&model, &sweep);
        let second = find_operating_point(&model, &sweep);
        assert_eq!(first, second);

        let op = first.operating_point().expect("default model must converge");
        assert!((sweep.flow_min_m3hr..=sweep.flow_max_m3hr).contains(&op.flow_m3hr));

        let ipr = inflow_pressure_bar(
            op.flow_m3hr,
            model.reservoir_pressure_bar,
            model.productivity_index_m3hr_bar,
        );
        assert!(
            (op.bottomhole_pressure_bar - ipr).abs() < sweep.tolerance_bar,
            "residual {} exceeds tolerance",
            (op.bottomhole_pressure_bar - ipr).abs()
        );
        assert!(op.pump_head_m > 0.0);
    }

    #[test]
    fn far_apart_curves_report_no_intersection() {
        // Inflow held far above the lift curve across the whole sweep
        let model = WellPhysicalModel {
            reservoir_pressure_bar: 5000.0,
            productivity_index_m3hr_bar: 1e6,
            ..WellPhysicalModel::default()
        };
        let sweep = SweepConfig::default();
        match find_operating_point(&model, &sweep) {
            SolveOutcome::NoIntersection { min_residual_bar } => {
                assert!(min_residual_bar > sweep.tolerance_bar);
            }
            SolveOutcome::Converged(op) => panic!("unexpected convergence at {op:?}"),
        }
    }
}
