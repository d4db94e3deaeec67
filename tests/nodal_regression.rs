//! Nodal Analysis Regression Tests
//!
//! Pins the reference-well solve (the 4-station trajectory with the 5-point
//! ESP pump curve), the no-intersection contract, and the rule that
//! validation excludes every input that could drive the numeric core into
//! non-finite arithmetic.

use wellquery::config::SweepConfig;
use wellquery::nodal::{self, inflow_pressure_bar, lift_pressure_bar, ValidationError};
use wellquery::types::{PumpCurve, SolveOutcome, SurveyStation, WellPhysicalModel};

/// The reference model spelled out explicitly, independent of `Default`.
fn reference_model() -> WellPhysicalModel {
    WellPhysicalModel {
        density_kg_m3: 1000.0,
        viscosity_pa_s: 1e-3,
        gravity_m_s2: 9.81,
        roughness_m: 1e-5,
        reservoir_pressure_bar: 230.0,
        wellhead_pressure_bar: 10.0,
        productivity_index_m3hr_bar: 5.0,
        pump_intake_depth_m: 500.0,
        trajectory: vec![
            SurveyStation::new(0.0, 0.0, 0.3397),
            SurveyStation::new(500.0, 500.0, 0.2445),
            SurveyStation::new(1500.0, 1500.0, 0.1778),
            SurveyStation::new(2500.0, 2500.0, 0.1778),
        ],
        pump_curve: Some(PumpCurve {
            flow_m3hr: vec![0.0, 100.0, 200.0, 300.0, 400.0],
            head_m: vec![600.0, 550.0, 450.0, 300.0, 100.0],
        }),
    }
}

#[test]
fn reference_well_converges_within_tolerance() {
    let model = reference_model();
    let sweep = SweepConfig::default();

    let outcome = nodal::solve(&model, &sweep).expect("reference model must validate");
    let op = match outcome {
        SolveOutcome::Converged(op) => op,
        SolveOutcome::NoIntersection { min_residual_bar } => {
            panic!("reference well failed to converge, residual {min_residual_bar} bar")
        }
    };

    // Lift and inflow pressures agree within the 3-bar tolerance at the
    // reported flow
    let vlp = lift_pressure_bar(op.flow_m3hr, &model);
    let ipr = inflow_pressure_bar(op.flow_m3hr, 230.0, 5.0);
    assert!((vlp - ipr).abs() < sweep.tolerance_bar);
    assert!((op.bottomhole_pressure_bar - vlp).abs() < 1e-9);

    // The intersection lands in the pumped high-flow region of the sweep
    assert!(op.flow_m3hr > 100.0 && op.flow_m3hr < 400.0, "flow = {}", op.flow_m3hr);
    assert!(op.pump_head_m > 0.0 && op.pump_head_m < 600.0);
}

#[test]
fn reference_solve_is_reproducible() {
    let model = reference_model();
    let sweep = SweepConfig::default();
    let first = nodal::solve(&model, &sweep).expect("validation");
    for _ in 0..5 {
        assert_eq!(nodal::solve(&model, &sweep).expect("validation"), first);
    }
}

#[test]
fn inflow_held_far_above_lift_reports_no_intersection() {
    // Extreme PI flattens the inflow curve at an unreachable 5000 bar
    let model = WellPhysicalModel {
        reservoir_pressure_bar: 5000.0,
        productivity_index_m3hr_bar: 1e6,
        ..reference_model()
    };
    let sweep = SweepConfig::default();

    match nodal::solve(&model, &sweep).expect("validation") {
        SolveOutcome::NoIntersection { min_residual_bar } => {
            assert!(
                min_residual_bar > sweep.tolerance_bar,
                "residual {min_residual_bar} should exceed tolerance"
            );
        }
        SolveOutcome::Converged(op) => panic!("unexpected convergence at {op:?}"),
    }
}

#[test]
fn solver_never_sees_division_by_zero_inputs() {
    // Each of these would produce a division by zero or a non-finite
    // intermediate if it reached the numeric core; validation must
    // intercept every one.
    let sweep = SweepConfig::default();

    let zero_viscosity =
        WellPhysicalModel { viscosity_pa_s: 0.0, ..reference_model() };
    assert!(matches!(
        nodal::solve(&zero_viscosity, &sweep),
        Err(ValidationError::NonPositiveViscosity(_))
    ));

    let mut zero_diameter = reference_model();
    zero_diameter.trajectory[1] = SurveyStation::new(500.0, 500.0, 0.0);
    assert!(matches!(
        nodal::solve(&zero_diameter, &sweep),
        Err(ValidationError::UnrealisticDiameter { .. })
    ));

    let negative_diameter = WellPhysicalModel {
        trajectory: vec![
            SurveyStation::new(0.0, 0.0, 0.3397),
            SurveyStation::new(500.0, 500.0, -0.1),
        ],
        ..reference_model()
    };
    assert!(matches!(
        nodal::solve(&negative_diameter, &sweep),
        Err(ValidationError::UnrealisticDiameter { .. })
    ));

    let single_station = WellPhysicalModel {
        trajectory: vec![SurveyStation::new(0.0, 0.0, 0.3397)],
        ..reference_model()
    };
    assert!(matches!(
        nodal::solve(&single_station, &sweep),
        Err(ValidationError::TrajectoryTooShort(1))
    ));
}

#[test]
fn converged_results_are_always_finite() {
    // Sweep a grid of plausible parameter variations; every accepted
    // operating point must be finite in every field.
    let sweep = SweepConfig::default();
    for reservoir in [150.0, 230.0, 300.0] {
        for pi in [2.0, 5.0, 8.0] {
            let model = WellPhysicalModel {
                reservoir_pressure_bar: reservoir,
                productivity_index_m3hr_bar: pi,
                ..reference_model()
            };
            match nodal::solve(&model, &sweep).expect("validation") {
                SolveOutcome::Converged(op) => {
                    assert!(op.flow_m3hr.is_finite());
                    assert!(op.bottomhole_pressure_bar.is_finite());
                    assert!(op.pump_head_m.is_finite());
                }
                SolveOutcome::NoIntersection { min_residual_bar } => {
                    assert!(min_residual_bar.is_finite());
                }
            }
        }
    }
}

#[test]
fn removing_the_pump_lowers_the_achievable_flow() {
    let sweep = SweepConfig::default();
    let pumped = reference_model();
    let unpumped = WellPhysicalModel { pump_curve: None, ..reference_model() };

    let pumped_flow = match nodal::solve(&pumped, &sweep).expect("validation") {
        SolveOutcome::Converged(op) => op.flow_m3hr,
        SolveOutcome::NoIntersection { .. } => panic!("pumped reference must converge"),
    };

    match nodal::solve(&unpumped, &sweep).expect("validation") {
        SolveOutcome::Converged(op) => {
            assert!(op.flow_m3hr < pumped_flow, "pump should raise the operating flow");
            assert!(op.pump_head_m.abs() < f64::EPSILON);
        }
        // Without artificial lift the curves may not meet at all on this
        // sweep; that is also a valid (lower-production) outcome.
        SolveOutcome::NoIntersection { min_residual_bar } => {
            assert!(min_residual_bar > sweep.tolerance_bar);
        }
    }
}
