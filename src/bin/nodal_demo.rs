//! Nodal Analysis Demo
//!
//! Runs the production-capacity calculation against the reference well
//! model (or CLI-supplied overrides) and prints the operating point.
//!
//! # Usage
//! ```bash
//! nodal-demo --reservoir-pressure 215 --pi 4.2
//! RUST_LOG=debug nodal-demo --no-pump
//! ```

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wellquery::config::QueryConfig;
use wellquery::nodal;
use wellquery::types::{SolveOutcome, WellPhysicalModel};

#[derive(Parser, Debug)]
#[command(name = "nodal-demo")]
#[command(about = "Well production-capacity calculation demo")]
#[command(version = "1.0")]
struct Args {
    /// Reservoir pressure (bar)
    #[arg(long)]
    reservoir_pressure: Option<f64>,

    /// Wellhead pressure (bar)
    #[arg(long)]
    wellhead_pressure: Option<f64>,

    /// Productivity index (m³/hr per bar)
    #[arg(long)]
    pi: Option<f64>,

    /// ESP pump intake depth (m)
    #[arg(long)]
    pump_depth: Option<f64>,

    /// Solve without the ESP pump curve
    #[arg(long)]
    no_pump: bool,

    /// Path to a wellquery.toml (defaults to the standard search order)
    #[arg(long, env = "WELLQUERY_CONFIG")]
    config: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => QueryConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => QueryConfig::load(),
    };

    let mut model = WellPhysicalModel::default();
    if let Some(v) = args.reservoir_pressure {
        model.reservoir_pressure_bar = v;
    }
    if let Some(v) = args.wellhead_pressure {
        model.wellhead_pressure_bar = v;
    }
    if let Some(v) = args.pi {
        model.productivity_index_m3hr_bar = v;
    }
    if let Some(v) = args.pump_depth {
        model.pump_intake_depth_m = v;
    }
    if args.no_pump {
        model.pump_curve = None;
    }

    println!("Nodal Analysis Demo");
    println!("  Reservoir pressure: {:.1} bar", model.reservoir_pressure_bar);
    println!("  Wellhead pressure:  {:.1} bar", model.wellhead_pressure_bar);
    println!("  Productivity index: {:.2} m³/hr per bar", model.productivity_index_m3hr_bar);
    println!("  Pump intake depth:  {:.0} m", model.pump_intake_depth_m);
    println!("  Trajectory:         {} stations", model.trajectory.len());
    println!();

    let outcome = nodal::solve(&model, &config.nodal.sweep)
        .context("well model failed physical validation")?;

    match outcome {
        SolveOutcome::Converged(op) => {
            println!("Operating point found:");
            println!("  Flowrate:            {:.2} m³/hr", op.flow_m3hr);
            println!("  Bottomhole pressure: {:.2} bar", op.bottomhole_pressure_bar);
            println!("  Pump head:           {:.1} m", op.pump_head_m);
        }
        SolveOutcome::NoIntersection { min_residual_bar } => {
            println!("No intersection between VLP and IPR curves");
            println!("  Minimum residual: {min_residual_bar:.2} bar (tolerance {:.1} bar)",
                config.nodal.sweep.tolerance_bar);
        }
    }

    Ok(())
}
