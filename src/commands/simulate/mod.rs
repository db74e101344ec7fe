//! Simulate command - run one scenario from a preset or a file
//!
//! # Usage
//!
//! ```bash
//! ballroll simulate incline                 # preset defaults
//! ballroll simulate slipping --friction 0.05
//! ballroll simulate multiball --balls 4
//! ballroll simulate --file bounce.toml --json
//! ballroll simulate walls --export run.csv  # or --export for ~/.ballroll/exports/
//! ```

mod internal;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ballroll::scenario::{Overrides, ScenarioKind};

pub(crate) use internal::{build_scenario, export_to, run_scenario};

#[derive(Debug, Clone, Default, Args)]
pub struct SimulateArgs {
    /// Preset to start from (incline, slipping, horizontal, walls, multiball, custom)
    pub preset: Option<ScenarioKind>,

    /// Load the scenario from a TOML file instead of a preset; a bare name
    /// not found here is looked up in ~/.ballroll/scenarios/
    #[arg(short, long, conflicts_with = "preset")]
    pub file: Option<PathBuf>,

    /// Ball mass in kg
    #[arg(long)]
    pub mass: Option<f64>,

    /// Ball radius in m
    #[arg(long)]
    pub radius: Option<f64>,

    /// Incline angle in degrees
    #[arg(long)]
    pub angle: Option<f64>,

    /// Friction coefficient
    #[arg(long)]
    pub friction: Option<f64>,

    /// Initial position x in m
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Initial position y in m
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f64>,

    /// Initial velocity x in m/s
    #[arg(long, allow_negative_numbers = true)]
    pub vx: Option<f64>,

    /// Initial velocity y in m/s
    #[arg(long, allow_negative_numbers = true)]
    pub vy: Option<f64>,

    /// Half-size of a square wall box in m
    #[arg(long)]
    pub walls: Option<f64>,

    /// Coefficient of restitution for wall and ball collisions
    #[arg(long)]
    pub restitution: Option<f64>,

    /// Simulated time in s
    #[arg(long)]
    pub time: Option<f64>,

    /// Recording interval in s
    #[arg(long)]
    pub dt: Option<f64>,

    /// Number of balls (multiball preset only)
    #[arg(long)]
    pub balls: Option<usize>,

    /// Print the full run as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Export to a .json or .csv path; without a value, a timestamped JSON
    /// file in ~/.ballroll/exports/
    #[arg(long, value_name = "PATH")]
    pub export: Option<Option<PathBuf>>,

    /// Save the resolved scenario as TOML; a bare name goes to
    /// ~/.ballroll/scenarios/
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

impl SimulateArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            mass: self.mass,
            radius: self.radius,
            angle_deg: self.angle,
            friction: self.friction,
            x: self.x,
            y: self.y,
            vx: self.vx,
            vy: self.vy,
            walls: self.walls,
            restitution: self.restitution,
            total_time: self.time,
            dt: self.dt,
        }
    }
}

/// Execute the simulate command
pub fn execute(args: SimulateArgs) -> Result<()> {
    internal::simulate(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: SimulateArgs,
    }

    #[test]
    fn test_parse_preset_and_overrides() {
        let h = Harness::parse_from(["simulate", "walls", "--vx", "-1.5", "--restitution", "0.8"]);
        assert_eq!(h.args.preset, Some(ScenarioKind::Walls));
        let o = h.args.overrides();
        assert_eq!(o.vx, Some(-1.5));
        assert_eq!(o.restitution, Some(0.8));
        assert!(o.mass.is_none());
    }

    #[test]
    fn test_export_without_value() {
        let h = Harness::parse_from(["simulate", "incline", "--export"]);
        assert_eq!(h.args.export, Some(None));
        let h = Harness::parse_from(["simulate", "incline", "--export", "out.csv"]);
        assert_eq!(h.args.export, Some(Some(PathBuf::from("out.csv"))));
    }

    #[test]
    fn test_file_conflicts_with_preset() {
        assert!(Harness::try_parse_from(["simulate", "incline", "--file", "a.toml"]).is_err());
    }
}
