//! Trajectory export for external plotting
//!
//! JSON carries the scenario, a summary and every sample. CSV carries one
//! row per sample and nothing else, so it drops straight into a
//! spreadsheet or a plotting script.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{MultiSummary, Summary};
use crate::scenario::{Outcome, Scenario};
use crate::simulation::{MultiTrajectory, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Format::Csv),
            _ => bail!(
                "Unsupported export format for {} (use .json or .csv)",
                path.display()
            ),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Body<'a> {
    Single {
        summary: Summary,
        trajectory: &'a Trajectory,
    },
    Multi {
        summary: MultiSummary,
        trajectory: &'a MultiTrajectory,
    },
}

#[derive(Serialize)]
struct Document<'a> {
    generated_at: DateTime<Utc>,
    generator: &'static str,
    scenario: &'a Scenario,
    #[serde(flatten)]
    body: Body<'a>,
}

pub fn to_json(scenario: &Scenario, outcome: &Outcome) -> Result<String> {
    let body = match outcome {
        Outcome::Single {
            initial,
            surface,
            trajectory,
        } => Body::Single {
            summary: Summary::of(trajectory, initial, surface),
            trajectory,
        },
        Outcome::Multi { trajectory, .. } => Body::Multi {
            summary: MultiSummary::of(trajectory),
            trajectory,
        },
    };
    let document = Document {
        generated_at: Utc::now(),
        generator: concat!("ballroll ", env!("CARGO_PKG_VERSION")),
        scenario,
        body,
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize trajectory")
}

pub fn to_csv(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Single { trajectory, .. } => single_csv(trajectory),
        Outcome::Multi { trajectory, .. } => multi_csv(trajectory),
    }
}

fn single_csv(trajectory: &Trajectory) -> String {
    let mut out = String::from("time,x,y,vx,vy,wx,wy,wz,kinetic_energy,regime\n");
    for s in &trajectory.samples {
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            s.time,
            s.position.x,
            s.position.y,
            s.velocity.x,
            s.velocity.y,
            s.angular_velocity.x,
            s.angular_velocity.y,
            s.angular_velocity.z,
            s.kinetic_energy,
            if s.regime.is_slipping() { "slipping" } else { "rolling" }
        );
    }
    out
}

fn multi_csv(trajectory: &MultiTrajectory) -> String {
    let mut out = String::from("time");
    for i in 1..=trajectory.ball_count() {
        let _ = write!(out, ",ball{i}_x,ball{i}_y,ball{i}_vx,ball{i}_vy");
    }
    out.push('\n');

    for (k, t) in trajectory.time.iter().enumerate() {
        out.push_str(&t.to_string());
        for (positions, velocities) in trajectory.positions.iter().zip(&trajectory.velocities) {
            let (p, v) = (positions[k], velocities[k]);
            let _ = write!(out, ",{},{},{},{}", p.x, p.y, v.x, v.y);
        }
        out.push('\n');
    }
    out
}

/// `<dir>/<name>-<UTC timestamp>.<ext>`
pub fn timestamped_path(dir: &Path, name: &str, format: Format) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("{}-{}.{}", name, stamp, format.extension()))
}

/// Write `outcome` to `path` in the format its extension names.
pub fn write(path: &Path, scenario: &Scenario, outcome: &Outcome) -> Result<()> {
    let content = match Format::from_path(path)? {
        Format::Json => to_json(scenario, outcome)?,
        Format::Csv => to_csv(outcome),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported trajectory");
    Ok(())
}
