//! Internal implementation for simulate command

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use ballroll::export::{self, Format};
use ballroll::scenario::{Outcome, Scenario, ScenarioKind};
use ballroll::validation::validate_scenario;
use ballroll::{paths, Config};

use super::SimulateArgs;
use crate::commands::report;

fn is_bare_name(path: &Path) -> bool {
    path.parent().map_or(true, |p| p.as_os_str().is_empty())
}

/// A bare name like `ramp` lives in `~/.ballroll/scenarios/ramp.toml`.
fn saved_scenario_path(name: &Path) -> PathBuf {
    let mut path = paths::scenarios_dir().join(name);
    if path.extension().is_none() {
        path.set_extension("toml");
    }
    path
}

/// `--file` as given, falling back to the saved scenarios for a bare name
/// that does not exist in the working directory.
pub(crate) fn scenario_file(file: &Path) -> PathBuf {
    let path = paths::expand(&file.to_string_lossy());
    if !path.exists() && is_bare_name(file) {
        return saved_scenario_path(file);
    }
    path
}

/// Where `--save` writes: bare names go to the saved scenarios directory.
pub(crate) fn save_target(target: &Path) -> PathBuf {
    if is_bare_name(target) {
        saved_scenario_path(target)
    } else {
        paths::expand(&target.to_string_lossy())
    }
}

/// Validate, then write the scenario as TOML.
pub(crate) fn save_scenario(scenario: &Scenario, target: &Path) -> Result<PathBuf> {
    validate_scenario(scenario)
        .with_context(|| format!("Invalid scenario '{}', not saved", scenario.name))?;

    let path = save_target(target);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = scenario
        .to_toml_string()
        .context("Failed to serialize scenario")?;
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Resolve preset or file, then layer config and flags on top.
pub(crate) fn build_scenario(args: &SimulateArgs, config: &Config) -> Result<Scenario> {
    let mut scenario = match &args.file {
        Some(file) => Scenario::load(&scenario_file(file))?,
        None => match (args.preset.unwrap_or_default(), args.balls) {
            (ScenarioKind::Multiball, Some(count)) => Scenario::multiball(count),
            (_, Some(_)) => bail!("--balls only applies to the multiball preset"),
            (kind, None) => Scenario::preset(kind),
        },
    };

    config.simulation.apply(&mut scenario.simulation);
    args.overrides().apply(&mut scenario);
    Ok(scenario)
}

/// Validate, report warnings and run.
pub(crate) fn run_scenario(scenario: &Scenario, quiet: bool) -> Result<Outcome> {
    let warnings = validate_scenario(scenario)
        .with_context(|| format!("Invalid scenario '{}'", scenario.name))?;
    if !quiet {
        report::print_warnings(&warnings);
    }

    info!(scenario = %scenario.name, balls = scenario.balls.len(), "simulating");
    Ok(scenario.run())
}

/// Where `--export` writes: a file path as given, or a timestamped JSON
/// file when the target is a directory or absent.
pub(crate) fn export_target(target: Option<&Path>, name: &str) -> Result<PathBuf> {
    let path = match target {
        None => return Ok(export::timestamped_path(&paths::exports_dir(), name, Format::Json)),
        Some(path) => paths::expand(&path.to_string_lossy()),
    };
    if path.is_dir() {
        return Ok(export::timestamped_path(&path, name, Format::Json));
    }
    Format::from_path(&path)?;
    Ok(path)
}

pub(crate) fn export_to(
    target: Option<&Path>,
    scenario: &Scenario,
    outcome: &Outcome,
) -> Result<PathBuf> {
    let path = export_target(target, &scenario.name)?;
    export::write(&path, scenario, outcome)?;
    Ok(path)
}

pub(super) fn simulate(args: &SimulateArgs) -> Result<()> {
    let config = Config::load()?;
    let scenario = build_scenario(args, &config)?;

    if let Some(save) = &args.save {
        let path = save_scenario(&scenario, save)?;
        if !args.json {
            println!("📝 Saved scenario to {}", path.display());
        }
    }

    let outcome = run_scenario(&scenario, args.json)?;

    if args.json {
        println!("{}", export::to_json(&scenario, &outcome)?);
    } else {
        report::print_outcome(&scenario, &outcome);
    }

    if let Some(target) = &args.export {
        let path = export_to(target.as_deref(), &scenario, &outcome)?;
        if args.json {
            eprintln!("💾 Exported to {}", path.display());
        } else {
            println!("\n💾 Exported to {}", path.display());
        }
    }

    Ok(())
}
