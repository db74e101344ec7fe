//! Run many scenario files in parallel.
//!
//! Each file is loaded, validated and simulated on its own rayon worker.
//! A bad file produces a failed entry instead of aborting the batch.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::{MultiSummary, Summary};
use crate::config::SimulationOverrides;
use crate::export;
use crate::scenario::{Outcome, Scenario};
use crate::validation::validate_scenario;

/// Expand glob patterns into a sorted, de-duplicated file list.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let expanded = crate::paths::expand(pattern);
        let pattern_str = expanded.to_string_lossy();
        let matches =
            glob::glob(&pattern_str).with_context(|| format!("Invalid pattern: {}", pattern))?;
        let before = files.len();
        for entry in matches {
            let path = entry.with_context(|| format!("Failed to read match of {}", pattern))?;
            if path.is_file() {
                files.push(path);
            }
        }
        if files.len() == before {
            warn!(pattern = %pattern, "pattern matched no files");
        }
    }
    files.sort();
    files.dedup();
    if files.is_empty() {
        bail!("No scenario files matched {}", patterns.join(" "));
    }
    Ok(files)
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunSummary {
    Single(Summary),
    Multi(MultiSummary),
}

impl RunSummary {
    pub fn of(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Single {
                initial,
                surface,
                trajectory,
            } => RunSummary::Single(Summary::of(trajectory, initial, surface)),
            Outcome::Multi { trajectory, .. } => RunSummary::Multi(MultiSummary::of(trajectory)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub name: Option<String>,
    pub warnings: Vec<String>,
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scenario".to_string())
}

/// One export name per file. Stems shared by several files get their
/// parent directory as a prefix, and any name still taken gets `-2`, `-3`...
pub fn export_stems(files: &[PathBuf]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        *counts.entry(file_stem(file)).or_default() += 1;
    }

    let mut taken = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = file_stem(file);
            let base = match file.parent().and_then(Path::file_name) {
                Some(parent) if counts[&stem] > 1 => {
                    format!("{}-{}", parent.to_string_lossy(), stem)
                }
                _ => stem,
            };
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

fn run_file(
    path: &Path,
    overrides: &SimulationOverrides,
    target: Option<PathBuf>,
) -> Result<(Scenario, Vec<String>, RunSummary, Option<PathBuf>)> {
    let mut scenario = Scenario::load(path)?;
    overrides.apply(&mut scenario.simulation);
    let warnings = validate_scenario(&scenario)
        .with_context(|| format!("Invalid scenario '{}'", scenario.name))?
        .iter()
        .map(ToString::to_string)
        .collect();

    let outcome = scenario.run();
    let summary = RunSummary::of(&outcome);

    if let Some(target) = &target {
        export::write(target, &scenario, &outcome)?;
    }
    Ok((scenario, warnings, summary, target))
}

/// Run every file. Entries come back in input order.
pub fn run_files(
    files: &[PathBuf],
    overrides: &SimulationOverrides,
    out_dir: Option<&Path>,
) -> Vec<BatchEntry> {
    info!(files = files.len(), "running batch");
    let stems = export_stems(files);
    files
        .par_iter()
        .zip(stems.par_iter())
        .map(|(path, stem)| {
            let target = out_dir.map(|dir| dir.join(format!("{}.json", stem)));
            (path, run_file(path, overrides, target))
        })
        .map(|(path, result)| match result {
            Ok((scenario, warnings, summary, export)) => BatchEntry {
                path: path.clone(),
                name: Some(scenario.name),
                warnings,
                summary: Some(summary),
                export,
                error: None,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "scenario failed");
                BatchEntry {
                    path: path.clone(),
                    name: None,
                    warnings: Vec::new(),
                    summary: None,
                    export: None,
                    error: Some(format!("{:#}", e)),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioKind;
    use std::fs;

    fn write_preset(dir: &Path, file: &str, kind: ScenarioKind) {
        let mut scenario = Scenario::preset(kind);
        scenario.simulation.total_time = 0.2;
        fs::write(dir.join(file), scenario.to_toml_string().unwrap()).unwrap();
    }

    #[test]
    fn test_expand_patterns_sorted_and_deduped() {
        let dir = tempfile::tempdir().unwrap();
        write_preset(dir.path(), "b.toml", ScenarioKind::Walls);
        write_preset(dir.path(), "a.toml", ScenarioKind::Incline);
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let all = format!("{}/*.toml", dir.path().display());
        let one = format!("{}/a.toml", dir.path().display());
        let files = expand_patterns(&[all, one]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.toml", "b.toml"]);
    }

    #[test]
    fn test_expand_patterns_without_matches() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.toml", dir.path().display());
        assert!(expand_patterns(&[pattern]).is_err());
    }

    #[test]
    fn test_bad_file_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_preset(dir.path(), "good.toml", ScenarioKind::Horizontal);
        fs::write(dir.path().join("bad.toml"), "balls = 3").unwrap();
        let files = vec![dir.path().join("bad.toml"), dir.path().join("good.toml")];

        let entries = run_files(&files, &SimulationOverrides::default(), None);
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_ok());
        assert!(entries[0].error.as_deref().unwrap().contains("bad.toml"));
        assert!(entries[1].is_ok());
        assert_eq!(entries[1].name.as_deref(), Some("horizontal"));
    }

    #[test]
    fn test_exports_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        write_preset(dir.path(), "multi.toml", ScenarioKind::Multiball);
        let files = vec![dir.path().join("multi.toml")];

        let entries = run_files(&files, &SimulationOverrides::default(), Some(&out));
        assert!(entries[0].is_ok());
        assert!(matches!(entries[0].summary, Some(RunSummary::Multi(_))));
        assert_eq!(entries[0].export.as_deref(), Some(out.join("multi.json").as_path()));
        assert!(out.join("multi.json").exists());
    }

    #[test]
    fn test_export_stems_keep_shared_names_apart() {
        let files = [
            PathBuf::from("runs/a/x.toml"),
            PathBuf::from("runs/b/x.toml"),
            PathBuf::from("runs/a/y.toml"),
            PathBuf::from("runs/a-x.toml"),
        ];
        assert_eq!(export_stems(&files), ["a-x", "b-x", "y", "a-x-2"]);
    }

    #[test]
    fn test_same_stem_in_different_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        for (sub, kind) in [("a", ScenarioKind::Incline), ("b", ScenarioKind::Walls)] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            write_preset(&dir.path().join(sub), "x.toml", kind);
        }
        let files = vec![dir.path().join("a/x.toml"), dir.path().join("b/x.toml")];

        let entries = run_files(&files, &SimulationOverrides::default(), Some(&out));
        assert!(entries.iter().all(BatchEntry::is_ok));
        assert_eq!(entries[0].export.as_deref(), Some(out.join("a-x.json").as_path()));
        assert_eq!(entries[1].export.as_deref(), Some(out.join("b-x.json").as_path()));

        let first = fs::read_to_string(out.join("a-x.json")).unwrap();
        let second = fs::read_to_string(out.join("b-x.json")).unwrap();
        assert!(first.contains("incline"));
        assert!(second.contains("walls"));
    }
}
