//! Scenario files, batch runs and exports through the public API

use std::fs;
use std::path::Path;

use ballroll::batch::{expand_patterns, run_files, RunSummary};
use ballroll::config::SimulationOverrides;
use ballroll::scenario::{Outcome, Scenario, ScenarioError};
use ballroll::validation::{validate_scenario, ValidationError};

const BOUNCE: &str = r#"
name = "bounce"
kind = "walls"
walls = 1.0
restitution = 0.8

[[balls]]
mass = 0.5
radius = 0.05
velocity = [2.0, 1.0]

[surface]
friction = 0.1

[simulation]
total_time = 2.0
"#;

const COLLIDE: &str = r#"
name = "collide"
walls = 2.0

[[balls]]
mass = 1.0
radius = 0.1
position = [-1.0, 0.0]
velocity = [1.0, 0.0]
rolling = false

[[balls]]
mass = 1.0
radius = 0.1
position = [1.0, 0.0]
velocity = [-1.0, 0.0]
rolling = false

[surface]
friction = 0.0

[simulation]
total_time = 1.5
"#;

#[test]
fn test_load_and_run_scenario_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bounce.toml");
    fs::write(&path, BOUNCE).unwrap();

    let scenario = Scenario::load(&path).unwrap();
    assert_eq!(scenario.name, "bounce");
    assert!(validate_scenario(&scenario).unwrap().is_empty());

    let Outcome::Single { trajectory, .. } = scenario.run() else {
        panic!("one ball should give a single outcome");
    };
    let bound = 1.0 + 1e-9;
    assert!(trajectory
        .samples
        .iter()
        .all(|s| s.position.x.abs() <= bound && s.position.y.abs() <= bound));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Scenario::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
}

#[test]
fn test_ball_outside_walls_is_rejected() {
    let mut scenario = Scenario::from_toml_str(BOUNCE, Path::new("bounce.toml")).unwrap();
    scenario.balls[0].position.x = 1.5;
    assert_eq!(
        validate_scenario(&scenario).unwrap_err(),
        ValidationError::OutsideWalls(0)
    );
}

#[test]
fn test_batch_over_glob() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bounce.toml"), BOUNCE).unwrap();
    fs::write(dir.path().join("collide.toml"), COLLIDE).unwrap();
    let out = dir.path().join("exports");

    let files = expand_patterns(&[format!("{}/*.toml", dir.path().display())]).unwrap();
    assert_eq!(files.len(), 2);

    let overrides = SimulationOverrides {
        substeps: Some(4),
        ..SimulationOverrides::default()
    };
    let entries = run_files(&files, &overrides, Some(&out));
    assert!(entries.iter().all(|e| e.is_ok()), "{entries:?}");

    let Some(RunSummary::Multi(multi)) = &entries[1].summary else {
        panic!("collide.toml should be multi-ball");
    };
    assert_eq!(multi.balls, 2);
    assert!((multi.final_momentum.x - multi.initial_momentum.x).abs() < 1e-9);

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("bounce.json")).unwrap()).unwrap();
    assert_eq!(exported["scenario"]["name"], "bounce");
    assert_eq!(exported["kind"], "single");
}
