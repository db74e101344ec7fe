//! User configuration (`~/.ballroll/config.toml`)
//!
//! ```toml
//! [simulation]
//! dt = 0.005
//! substeps = 20
//!
//! [launch]
//! interpreter = "python3.12"
//! app = "~/src/ballroll-ui/app.py"
//!
//! [publish]
//! branch = "trunk"
//! ```
//!
//! Every key is optional. A missing file means defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::launch::LaunchOptions;
use crate::paths;
use crate::publish::PublishOptions;
use crate::simulation::SimulationConfig;

/// Integration settings applied on top of every scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substeps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g: Option<f64>,
}

impl SimulationOverrides {
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(substeps) = self.substeps {
            config.substeps = substeps;
        }
        if let Some(g) = self.g {
            config.g = g;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationOverrides,
    pub launch: LaunchOptions,
    pub publish: PublishOptions,
}

impl Config {
    /// Load from `$BALLROLL_CONFIG` or `~/.ballroll/config.toml`.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.expand_paths();
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    fn expand_paths(&mut self) {
        let launch = &mut self.launch;
        launch.app = paths::expand(&launch.app.to_string_lossy());
        launch.requirements = paths::expand(&launch.requirements.to_string_lossy());
    }
}
