//! Single source of truth for the ballroll filesystem layout.
//!
//! This module defines WHERE data lives. It has no I/O and no validation.
//!
//! ```text
//! ~/.ballroll/
//! ├── config.toml      # User config
//! ├── scenarios/       # Saved scenario files
//! └── exports/         # Default export target
//! ```

use std::path::PathBuf;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "BALLROLL_CONFIG";

/// User's ballroll home directory: `~/.ballroll/`
pub fn home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ballroll")
}

/// Default config file: `~/.ballroll/config.toml`
pub fn default_config_path() -> PathBuf {
    home().join("config.toml")
}

/// Config file in effect: `$BALLROLL_CONFIG` when set, else the default.
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => expand(&path),
        _ => default_config_path(),
    }
}

/// Saved scenarios: `~/.ballroll/scenarios/`
pub fn scenarios_dir() -> PathBuf {
    home().join("scenarios")
}

/// Default export target: `~/.ballroll/exports/`
pub fn exports_dir() -> PathBuf {
    home().join("exports")
}

/// Expand a leading `~` and `$VARS`. Unresolvable input is kept as given.
pub fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
