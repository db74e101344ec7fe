//! Host environment detection for `doctor`.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::git::RepoStatus;
use crate::process::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub available: bool,
    pub version: Option<String>,
    pub path: Option<String>,
    /// Missing required tools make the environment critical
    pub required: bool,
    /// What needs it
    pub used_by: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub path: PathBuf,
    pub exists: bool,
    /// Parse error, if the file exists but is unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Warning,
    Critical,
}

impl Health {
    pub fn exit_code(self) -> i32 {
        match self {
            Health::Healthy => 0,
            Health::Warning => 2,
            Health::Critical => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Environment {
    pub os: String,
    pub arch: String,
    pub version: String,
    pub current_dir: String,
    pub tools: BTreeMap<String, ToolInfo>,
    /// Whether the web UI module imports in the configured interpreter
    pub ui_module: Option<bool>,
    pub config: ConfigStatus,
    pub repository: RepoStatus,
}

impl Environment {
    pub fn detect(runner: &dyn CommandRunner, config_path: PathBuf) -> Result<Self> {
        let (config, config_status) = match Config::load_from(&config_path) {
            Ok(config) => {
                let exists = config_path.exists();
                let status = ConfigStatus {
                    path: config_path,
                    exists,
                    error: None,
                };
                (config, status)
            }
            Err(e) => {
                let status = ConfigStatus {
                    path: config_path,
                    exists: true,
                    error: Some(format!("{:#}", e)),
                };
                (Config::default(), status)
            }
        };

        let interpreter = config.launch.interpreter.clone();
        let mut tools = BTreeMap::new();
        tools.insert(
            "git".to_string(),
            detect_tool(runner, "git", true, "publish"),
        );
        tools.insert(
            interpreter.clone(),
            detect_tool(runner, &interpreter, false, "launch"),
        );

        let ui_module = if tools[&interpreter].available {
            let import = format!("import {}", config.launch.module);
            Some(runner.probe(&interpreter, &["-c", import.as_str()])?)
        } else {
            None
        };

        let repository = if tools["git"].available {
            RepoStatus::detect(runner, &config.publish.remote)?
        } else {
            RepoStatus::default()
        };

        Ok(Self {
            os: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            current_dir: env::current_dir()?.display().to_string(),
            tools,
            ui_module,
            config: config_status,
            repository,
        })
    }

    pub fn health(&self) -> Health {
        if self.tools.values().any(|t| t.required && !t.available) {
            Health::Critical
        } else if self.tools.values().any(|t| !t.available)
            || self.ui_module == Some(false)
            || self.config.error.is_some()
        {
            Health::Warning
        } else {
            Health::Healthy
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (name, tool) in &self.tools {
            if !tool.available {
                out.push(format!("Install {}: {}", name, install_hint(tool.used_by)));
            }
        }
        if self.ui_module == Some(false) {
            out.push("Run `ballroll launch` once to install the web UI requirements".to_string());
        }
        if let Some(error) = &self.config.error {
            out.push(format!("Fix {}: {}", self.config.path.display(), error));
        }
        out
    }
}

fn detect_tool(
    runner: &dyn CommandRunner,
    name: &str,
    required: bool,
    used_by: &'static str,
) -> ToolInfo {
    let Some(path) = runner.which(name) else {
        return ToolInfo {
            available: false,
            version: None,
            path: None,
            required,
            used_by,
        };
    };

    // Python prints its version on stderr before 3.4
    let version = runner
        .capture(name, &["--version"])
        .ok()
        .filter(|c| c.success())
        .and_then(|c| {
            let text = if c.stdout.trim().is_empty() { c.stderr } else { c.stdout };
            text.lines().next().map(|l| l.trim().to_string())
        })
        .filter(|v| !v.is_empty());

    ToolInfo {
        available: true,
        version,
        path: Some(path.display().to_string()),
        required,
        used_by,
    }
}

fn install_hint(used_by: &str) -> &'static str {
    match used_by {
        "publish" => "brew install git (macOS) or apt install git (Linux)",
        "launch" => "https://www.python.org/downloads/",
        _ => "Check your package manager",
    }
}
