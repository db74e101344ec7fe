//! Start the Streamlit web UI
//!
//! The UI itself is a Python application. This module only makes sure an
//! interpreter and the UI framework are present, installs the requirements
//! when they are not, and hands over to `<python> -m streamlit run`.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::process::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchOptions {
    pub interpreter: String,
    /// Python module that serves the app
    pub module: String,
    pub requirements: PathBuf,
    pub app: PathBuf,
    /// Passed through after `run <app>`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            module: "streamlit".to_string(),
            requirements: PathBuf::from("requirements.txt"),
            app: PathBuf::from("app.py"),
            extra_args: Vec::new(),
        }
    }
}

/// Returns the exit code of the first step that failed, or of the UI.
pub fn run(runner: &dyn CommandRunner, opts: &LaunchOptions) -> Result<i32> {
    let python = &opts.interpreter;

    let Some(found) = runner.which(python) else {
        eprintln!(
            "{} {} not found. Install Python 3 to run the web UI.",
            "❌".red(),
            python
        );
        return Ok(1);
    };
    info!(interpreter = %found.display(), "found interpreter");

    let import = format!("import {}", opts.module);
    if !runner.probe(python, &["-c", import.as_str()])? {
        println!(
            "{} {} is not installed, installing from {}",
            "📦".yellow(),
            opts.module,
            opts.requirements.display()
        );
        let requirements = opts.requirements.to_string_lossy();
        let code = runner.run(python, &["-m", "pip", "install", "-r", &*requirements])?;
        if code != 0 {
            eprintln!("{} Dependency installation failed (exit {})", "❌".red(), code);
            return Ok(code);
        }
    }

    let app = opts.app.to_string_lossy();
    let mut args = vec!["-m", opts.module.as_str(), "run", &*app];
    args.extend(opts.extra_args.iter().map(String::as_str));

    println!("{} Starting web UI: {}", "🚀".green(), opts.app.display());
    runner.run(python, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;

    #[test]
    fn test_missing_interpreter_runs_nothing() {
        let runner = RecordingRunner::new();
        assert_eq!(run(&runner, &LaunchOptions::default()).unwrap(), 1);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_installed_module_skips_pip() {
        let runner = RecordingRunner::new().with_program("python3");
        assert_eq!(run(&runner, &LaunchOptions::default()).unwrap(), 0);
        assert_eq!(
            runner.calls(),
            vec![
                "python3 -c \"import streamlit\"",
                "python3 -m streamlit run app.py",
            ]
        );
    }

    #[test]
    fn test_missing_module_installs_requirements() {
        let runner = RecordingRunner::new()
            .with_program("python3")
            .failing("python3 -c \"import streamlit\"", 1);
        let opts = LaunchOptions {
            extra_args: vec!["--server.port".into(), "8502".into()],
            ..LaunchOptions::default()
        };
        assert_eq!(run(&runner, &opts).unwrap(), 0);
        assert_eq!(
            runner.calls(),
            vec![
                "python3 -c \"import streamlit\"",
                "python3 -m pip install -r requirements.txt",
                "python3 -m streamlit run app.py --server.port 8502",
            ]
        );
    }

    #[test]
    fn test_failed_install_returns_its_code() {
        let runner = RecordingRunner::new()
            .with_program("python3")
            .failing("python3 -c \"import streamlit\"", 1)
            .failing("python3 -m pip install -r requirements.txt", 2);
        assert_eq!(run(&runner, &LaunchOptions::default()).unwrap(), 2);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_ui_exit_code_passes_through() {
        let runner = RecordingRunner::new()
            .with_program("python3")
            .failing("python3 -m streamlit run app.py", 130);
        assert_eq!(run(&runner, &LaunchOptions::default()).unwrap(), 130);
    }
}
