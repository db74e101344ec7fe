//! Launch command - start the Streamlit web UI
//!
//! # Usage
//!
//! ```bash
//! ballroll launch                          # python3 -m streamlit run app.py
//! ballroll launch --interpreter python3.12
//! ballroll launch -- --server.port 8502    # extra arguments for streamlit
//! ballroll launch --dry-run
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ballroll::launch::{self, LaunchOptions};
use ballroll::{Config, RecordingRunner, SystemRunner};

#[derive(Debug, Clone, Default, Args)]
pub struct LaunchArgs {
    /// Python interpreter (default from config, else python3)
    #[arg(long)]
    pub interpreter: Option<String>,

    /// Streamlit app script
    #[arg(long)]
    pub app: Option<PathBuf>,

    /// Requirements file installed when streamlit is missing
    #[arg(long)]
    pub requirements: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Arguments passed to `streamlit run`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl LaunchArgs {
    pub fn options(self, base: LaunchOptions) -> LaunchOptions {
        LaunchOptions {
            interpreter: self.interpreter.unwrap_or(base.interpreter),
            app: self.app.unwrap_or(base.app),
            requirements: self.requirements.unwrap_or(base.requirements),
            extra_args: if self.extra.is_empty() {
                base.extra_args
            } else {
                self.extra
            },
            module: base.module,
        }
    }
}

/// Execute the launch command, returning the exit code to pass through
pub fn execute(args: LaunchArgs) -> Result<i32> {
    let config = Config::load()?;
    let dry_run = args.dry_run;
    let options = args.options(config.launch);

    if dry_run {
        let runner = RecordingRunner::dry_run(&[options.interpreter.as_str()]);
        return launch::run(&runner, &options);
    }
    launch::run(&SystemRunner, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let base = LaunchOptions {
            interpreter: "python3.11".into(),
            extra_args: vec!["--server.headless".into(), "true".into()],
            ..LaunchOptions::default()
        };
        let args = LaunchArgs {
            app: Some(PathBuf::from("ui/main.py")),
            ..LaunchArgs::default()
        };
        let opts = args.options(base);
        assert_eq!(opts.interpreter, "python3.11");
        assert_eq!(opts.app, PathBuf::from("ui/main.py"));
        assert_eq!(opts.extra_args.len(), 2);
        assert_eq!(opts.module, "streamlit");
    }
}
