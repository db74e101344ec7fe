//! Publish the project to a new remote git repository
//!
//! Runs the fixed first-push sequence (init, add, commit, rename branch,
//! add remote, push) and stops at the first command that fails.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::git;
use crate::process::{command_line, CommandRunner};
use crate::prompt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishOptions {
    /// Prompted for when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub remote: String,
    pub branch: String,
    pub message: String,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            url: None,
            remote: "origin".to_string(),
            branch: "main".to_string(),
            message: "Initial commit: ball physics simulation".to_string(),
        }
    }
}

pub fn run(
    runner: &dyn CommandRunner,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    opts: &PublishOptions,
) -> Result<i32> {
    let url = match &opts.url {
        Some(url) => url.trim().to_string(),
        None => prompt::read_line(input, output, "Enter remote repository URL: ")?
            .unwrap_or_default(),
    };
    if url.is_empty() {
        writeln!(output, "{} Repository URL cannot be empty", "❌".red())
            .context("Failed to write to terminal")?;
        return Ok(1);
    }

    for step in git::operations::first_push(&url, &opts.remote, &opts.branch, &opts.message) {
        let args: Vec<&str> = step.iter().map(String::as_str).collect();
        info!(command = %command_line("git", &args), "publish step");
        let code = runner.run("git", &args)?;
        if code != 0 {
            warn!(code, command = %command_line("git", &args), "publish step failed");
            writeln!(
                output,
                "{} {} failed (exit {})",
                "❌".red(),
                command_line("git", &args),
                code
            )
            .context("Failed to write to terminal")?;
            return Ok(code);
        }
    }

    writeln!(output, "{} Pushed to {} ({})", "✅".green(), url, opts.branch)
        .context("Failed to write to terminal")?;
    Ok(0)
}
