//! Git helpers for publishing and diagnostics
//!
//! Handles:
//! - The first-push command sequence
//! - Repository detection and status for `doctor`

pub mod operations;

pub use operations::{current_branch, first_push, is_git_repo, remote_url, status_count};

use anyhow::Result;
use serde::Serialize;

use crate::process::CommandRunner;

/// Snapshot of the working directory's repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    pub is_repo: bool,
    pub branch: Option<String>,
    pub remote_url: Option<String>,
    pub modified_files: usize,
}

impl RepoStatus {
    pub fn detect(runner: &dyn CommandRunner, remote: &str) -> Result<Self> {
        if !is_git_repo(runner)? {
            return Ok(Self::default());
        }
        Ok(Self {
            is_repo: true,
            branch: current_branch(runner).ok().filter(|b| !b.is_empty()),
            remote_url: remote_url(runner, remote)?,
            modified_files: status_count(runner).unwrap_or(0),
        })
    }
}
