//! Low-level git operations

use anyhow::Result;

use crate::process::CommandRunner;

/// Argument lists for the first push of a fresh repository, in order.
pub fn first_push(url: &str, remote: &str, branch: &str, message: &str) -> Vec<Vec<String>> {
    let step = |args: &[&str]| args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
    vec![
        step(&["init"]),
        step(&["add", "."]),
        step(&["commit", "-m", message]),
        step(&["branch", "-M", branch]),
        step(&["remote", "add", remote, url]),
        step(&["push", "-u", remote, branch]),
    ]
}

/// Check if current directory is a git repository
pub fn is_git_repo(runner: &dyn CommandRunner) -> Result<bool> {
    runner.probe("git", &["rev-parse", "--git-dir"])
}

/// Get the current branch name
pub fn current_branch(runner: &dyn CommandRunner) -> Result<String> {
    let output = runner.capture("git", &["branch", "--show-current"])?;
    if !output.success() {
        anyhow::bail!("Failed to get current branch");
    }
    Ok(output.stdout.trim().to_string())
}

/// Get remote URL, `None` when the remote is not configured
pub fn remote_url(runner: &dyn CommandRunner, remote: &str) -> Result<Option<String>> {
    let output = runner.capture("git", &["remote", "get-url", remote])?;
    if !output.success() {
        return Ok(None);
    }
    let url = output.stdout.trim();
    Ok((!url.is_empty()).then(|| url.to_string()))
}

/// Count modified files
pub fn status_count(runner: &dyn CommandRunner) -> Result<usize> {
    let output = runner.capture("git", &["status", "--porcelain"])?;
    if !output.success() {
        anyhow::bail!("Failed to get git status");
    }
    Ok(output.stdout.lines().filter(|l| !l.trim().is_empty()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;

    #[test]
    fn test_first_push_order() {
        let steps = first_push("u", "origin", "main", "msg");
        let firsts: Vec<&str> = steps.iter().map(|s| s[0].as_str()).collect();
        assert_eq!(firsts, ["init", "add", "commit", "branch", "remote", "push"]);
        assert_eq!(steps[4], ["remote", "add", "origin", "u"]);
    }

    #[test]
    fn test_queries_go_through_runner() {
        let runner = RecordingRunner::new()
            .with_output("git branch --show-current", "main\n")
            .with_output("git status --porcelain", " M src/lib.rs\n?? notes.txt\n")
            .failing("git remote get-url origin", 2);
        assert!(is_git_repo(&runner).unwrap());
        assert_eq!(current_branch(&runner).unwrap(), "main");
        assert_eq!(status_count(&runner).unwrap(), 2);
        assert_eq!(remote_url(&runner, "origin").unwrap(), None);
    }
}
