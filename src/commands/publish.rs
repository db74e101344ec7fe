//! Publish command - push the project to a new remote repository

use std::io;

use anyhow::Result;
use clap::Args;

use ballroll::publish::{self, PublishOptions};
use ballroll::{Config, RecordingRunner, SystemRunner};

#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Remote repository URL (prompted for when omitted)
    #[arg(long)]
    pub url: Option<String>,

    /// Remote name
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch to push
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Print the git commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

impl PublishArgs {
    pub fn options(self, base: PublishOptions) -> PublishOptions {
        PublishOptions {
            url: self.url.or(base.url),
            remote: self.remote.unwrap_or(base.remote),
            branch: self.branch.unwrap_or(base.branch),
            message: self.message.unwrap_or(base.message),
        }
    }
}

/// Execute the publish command, returning the exit code to pass through
pub fn execute(args: PublishArgs) -> Result<i32> {
    let config = Config::load()?;
    let dry_run = args.dry_run;
    let options = args.options(config.publish);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    if dry_run {
        let runner = RecordingRunner::dry_run(&["git"]);
        return publish::run(&runner, &mut input, &mut output, &options);
    }
    publish::run(&SystemRunner, &mut input, &mut output, &options)
}
