//! Batch command - run scenario files in parallel

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use ballroll::batch::{self, BatchEntry, RunSummary};
use ballroll::{paths, Config};

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Scenario files or glob patterns (quote globs to keep the shell out)
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Write one JSON export per scenario into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(short, long)]
    pub json: bool,
}

fn headline(entry: &BatchEntry) -> String {
    match &entry.summary {
        Some(RunSummary::Single(s)) => format!(
            "{:.2} s, {:.3} m travelled, final speed {:.3} m/s",
            s.duration, s.distance, s.final_speed
        ),
        Some(RunSummary::Multi(s)) => format!("{} balls, {:.2} s", s.balls, s.duration),
        None => String::new(),
    }
}

/// Execute the batch command
pub fn execute(args: BatchArgs) -> Result<()> {
    let config = Config::load()?;
    let files = batch::expand_patterns(&args.patterns)?;
    let out_dir = args.out_dir.as_ref().map(|d| paths::expand(&d.to_string_lossy()));

    if !args.json {
        println!("🎱 Running {} scenario(s)...", files.len());
    }
    let entries = batch::run_files(&files, &config.simulation, out_dir.as_deref());
    let failed = entries.iter().filter(|e| !e.is_ok()).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            let label = entry.path.display().to_string();
            match &entry.error {
                None => {
                    println!("  {} {} ({})", "✓".green(), label, headline(entry));
                    for warning in &entry.warnings {
                        println!("      {} {}", "⚠️ ".yellow(), warning);
                    }
                    if let Some(export) = &entry.export {
                        println!("      💾 {}", export.display());
                    }
                }
                Some(error) => println!("  {} {}: {}", "✗".red(), label, error),
            }
        }
        println!(
            "\n{} succeeded, {} failed",
            entries.len() - failed,
            failed
        );
    }

    if failed > 0 {
        bail!("{} of {} scenarios failed", failed, entries.len());
    }
    Ok(())
}
