//! Doctor command - check the tools ballroll shells out to
//!
//! Exit codes follow severity: 0 healthy, 2 warning (web UI unavailable,
//! config unreadable), 3 critical (git missing).

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use ballroll::environment::{Environment, Health};
use ballroll::{paths, SystemRunner};

#[derive(Serialize)]
struct HealthCheck<'a> {
    status: Health,
    environment: &'a Environment,
    recommendations: Vec<String>,
}

/// Execute the doctor command, returning the exit code
pub fn execute(json_output: bool) -> Result<i32> {
    if !json_output {
        println!("🏥 Checking environment...");
    }

    let env = Environment::detect(&SystemRunner, paths::config_path())?;
    let status = env.health();

    if json_output {
        let check = HealthCheck {
            status,
            environment: &env,
            recommendations: env.recommendations(),
        };
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        display(&env, status);
    }

    Ok(status.exit_code())
}

fn display(env: &Environment, status: Health) {
    println!("\nballroll {} on {}/{}", env.version, env.os, env.arch);

    println!("\nTools:");
    for (name, tool) in &env.tools {
        if tool.available {
            println!(
                "  {} {:<10} {} ({})",
                "✓".green(),
                name,
                tool.version.as_deref().unwrap_or("unknown version"),
                tool.used_by
            );
        } else {
            let marker = if tool.required { "✗".red() } else { "⚠️ ".yellow() };
            println!("  {} {:<10} not found ({})", marker, name, tool.used_by);
        }
    }
    match env.ui_module {
        Some(true) => println!("  {} web UI module importable", "✓".green()),
        Some(false) => println!("  {} web UI module not installed", "⚠️ ".yellow()),
        None => {}
    }

    println!("\nConfig: {}", env.config.path.display());
    match (&env.config.error, env.config.exists) {
        (Some(error), _) => println!("  {} {}", "✗".red(), error),
        (None, true) => println!("  {} loaded", "✓".green()),
        (None, false) => println!("  using defaults (no file)"),
    }

    let repo = &env.repository;
    println!("\nRepository:");
    if repo.is_repo {
        println!(
            "  branch {}, {} modified file(s)",
            repo.branch.as_deref().unwrap_or("(detached)"),
            repo.modified_files
        );
        match &repo.remote_url {
            Some(url) => println!("  remote {}", url),
            None => println!("  no remote yet (run `ballroll publish`)"),
        }
    } else {
        println!("  not a git repository");
    }

    let recommendations = env.recommendations();
    if !recommendations.is_empty() {
        println!("\nRecommendations:");
        for r in &recommendations {
            println!("  • {}", r);
        }
    }

    let label = match status {
        Health::Healthy => "healthy".green(),
        Health::Warning => "warning".yellow(),
        Health::Critical => "critical".red(),
    };
    println!("\nStatus: {}", label);
}
