use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "Rolling and sliding ball simulation",
    long_about = None
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a preset or scenario file and report the result
    Simulate {
        #[command(flatten)]
        args: commands::simulate::SimulateArgs,
    },

    /// Run scenario files in parallel
    Batch {
        #[command(flatten)]
        args: commands::batch::BatchArgs,
    },

    /// Choose and tune scenarios from a menu
    Interactive,

    /// Start the Streamlit web UI
    Launch {
        #[command(flatten)]
        args: commands::launch::LaunchArgs,
    },

    /// Push this project to a new remote git repository
    Publish {
        #[command(flatten)]
        args: commands::publish::PublishArgs,
    },

    /// Check tools, config and repository state
    Doctor {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn exit_with(code: i32) {
    if code != 0 {
        std::process::exit(code);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ballroll::logging::init(cli.verbose);

    match cli.command {
        Commands::Simulate { args } => {
            commands::simulate::execute(args)?;
        }
        Commands::Batch { args } => {
            commands::batch::execute(args)?;
        }
        Commands::Interactive => {
            commands::interactive::execute()?;
        }
        Commands::Launch { args } => {
            exit_with(commands::launch::execute(args)?);
        }
        Commands::Publish { args } => {
            exit_with(commands::publish::execute(args)?);
        }
        Commands::Doctor { json } => {
            exit_with(commands::doctor::execute(json)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::parse_from(["ballroll", "doctor", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Doctor { json: false }));
    }

    #[test]
    fn test_launch_trailing_args() {
        let cli = Cli::parse_from([
            "ballroll",
            "launch",
            "--dry-run",
            "--",
            "--server.port",
            "8502",
        ]);
        let Commands::Launch { args } = cli.command else {
            panic!("expected launch");
        };
        assert!(args.dry_run);
        assert_eq!(args.extra, ["--server.port", "8502"]);
    }
}
