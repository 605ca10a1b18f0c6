use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use claudekit::usage::DEFAULT_LOOKBACK_DAYS;
use colored::Colorize;
use std::io;

#[derive(Parser)]
#[command(name = "claudekit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Repository toolkit for Claude Code", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy Claude Code template files into the current directory
    Init {
        /// Back up and overwrite existing files instead of skipping them
        #[arg(short, long)]
        replace: bool,

        /// Skip the overwrite confirmation
        #[arg(short, long)]
        yes: bool,

        /// Print the decision trace without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the Claude Code setup of the current directory
    Check {
        /// Emit the report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Work-session snapshots for the current repository
    #[command(subcommand)]
    Session(claudekit::cli::session::SessionCommands),

    /// Estimate API usage and cost from local logs
    Usage {
        /// Lookback window in days
        #[arg(short, long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        days: u64,

        /// Also write a timestamped CSV export
        #[arg(long)]
        csv: bool,
    },

    /// Show or switch the authentication mode
    #[command(subcommand)]
    Auth(claudekit::cli::auth::AuthCommands),

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> claudekit::Result<i32> {
    match cli.command {
        Commands::Init {
            replace,
            yes,
            dry_run,
        } => {
            claudekit::cli::init::run(replace, yes, dry_run)?;
        }

        Commands::Check { json } => {
            let complete = claudekit::cli::check::run(json)?;
            if !complete {
                return Ok(1);
            }
        }

        Commands::Session(cmd) => {
            claudekit::cli::session::run(cmd)?;
        }

        Commands::Usage { days, csv } => {
            claudekit::cli::usage::run(days, csv)?;
        }

        Commands::Auth(cmd) => {
            claudekit::cli::auth::run(cmd)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "claudekit", &mut io::stdout());
        }
    }

    Ok(0)
}
