//! Test account manager CLI - a debug menu for test credentials

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{config, environments, list, pick, select, status};

/// tam - pick test credentials by environment
#[derive(Parser)]
#[command(name = "tam", version, about, long_about = None)]
struct Cli {
    /// Accounts CSV file (overrides settings)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List accounts grouped by environment
    List {
        /// Only list this environment
        environment: Option<String>,
        /// Show passwords instead of masking them
        #[arg(long)]
        show_passwords: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List environments in display order
    Environments {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select an account by environment and user name
    Select {
        /// Environment the account is registered under
        environment: String,
        /// User name of the account
        user_name: String,
        /// Output the selection event as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick an account from an interactive menu
    Pick {
        /// Output the selection event as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration and account counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let file = cli.file;
    match cli.command {
        Commands::List { environment, show_passwords, json } => {
            list::run(file, environment.as_deref(), show_passwords, json)
        }
        Commands::Environments { json } => environments::run(file, json),
        Commands::Select { environment, user_name, json } => {
            select::run(file, &environment, &user_name, json)
        }
        Commands::Pick { json } => pick::run(file, json),
        Commands::Status { json } => status::run(file, json),
        Commands::Config { command } => config::run(command),
    }
}
