//! Config command - show or change settings

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use testaccounts_core::config::Config;
use testaccounts_core::SectionOrder;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show,
    /// Set the accounts CSV file
    SetFile {
        /// Path to the CSV file (relative paths resolve against the data directory)
        path: PathBuf,
    },
    /// Set the environment order (ascending or descending)
    SetOrder {
        order: SectionOrder,
    },
    /// Turn event publishing on selection on or off
    Events {
        #[command(subcommand)]
        state: EventsState,
    },
}

#[derive(Subcommand)]
pub enum EventsState {
    On,
    Off,
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;
    let mut config = Config::load(&data_dir)?;

    match command {
        Some(ConfigCommands::SetFile { path }) => {
            config.accounts_file = Some(path);
            config.save(&data_dir)?;
            output::success("Accounts file updated");
        }
        Some(ConfigCommands::SetOrder { order }) => {
            config.section_order = order;
            config.save(&data_dir)?;
            output::success(&format!("Section order set to {}", order.as_str()));
        }
        Some(ConfigCommands::Events { state }) => {
            config.publish_events = matches!(state, EventsState::On);
            config.save(&data_dir)?;
            if config.publish_events {
                println!("Event publishing is {}", "ON".green());
            } else {
                println!("Event publishing is {}", "OFF".yellow());
            }
        }
        Some(ConfigCommands::Show) | None => {
            let file = config
                .resolve_accounts_file(&data_dir)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string());
            println!("Data directory: {}", data_dir.display());
            println!("Accounts file:  {}", file);
            println!("Section order:  {}", config.section_order.as_str());
            println!("Delimiter:      {}", char::from(config.delimiter));
            println!(
                "Events:         {}",
                if config.publish_events { "on".green() } else { "off".yellow() }
            );
        }
    }
    Ok(())
}
