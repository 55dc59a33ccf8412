//! CLI command implementations

pub mod config;
pub mod environments;
pub mod list;
pub mod pick;
pub mod select;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use testaccounts_core::config::Config;
use testaccounts_core::{Account, AccountBroadcaster, AccountSelected, TestAccountContext};
use tracing::debug;

use crate::output;

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TESTACCOUNTS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".testaccounts"))
        .context("Could not find home directory")
}

/// Load the context, letting `--file` override the configured accounts file
pub fn get_context(file: Option<PathBuf>) -> Result<TestAccountContext> {
    let data_dir = get_data_dir()?;
    debug!(data_dir = %data_dir.display(), "loading context");

    let mut config = Config::load(&data_dir)
        .with_context(|| format!("Failed to load settings from {:?}", data_dir))?;
    if let Some(file) = file {
        config.override_accounts_file(&file)?;
    }

    if config.accounts_file.is_none() {
        anyhow::bail!(
            "No accounts file configured. Pass --file, set TESTACCOUNTS_FILE, \
             or run 'tam config set-file <PATH>'"
        );
    }

    TestAccountContext::with_config(config, &data_dir).context("Failed to load accounts")
}

/// Broadcaster that prints each selection, standing in for a login form
pub fn printing_broadcaster(json: bool) -> Arc<dyn AccountBroadcaster> {
    Arc::new(move |account: &Account, environment: &str| {
        output::print_selection(&AccountSelected::new(account.clone(), environment), json);
    })
}
