//! Test Accounts Core - named test credentials grouped by environment
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Account, AccountSelected event, errors)
//! - **ports**: Trait definitions for collaborators (AccountBroadcaster)
//! - **services**: Registry, index projection and CSV ingestion
//! - **adapters**: Concrete implementations (in-process event bus)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use config::Config;

// Re-export commonly used types at crate root
pub use adapters::{EventBroadcaster, EventBus, Subscription};
pub use domain::result::{Error, ParseError, Result};
pub use domain::{
    Account, AccountSelected, AccountSelectedKeys, AccountStore, EnvironmentAccount,
    DEFAULT_ENVIRONMENT,
};
pub use ports::AccountBroadcaster;
pub use services::{AccountIndex, AccountRegistry, CsvIngestor, SectionOrder};

/// Main context for test account operations
///
/// Holds the configuration and a registry seeded from the configured
/// accounts file.
pub struct TestAccountContext {
    pub config: Config,
    pub registry: AccountRegistry,
}

impl TestAccountContext {
    /// Load configuration from `data_dir` and build the registry it describes
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        Self::with_config(config, data_dir)
    }

    /// Build the registry described by an already loaded configuration
    pub fn with_config(config: Config, data_dir: &Path) -> Result<Self> {
        let store = match config.resolve_accounts_file(data_dir) {
            Some(path) => CsvIngestor::with_delimiter(config.delimiter).ingest_path(&path)?,
            None => AccountStore::new(),
        };

        let broadcasters: Vec<Arc<dyn AccountBroadcaster>> = if config.publish_events {
            vec![Arc::new(EventBroadcaster::global())]
        } else {
            Vec::new()
        };

        let registry = AccountRegistry::with_broadcasters(store, broadcasters);
        info!(
            environments = registry.environments().len(),
            accounts = registry.account_count(),
            "registry ready"
        );

        Ok(Self { config, registry })
    }

    /// Ordered view using the configured section order
    pub fn index(&self) -> AccountIndex<'_> {
        self.registry.index_with(self.config.section_order)
    }
}
