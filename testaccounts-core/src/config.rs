//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "accounts": {
//!     "file": "accounts.csv",
//!     "sectionOrder": "ascending",
//!     "delimiter": "|",
//!     "publishEvents": true
//!   }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::services::ingest::DEFAULT_DELIMITER;
use crate::services::SectionOrder;

pub const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    accounts: AccountSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
    #[serde(default)]
    section_order: SectionOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delimiter: Option<char>,
    #[serde(default = "default_true")]
    publish_events: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            file: None,
            section_order: SectionOrder::default(),
            delimiter: None,
            publish_events: true,
            other: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Test account configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file to seed the registry from; relative paths resolve against the data directory
    pub accounts_file: Option<PathBuf>,
    pub section_order: SectionOrder,
    pub delimiter: u8,
    /// Install the event-bus broadcaster on the loaded registry
    pub publish_events: bool,
    _raw_settings: SettingsFile,
    _overrides: Overrides,
}

/// Values that came from the environment or the command line rather than settings.json
#[derive(Debug, Clone, Default)]
struct Overrides {
    accounts_file: Option<PathBuf>,
    section_order: Option<SectionOrder>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts_file: None,
            section_order: SectionOrder::default(),
            delimiter: DEFAULT_DELIMITER,
            publish_events: true,
            _raw_settings: SettingsFile::default(),
            _overrides: Overrides::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment overrides:
    /// - `TESTACCOUNTS_FILE` replaces the accounts file (relative to the working directory)
    /// - `TESTACCOUNTS_SECTION_ORDER` replaces the section order
    ///
    /// Overrides are not written back by [`Config::save`].
    pub fn load(data_dir: &Path) -> Result<Self> {
        let env_file = std::env::var("TESTACCOUNTS_FILE").ok();
        let env_order = std::env::var("TESTACCOUNTS_SECTION_ORDER").ok();
        Self::load_with(data_dir, env_file.as_deref(), env_order.as_deref())
    }

    fn load_with(
        data_dir: &Path,
        env_file: Option<&str>,
        env_order: Option<&str>,
    ) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let mut overrides = Overrides::default();

        let accounts_file = match env_file.filter(|path| !path.is_empty()) {
            Some(path) => {
                let path = absolute_from_cwd(Path::new(path))?;
                overrides.accounts_file = Some(path.clone());
                Some(path)
            }
            None => raw.accounts.file.clone(),
        };

        let section_order = match env_order.filter(|order| !order.is_empty()) {
            Some(order) => {
                let order: SectionOrder = order.parse()?;
                overrides.section_order = Some(order);
                order
            }
            None => raw.accounts.section_order,
        };

        let delimiter = match raw.accounts.delimiter {
            Some(c) => delimiter_byte(c)?,
            None => DEFAULT_DELIMITER,
        };

        Ok(Self {
            accounts_file,
            section_order,
            delimiter,
            publish_events: raw.accounts.publish_events,
            _raw_settings: raw,
            _overrides: overrides,
        })
    }

    /// Use `path` as the accounts file for this run only
    ///
    /// Relative paths resolve against the working directory.
    pub fn override_accounts_file(&mut self, path: &Path) -> Result<()> {
        let path = absolute_from_cwd(path)?;
        self._overrides.accounts_file = Some(path.clone());
        self.accounts_file = Some(path);
        Ok(())
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        if matches!(self.section_order, SectionOrder::Custom(_)) {
            return Err(Error::config("a custom section order cannot be saved"));
        }

        let mut settings = read_settings(data_dir)?;

        // An override left untouched since load keeps the stored value
        if self._overrides.accounts_file.is_none()
            || self._overrides.accounts_file != self.accounts_file
        {
            settings.accounts.file = self.accounts_file.clone();
        }
        let order_overridden = self
            ._overrides
            .section_order
            .is_some_and(|order| order.as_str() == self.section_order.as_str());
        if !order_overridden {
            settings.accounts.section_order = self.section_order;
        }
        settings.accounts.delimiter =
            (self.delimiter != DEFAULT_DELIMITER).then(|| char::from(self.delimiter));
        settings.accounts.publish_events = self.publish_events;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Accounts file as an absolute path, if one is configured
    pub fn resolve_accounts_file(&self, data_dir: &Path) -> Option<PathBuf> {
        self.accounts_file.as_ref().map(|file| {
            if file.is_absolute() {
                file.clone()
            } else {
                data_dir.join(file)
            }
        })
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings");
        SettingsFile::default()
    }))
}

fn absolute_from_cwd(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn delimiter_byte(c: char) -> Result<u8> {
    match u8::try_from(c) {
        Ok(b) if b.is_ascii() && b != b'\n' && b != b'\r' && b != b'"' => Ok(b),
        _ => Err(Error::config(format!("unsupported delimiter '{}'", c))),
    }
}
