//! CSV ingestion - build an account store from a delimited table
//!
//! Expected layout (columns matched by header name, in any order):
//! ```text
//! Environment|UserName|Password
//! Acc|Test1|pass123
//! Prod|Prod1|pass123
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::result::ParseError;
use crate::domain::{Account, AccountStore};

pub const ENVIRONMENT_COLUMN: &str = "Environment";
pub const USER_NAME_COLUMN: &str = "UserName";
pub const PASSWORD_COLUMN: &str = "Password";
pub const DEFAULT_DELIMITER: u8 = b'|';

/// Parses delimited account tables into an `AccountStore`
///
/// Rows missing a field are skipped; a missing header column or an
/// unreadable source fails the whole parse.
#[derive(Debug, Clone, Copy)]
pub struct CsvIngestor {
    delimiter: u8,
}

impl Default for CsvIngestor {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvIngestor {
    pub fn new() -> Self {
        Self::with_delimiter(DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Parse in-memory CSV text
    pub fn ingest_str(&self, data: &str) -> Result<AccountStore, ParseError> {
        self.ingest_reader(data.as_bytes())
    }

    /// Parse a CSV file
    pub fn ingest_path(&self, path: &Path) -> Result<AccountStore, ParseError> {
        let file = File::open(path)?;
        let store = self.ingest_reader(file)?;
        info!(
            path = %path.display(),
            environments = store.len(),
            "loaded accounts file"
        );
        Ok(store)
    }

    /// Parse a CSV byte stream
    pub fn ingest_reader<R: Read>(&self, source: R) -> Result<AccountStore, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(ParseError::MissingColumn(name))
        };
        let environment_idx = column(ENVIRONMENT_COLUMN)?;
        let user_name_idx = column(USER_NAME_COLUMN)?;
        let password_idx = column(PASSWORD_COLUMN)?;

        let mut store = AccountStore::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let (Some(environment), Some(user_name), Some(password)) = (
                record.get(environment_idx),
                record.get(user_name_idx),
                record.get(password_idx),
            ) else {
                debug!(line, fields = record.len(), "skipping row with missing fields");
                continue;
            };
            if environment.is_empty() {
                debug!(line, "skipping row with empty environment");
                continue;
            }

            store
                .entry(environment.to_string())
                .or_default()
                .insert(Account::new(user_name, password));
        }

        Ok(store)
    }
}
