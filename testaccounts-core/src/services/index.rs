//! Index projection - the registry as ordered sections and rows
//!
//! Sections are environments, rows are the accounts of an environment
//! sorted ascending by user name. Every lookup is bounds-checked and
//! answers `None` when out of range, so list views can probe freely.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::result::Error;
use crate::domain::{Account, EnvironmentAccount};

use super::registry::AccountRegistry;

/// Order in which environments appear as sections
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionOrder {
    #[default]
    Ascending,
    Descending,
    #[serde(skip)]
    Custom(fn(&str, &str) -> Ordering),
}

impl SectionOrder {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            SectionOrder::Ascending => a.cmp(b),
            SectionOrder::Descending => b.cmp(a),
            SectionOrder::Custom(compare) => compare(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionOrder::Ascending => "ascending",
            SectionOrder::Descending => "descending",
            SectionOrder::Custom(_) => "custom",
        }
    }
}

impl FromStr for SectionOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SectionOrder::Ascending),
            "desc" | "descending" => Ok(SectionOrder::Descending),
            other => Err(Error::config(format!(
                "unknown section order '{}', expected 'ascending' or 'descending'",
                other
            ))),
        }
    }
}

struct Section {
    environment: String,
    accounts: Vec<Account>,
}

/// Read-only, ordered view over an `AccountRegistry`
///
/// The ordering is computed once on construction; the registry is borrowed
/// for the lifetime of the view and so cannot change underneath it.
pub struct AccountIndex<'a> {
    registry: &'a AccountRegistry,
    sections: Vec<Section>,
}

impl<'a> AccountIndex<'a> {
    pub fn new(registry: &'a AccountRegistry, order: SectionOrder) -> Self {
        let mut sections: Vec<Section> = registry
            .store()
            .iter()
            .map(|(environment, accounts)| {
                let mut accounts: Vec<Account> = accounts.iter().cloned().collect();
                accounts.sort();
                Section {
                    environment: environment.clone(),
                    accounts,
                }
            })
            .collect();
        sections.sort_by(|a, b| order.compare(&a.environment, &b.environment));

        Self { registry, sections }
    }

    /// Number of environments
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn environment_name(&self, section: usize) -> Option<&str> {
        self.sections.get(section).map(|s| s.environment.as_str())
    }

    /// Number of accounts in a section
    pub fn row_count(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(|s| s.accounts.len())
    }

    pub fn account_at(&self, section: usize, row: usize) -> Option<EnvironmentAccount> {
        let section = self.sections.get(section)?;
        let account = section.accounts.get(row)?;
        Some(EnvironmentAccount::new(section.environment.clone(), account.clone()))
    }

    /// Select the account at a position; returns `false` if nothing is there
    pub fn select_at(&self, section: usize, row: usize) -> bool {
        match self.account_at(section, row) {
            Some(pair) => self.registry.select_pair(&pair),
            None => false,
        }
    }

    /// Reverse lookup of the (section, row) holding an account
    pub fn position_of(&self, environment: &str, account: &Account) -> Option<(usize, usize)> {
        let section = self
            .sections
            .iter()
            .position(|s| s.environment == environment)?;
        let row = self.sections[section]
            .accounts
            .binary_search(account)
            .ok()?;
        Some((section, row))
    }

    /// Sections in display order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[Account])> + '_ {
        self.sections
            .iter()
            .map(|s| (s.environment.as_str(), s.accounts.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::AccountStore;

    fn registry() -> AccountRegistry {
        let mut registry = AccountRegistry::with_broadcasters(AccountStore::new(), Vec::new());
        registry.register_in(Account::new("TestUser", "password"), "test");
        registry.register_in(Account::new("ProdUser", "password"), "prod");
        registry.register_in(Account::new("AProdUser", "password"), "prod");
        registry
    }

    #[test]
    fn test_sections_sorted_ascending() {
        let registry = registry();
        let index = registry.index();

        assert_eq!(index.section_count(), 2);
        assert_eq!(index.environment_name(0), Some("prod"));
        assert_eq!(index.environment_name(1), Some("test"));
        assert_eq!(index.environment_name(2), None);
    }

    #[test]
    fn test_rows_sorted_by_user_name() {
        let registry = registry();
        let index = registry.index();

        assert_eq!(
            index.account_at(0, 0).map(|p| p.account),
            Some(Account::new("AProdUser", "password"))
        );
        assert_eq!(
            index.account_at(0, 1).map(|p| p.account),
            Some(Account::new("ProdUser", "password"))
        );
        let pair = index.account_at(1, 0).unwrap();
        assert_eq!(pair.environment, "test");
        assert_eq!(pair.account, Account::new("TestUser", "password"));
    }

    #[test]
    fn test_out_of_range_lookups_are_none() {
        let registry = registry();
        let index = registry.index();

        assert!(index.account_at(0, 99).is_none());
        assert!(index.account_at(99, 0).is_none());
        assert!(index.account_at(usize::MAX, usize::MAX).is_none());
        assert_eq!(index.row_count(0), Some(2));
        assert_eq!(index.row_count(2), None);
        assert_eq!(index.row_count(usize::MAX), None);
    }

    #[test]
    fn test_descending_and_custom_order() {
        let registry = registry();

        let index = registry.index_with(SectionOrder::Descending);
        assert_eq!(index.environment_name(0), Some("test"));

        fn by_length(a: &str, b: &str) -> Ordering {
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        let index = registry.index_with(SectionOrder::Custom(by_length));
        assert_eq!(index.environment_name(0), Some("prod"));
        assert_eq!(index.environment_name(1), Some("test"));
    }

    #[test]
    fn test_select_at_forwards_to_registry() {
        let mut registry = registry();
        let selections = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&selections);
        registry.add_broadcaster(Arc::new(move |account: &Account, env: &str| {
            sink.lock().unwrap().push((account.clone(), env.to_string()));
        }));

        let index = registry.index();
        assert!(index.select_at(0, 1));
        assert!(!index.select_at(5, 0));

        let selections = selections.lock().unwrap();
        assert_eq!(
            *selections,
            vec![(Account::new("ProdUser", "password"), "prod".to_string())]
        );
    }

    #[test]
    fn test_position_of() {
        let registry = registry();
        let index = registry.index();

        assert_eq!(index.position_of("prod", &Account::new("ProdUser", "password")), Some((0, 1)));
        assert_eq!(index.position_of("prod", &Account::new("TestUser", "password")), None);
        assert_eq!(index.position_of("missing", &Account::new("TestUser", "password")), None);
    }

    #[test]
    fn test_empty_registry_has_no_sections() {
        let registry = AccountRegistry::with_broadcasters(AccountStore::new(), Vec::new());
        let index = registry.index();
        assert_eq!(index.section_count(), 0);
        assert_eq!(index.environment_name(0), None);
        assert!(!index.select_at(0, 0));
        assert_eq!(index.sections().count(), 0);
    }

    #[test]
    fn test_section_order_from_str() {
        assert!(matches!("Descending".parse::<SectionOrder>(), Ok(SectionOrder::Descending)));
        assert!(matches!("asc".parse::<SectionOrder>(), Ok(SectionOrder::Ascending)));
        assert!("sideways".parse::<SectionOrder>().is_err());
    }
}
