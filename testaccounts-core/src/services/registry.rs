//! Account registry - environment-grouped credentials and selection fan-out

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::adapters::EventBroadcaster;
use crate::domain::result::ParseError;
use crate::domain::{Account, AccountStore, EnvironmentAccount, DEFAULT_ENVIRONMENT};
use crate::ports::AccountBroadcaster;

use super::index::{AccountIndex, SectionOrder};
use super::ingest::CsvIngestor;

/// Owns the environment -> accounts mapping and the selection listeners
///
/// Not internally synchronized: share it across threads only behind a lock.
pub struct AccountRegistry {
    accounts: AccountStore,
    broadcasters: Vec<Arc<dyn AccountBroadcaster>>,
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRegistry {
    /// Create an empty registry that publishes selections on the global event bus
    pub fn new() -> Self {
        Self::from_store(AccountStore::new())
    }

    /// Create a registry pre-seeded with `store`, publishing on the global event bus
    pub fn from_store(store: AccountStore) -> Self {
        Self::with_broadcasters(store, vec![Arc::new(EventBroadcaster::global())])
    }

    /// Create a registry with an explicit list of broadcasters (possibly empty)
    pub fn with_broadcasters(
        mut store: AccountStore,
        broadcasters: Vec<Arc<dyn AccountBroadcaster>>,
    ) -> Self {
        store.retain(|_, accounts| !accounts.is_empty());
        Self {
            accounts: store,
            broadcasters,
        }
    }

    /// Build a registry from pipe-delimited CSV text
    pub fn from_csv_str(data: &str) -> Result<Self, ParseError> {
        Ok(Self::from_store(CsvIngestor::new().ingest_str(data)?))
    }

    /// Build a registry from a CSV byte stream
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        Ok(Self::from_store(CsvIngestor::new().ingest_reader(reader)?))
    }

    /// Build a registry from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, ParseError> {
        Ok(Self::from_store(CsvIngestor::new().ingest_path(path)?))
    }

    // === Registration ===

    /// Register an account in the default environment
    pub fn register(&mut self, account: Account) {
        self.register_in(account, DEFAULT_ENVIRONMENT);
    }

    /// Register an account in `environment`; registering twice is a no-op
    pub fn register_in(&mut self, account: Account, environment: &str) {
        trace!(environment, user_name = account.user_name(), "register");
        self.accounts
            .entry(environment.to_string())
            .or_default()
            .insert(account);
    }

    /// Deregister an account from the default environment
    pub fn deregister(&mut self, account: &Account) {
        self.deregister_from(account, DEFAULT_ENVIRONMENT);
    }

    /// Remove an account from `environment`, dropping the environment once empty
    pub fn deregister_from(&mut self, account: &Account, environment: &str) {
        let Some(accounts) = self.accounts.get_mut(environment) else {
            return;
        };
        accounts.remove(account);
        trace!(environment, user_name = account.user_name(), "deregister");

        if accounts.is_empty() {
            self.accounts.remove(environment);
        }
    }

    /// Merge every account in `store` into the registry
    pub fn extend(&mut self, store: AccountStore) {
        for (environment, accounts) in store {
            if accounts.is_empty() {
                continue;
            }
            self.accounts.entry(environment).or_default().extend(accounts);
        }
    }

    // === Queries ===

    /// Accounts in the default environment
    pub fn accounts(&self) -> Option<HashSet<Account>> {
        self.accounts_in(DEFAULT_ENVIRONMENT)
    }

    /// Copy of the accounts in `environment`, or `None` if it has none
    pub fn accounts_in(&self, environment: &str) -> Option<HashSet<Account>> {
        self.accounts.get(environment).cloned()
    }

    /// Every environment that currently holds at least one account, unordered
    pub fn environments(&self) -> Vec<String> {
        self.accounts.keys().cloned().collect()
    }

    pub fn contains(&self, account: &Account, environment: &str) -> bool {
        self.accounts
            .get(environment)
            .is_some_and(|accounts| accounts.contains(account))
    }

    /// Total number of accounts across all environments
    pub fn account_count(&self) -> usize {
        self.accounts.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Copy of the whole store
    pub fn snapshot(&self) -> AccountStore {
        self.accounts.clone()
    }

    pub(crate) fn store(&self) -> &AccountStore {
        &self.accounts
    }

    // === Selection ===

    /// Append a listener; the same listener may be added more than once
    pub fn add_broadcaster(&mut self, broadcaster: Arc<dyn AccountBroadcaster>) {
        self.broadcasters.push(broadcaster);
    }

    pub fn broadcaster_count(&self) -> usize {
        self.broadcasters.len()
    }

    /// Select an account in the default environment
    pub fn select(&self, account: &Account) -> bool {
        self.select_in(account, DEFAULT_ENVIRONMENT)
    }

    /// Notify every broadcaster, in order, that `account` was selected
    ///
    /// Does nothing and returns `false` when the account is not registered
    /// under `environment`.
    pub fn select_in(&self, account: &Account, environment: &str) -> bool {
        if !self.contains(account, environment) {
            debug!(
                environment,
                user_name = account.user_name(),
                "ignoring selection of unregistered account"
            );
            return false;
        }

        debug!(
            environment,
            user_name = account.user_name(),
            broadcasters = self.broadcasters.len(),
            "account selected"
        );
        for broadcaster in &self.broadcasters {
            broadcaster.selected(account, environment);
        }
        true
    }

    pub fn select_pair(&self, pair: &EnvironmentAccount) -> bool {
        self.select_in(&pair.account, &pair.environment)
    }

    // === Projection ===

    /// Ordered view with environments sorted ascending
    pub fn index(&self) -> AccountIndex<'_> {
        AccountIndex::new(self, SectionOrder::default())
    }

    pub fn index_with(&self, order: SectionOrder) -> AccountIndex<'_> {
        AccountIndex::new(self, order)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MockBroadcaster {
        selections: Mutex<Vec<(Account, String)>>,
    }

    impl MockBroadcaster {
        fn did_select(&self, account: &Account) -> bool {
            self.selections.lock().unwrap().iter().any(|(a, _)| a == account)
        }

        fn count(&self) -> usize {
            self.selections.lock().unwrap().len()
        }
    }

    impl AccountBroadcaster for MockBroadcaster {
        fn selected(&self, account: &Account, environment: &str) {
            self.selections
                .lock()
                .unwrap()
                .push((account.clone(), environment.to_string()));
        }
    }

    struct PanickingBroadcaster;

    impl AccountBroadcaster for PanickingBroadcaster {
        fn selected(&self, _account: &Account, _environment: &str) {
            panic!("listener failed");
        }
    }

    fn quiet_registry() -> AccountRegistry {
        AccountRegistry::with_broadcasters(AccountStore::new(), Vec::new())
    }

    #[test]
    fn test_register_default_environment() {
        let mut registry = quiet_registry();
        registry.register(Account::new("u", "p"));

        let accounts = registry.accounts().unwrap();
        assert!(accounts.contains(&Account::new("u", "p")));
        assert_eq!(registry.environments(), vec![DEFAULT_ENVIRONMENT.to_string()]);
    }

    #[test]
    fn test_register_per_environment() {
        let mut registry = quiet_registry();
        registry.register_in(Account::new("accUser", "password"), "Acc");
        registry.register_in(Account::new("prodUser", "password"), "Prod");

        let prod = registry.accounts_in("Prod").unwrap();
        assert_eq!(prod.len(), 1);
        assert!(prod.contains(&Account::new("prodUser", "password")));
        assert!(registry.accounts().is_none());
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = quiet_registry();
        registry.register_in(Account::new("abc", "123"), "Env1");
        registry.register_in(Account::new("abc", "123"), "Env1");
        assert_eq!(registry.accounts_in("Env1").unwrap().len(), 1);
    }

    #[test]
    fn test_second_register_adds_to_existing_environment() {
        let mut registry = quiet_registry();
        registry.register_in(Account::new("abc", "password"), "Test1");
        registry.register_in(Account::new("def", "password"), "Test1");
        assert_eq!(registry.accounts_in("Test1").unwrap().len(), 2);
    }

    #[test]
    fn test_deregister_removes_empty_environment() {
        let mut registry = quiet_registry();
        let first = Account::new("abc", "password");
        let second = Account::new("def", "password");
        registry.register_in(first.clone(), "Test1");
        registry.register_in(second.clone(), "Test1");

        registry.deregister_from(&first, "Test1");
        assert!(!registry.accounts_in("Test1").unwrap().contains(&first));

        registry.deregister_from(&second, "Test1");
        assert!(registry.accounts_in("Test1").is_none());
        assert!(registry.environments().is_empty());
    }

    #[test]
    fn test_deregister_unknown_is_noop() {
        let mut registry = quiet_registry();
        registry.register(Account::new("abc", "123"));

        registry.deregister_from(&Account::new("abc", "123"), "Nowhere");
        registry.deregister(&Account::new("other", "123"));

        assert_eq!(registry.account_count(), 1);
    }

    #[test]
    fn test_environments_empty_for_new_registry() {
        assert!(quiet_registry().environments().is_empty());
        assert!(quiet_registry().is_empty());
    }

    #[test]
    fn test_returned_set_is_a_snapshot() {
        let mut registry = quiet_registry();
        registry.register(Account::new("a", "1"));

        let mut snapshot = registry.accounts().unwrap();
        snapshot.insert(Account::new("b", "2"));
        registry.register(Account::new("c", "3"));

        assert_eq!(snapshot.len(), 2);
        assert!(!registry.contains(&Account::new("b", "2"), DEFAULT_ENVIRONMENT));
    }

    #[test]
    fn test_with_broadcasters_drops_empty_sets() {
        let mut store = AccountStore::new();
        store.insert("Empty".to_string(), HashSet::new());
        store.insert("Acc".to_string(), HashSet::from([Account::new("u", "p")]));

        let registry = AccountRegistry::with_broadcasters(store, Vec::new());
        assert_eq!(registry.environments(), vec!["Acc".to_string()]);
    }

    #[test]
    fn test_extend_merges_store() {
        let mut registry = quiet_registry();
        registry.register_in(Account::new("a", "1"), "Acc");

        let mut store = AccountStore::new();
        store.insert("Acc".to_string(), HashSet::from([Account::new("b", "2")]));
        store.insert("Prod".to_string(), HashSet::from([Account::new("c", "3")]));
        store.insert("Empty".to_string(), HashSet::new());
        registry.extend(store);

        assert_eq!(registry.accounts_in("Acc").unwrap().len(), 2);
        assert_eq!(registry.account_count(), 3);
        assert!(registry.accounts_in("Empty").is_none());
    }

    #[test]
    fn test_select_broadcasts_to_every_listener() {
        let mut registry = quiet_registry();
        let account = Account::new("TestUser", "password");
        registry.register(account.clone());

        let first = Arc::new(MockBroadcaster::default());
        let second = Arc::new(MockBroadcaster::default());
        registry.add_broadcaster(first.clone());
        registry.add_broadcaster(second.clone());

        assert!(registry.select(&account));
        assert!(first.did_select(&account));
        assert!(second.did_select(&account));
    }

    #[test]
    fn test_select_unregistered_does_not_broadcast() {
        let mut registry = quiet_registry();
        let mock = Arc::new(MockBroadcaster::default());
        registry.add_broadcaster(mock.clone());

        let account = Account::new("TestUser", "password");
        assert!(!registry.select(&account));

        registry.register_in(account.clone(), "Acc");
        assert!(!registry.select_in(&account, "Prod"));
        assert_eq!(mock.count(), 0);
    }

    #[test]
    fn test_select_runs_broadcasters_in_order() {
        let mut registry = quiet_registry();
        registry.register_in(Account::new("u", "p"), "Acc");

        let order = Arc::new(Mutex::new(Vec::new()));
        for label in ["one", "two", "three"] {
            let order = Arc::clone(&order);
            registry.add_broadcaster(Arc::new(move |_: &Account, env: &str| {
                order.lock().unwrap().push(format!("{label}:{env}"));
            }));
        }

        registry.select_pair(&EnvironmentAccount::new("Acc", Account::new("u", "p")));
        assert_eq!(*order.lock().unwrap(), vec!["one:Acc", "two:Acc", "three:Acc"]);
    }

    #[test]
    fn test_same_broadcaster_added_twice_is_called_twice() {
        let mut registry = quiet_registry();
        registry.register(Account::new("u", "p"));
        let mock = Arc::new(MockBroadcaster::default());
        registry.add_broadcaster(mock.clone());
        registry.add_broadcaster(mock.clone());

        registry.select(&Account::new("u", "p"));
        assert_eq!(mock.count(), 2);
        assert_eq!(registry.broadcaster_count(), 2);
    }

    #[test]
    #[should_panic(expected = "listener failed")]
    fn test_panicking_broadcaster_propagates() {
        let mut registry = quiet_registry();
        registry.register(Account::new("u", "p"));
        registry.add_broadcaster(Arc::new(PanickingBroadcaster));

        registry.select(&Account::new("u", "p"));
    }

    #[test]
    fn test_new_registry_installs_event_broadcaster() {
        assert_eq!(AccountRegistry::new().broadcaster_count(), 1);
        assert_eq!(AccountRegistry::default().broadcaster_count(), 1);
    }
}
