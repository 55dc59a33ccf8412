//! Account domain model

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment used whenever a caller does not name one
pub const DEFAULT_ENVIRONMENT: &str = "Test";

/// Environment name -> accounts registered under it
///
/// A key is never present with an empty set.
pub type AccountStore = HashMap<String, HashSet<Account>>;

/// A test login credential
///
/// Equality, hashing and ordering are structural over both fields. Ordering
/// is by user name first, which is the row order used by list views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    user_name: String,
    password: String,
}

impl Account {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_name)
    }
}

/// An account together with the environment it is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentAccount {
    pub environment: String,
    pub account: Account,
}

impl EnvironmentAccount {
    pub fn new(environment: impl Into<String>, account: Account) -> Self {
        Self {
            environment: environment.into(),
            account,
        }
    }
}
