//! Selection event published on the event bus

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::account::Account;

/// Key identifiers of the `AccountSelected` payload
///
/// These names are part of the public contract read by external subscribers.
pub struct AccountSelectedKeys;

impl AccountSelectedKeys {
    pub const ACCOUNT: &'static str = "account";
    pub const ENVIRONMENT: &'static str = "environment";
}

/// Published whenever a registered account is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSelected {
    pub account: Account,
    pub environment: String,
}

impl AccountSelected {
    /// Event name
    pub const NAME: &'static str = "AccountSelected";

    pub fn new(account: Account, environment: impl Into<String>) -> Self {
        Self {
            account,
            environment: environment.into(),
        }
    }

    /// Render the event as a named JSON envelope
    pub fn to_json(&self) -> JsonValue {
        json!({
            "event": Self::NAME,
            AccountSelectedKeys::ACCOUNT: self.account,
            AccountSelectedKeys::ENVIRONMENT: self.environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_uses_contract_keys() {
        let event = AccountSelected::new(Account::new("TestUser", "password"), "Test");
        let json = event.to_json();

        assert_eq!(json["event"], "AccountSelected");
        assert_eq!(json[AccountSelectedKeys::ACCOUNT]["userName"], "TestUser");
        assert_eq!(json[AccountSelectedKeys::ACCOUNT]["password"], "password");
        assert_eq!(json[AccountSelectedKeys::ENVIRONMENT], "Test");
    }

    #[test]
    fn test_payload_field_names_match_keys() {
        let event = AccountSelected::new(Account::new("u", "p"), "Acc");
        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key(AccountSelectedKeys::ACCOUNT));
        assert!(object.contains_key(AccountSelectedKeys::ENVIRONMENT));
    }
}
