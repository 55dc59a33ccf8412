//! Broadcaster port - selection listeners

use crate::domain::Account;

/// Listener notified when a registered account is selected
///
/// Broadcasters are invoked synchronously, in the order they were added,
/// on the same call stack as the selection. A panicking broadcaster is not
/// caught; the panic propagates to whoever called `select`.
pub trait AccountBroadcaster: Send + Sync {
    fn selected(&self, account: &Account, environment: &str);
}

impl<F> AccountBroadcaster for F
where
    F: Fn(&Account, &str) + Send + Sync,
{
    fn selected(&self, account: &Account, environment: &str) {
        self(account, environment)
    }
}
