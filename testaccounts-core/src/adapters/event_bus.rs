//! In-process event bus and the broadcaster that publishes to it
//!
//! Lets listeners elsewhere in an application (a login form, for example)
//! react to account selection without holding a reference to the registry.
//! Delivery is synchronous: `publish` returns after every subscriber ran.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use tracing::debug;

use crate::domain::{Account, AccountSelected};
use crate::ports::AccountBroadcaster;

type Handler = Arc<dyn Fn(&AccountSelected) + Send + Sync>;

static GLOBAL_BUS: OnceLock<Arc<EventBus>> = OnceLock::new();

#[derive(Default)]
struct SubscriberRegistry {
    next_id: u64,
    // Keyed by subscription id, so iteration follows subscription order.
    handlers: BTreeMap<u64, Handler>,
}

/// Synchronous publish/subscribe hub for `AccountSelected` events
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<SubscriberRegistry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide bus
    pub fn global() -> Arc<EventBus> {
        Arc::clone(GLOBAL_BUS.get_or_init(|| Arc::new(EventBus::new())))
    }

    /// Register a handler; it stays subscribed until the returned guard is dropped
    pub fn subscribe<F>(self: &Arc<Self>, handler: F) -> Subscription
    where
        F: Fn(&AccountSelected) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.handlers.insert(id, Arc::new(handler));

        Subscription {
            id,
            bus: Arc::downgrade(self),
        }
    }

    /// Deliver an event to every current subscriber, returning how many ran
    pub fn publish(&self, event: &AccountSelected) -> usize {
        // Snapshot first so handlers can subscribe or unsubscribe while running.
        let handlers: Vec<Handler> = self.lock().handlers.values().cloned().collect();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().handlers.remove(&id);
    }

    fn lock(&self) -> MutexGuard<'_, SubscriberRegistry> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard for a live subscription; dropping it unsubscribes the handler
#[must_use = "dropping a Subscription unsubscribes its handler immediately"]
pub struct Subscription {
    id: u64,
    bus: Weak<EventBus>,
}

impl Subscription {
    /// Unsubscribe now
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

/// Broadcaster that publishes every selection as an `AccountSelected` event
#[derive(Clone)]
pub struct EventBroadcaster {
    bus: Arc<EventBus>,
}

impl EventBroadcaster {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Broadcaster targeting the process-wide bus
    pub fn global() -> Self {
        Self::new(EventBus::global())
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

impl AccountBroadcaster for EventBroadcaster {
    fn selected(&self, account: &Account, environment: &str) {
        let event = AccountSelected::new(account.clone(), environment);
        let delivered = self.bus.publish(&event);
        debug!(
            event = AccountSelected::NAME,
            environment,
            user_name = account.user_name(),
            delivered,
            "published selection"
        );
    }
}
