//! Adapter implementations
//!
//! Concrete implementations of the port traits.

pub mod event_bus;

pub use event_bus::{EventBroadcaster, EventBus, Subscription};
