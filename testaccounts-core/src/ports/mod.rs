//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The registry
//! depends only on these traits, not on concrete implementations.

mod broadcaster;

pub use broadcaster::AccountBroadcaster;
