//! Core domain entities
//!
//! Pure data structures shared by every layer - no I/O.

mod account;
mod event;
pub mod result;

pub use account::{Account, AccountStore, EnvironmentAccount, DEFAULT_ENVIRONMENT};
pub use event::{AccountSelected, AccountSelectedKeys};
