//! Service layer
//!
//! The registry, its ordered projection, and the CSV ingestor that seeds it.

pub mod index;
pub mod ingest;
mod registry;

pub use index::{AccountIndex, SectionOrder};
pub use ingest::CsvIngestor;
pub use registry::AccountRegistry;
