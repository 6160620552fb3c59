//! # gallery-database
//!
//! The catalog store. Defines the store traits the sync engine writes
//! through, the PostgreSQL implementation built on per-table
//! repositories, and an in-memory implementation for tests
//! behind the `memory` feature.

pub mod connection;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryCatalogStore;
pub use store::{CatalogCounts, ContentCatalog, FaqReplace, MediaCatalog, PackageReplace, PgCatalogStore};
