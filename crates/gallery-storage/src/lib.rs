//! # gallery-storage
//!
//! Document store providers for the gallery sync engine. The importers
//! download their JSON documents through [`DocumentStore`]; this crate
//! supplies the Supabase storage implementation, an S3-compatible one
//! behind the `s3` feature, and an in-memory one for tests behind the
//! `memory` feature.
//!
//! [`DocumentStore`]: gallery_core::traits::DocumentStore

pub mod factory;
pub mod providers;

pub use factory::build_document_store;
#[cfg(any(test, feature = "memory"))]
pub use providers::MemoryDocumentStore;
#[cfg(feature = "s3")]
pub use providers::S3DocumentStore;
pub use providers::SupabaseDocumentStore;
