//! Document store implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;
pub mod supabase;

#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryDocumentStore;
#[cfg(feature = "s3")]
pub use s3::S3DocumentStore;
pub use supabase::SupabaseDocumentStore;
