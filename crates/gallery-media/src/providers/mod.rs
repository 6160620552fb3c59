//! Namespace client implementations.

pub mod cloudinary;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use cloudinary::CloudinaryClient;
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryNamespace;
