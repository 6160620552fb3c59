//! Provider traits defined in `gallery-core` and implemented by the
//! provider crates.

pub mod document;
pub mod namespace;

pub use document::DocumentStore;
pub use namespace::{Asset, AssetPage, NamespaceClient};
