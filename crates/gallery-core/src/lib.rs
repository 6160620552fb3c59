//! # gallery-core
//!
//! Core crate for the gallery catalog sync engine. Contains the provider
//! traits for the external media namespace and the document store,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other gallery crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
