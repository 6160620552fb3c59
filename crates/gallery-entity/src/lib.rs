//! # gallery-entity
//!
//! Catalog entity models. Every row struct derives `sqlx::FromRow`; the
//! `New*` structs are the validated insert payloads produced by the
//! reconciler and the document importers.

pub mod faq;
pub mod folder;
pub mod image;
pub mod package;
pub mod testimonial;

pub use faq::{Faq, FaqCategory, NewFaq, NewFaqCategory};
pub use folder::{EventDetails, Folder, FolderEdge, NewFolder};
pub use image::{Image, NewImage};
pub use package::{Addon, NewAddon, NewPackage, Package};
pub use testimonial::{NewTestimonial, Testimonial};
