//! PostgreSQL repositories, one per catalog table group.

pub mod faq;
pub mod folder;
pub mod image;
pub mod package;
pub mod testimonial;

pub use faq::{FaqReplace, FaqRepository};
pub use folder::FolderRepository;
pub use image::ImageRepository;
pub use package::{PackageReplace, PackageRepository};
pub use testimonial::TestimonialRepository;
