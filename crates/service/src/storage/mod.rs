//! Storage abstractions for service layer
//!
//! Uploaded images live in named areas below a single storage root. Rows
//! reference them by the path relative to that root.

pub mod image;
pub mod image_store;

pub use image::{ImageKind, UploadedImage};
pub use image_store::{ImageStore, LocalImageStore};
