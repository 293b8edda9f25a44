//! Product resource handler: validation, row persistence and the image file
//! that belongs to each row.

pub mod domain;
pub mod form;
pub mod repository;
pub mod service;

/// Storage area holding product images.
pub const IMAGE_AREA: &str = "products";
