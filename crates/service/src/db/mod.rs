//! Direct database operations backing the SeaORM repositories.

pub mod product_service;
