//! Service layer providing the product resource handler on top of models.
//! - Keeps image files and product rows in step for every mutation.
//! - Reuses field validation and entity definitions from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
#[cfg(test)]
pub mod test_support;
pub mod pagination;
pub mod storage;
pub mod db;
pub mod product;
