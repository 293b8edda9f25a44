/// Database connection and migration tests
pub mod db_tests;

/// CRUD operations on the product entity
pub mod crud_tests;

use crate::db::{connect_and_migrate, DatabaseConfig};
use sea_orm::DatabaseConnection;

/// Fresh migrated database; in-memory SQLite unless `TEST_DATABASE_URL` is set.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let cfg = DatabaseConfig { url, max_connections: 5, min_connections: 1, ..DatabaseConfig::default() };
    connect_and_migrate(&cfg).await
}
