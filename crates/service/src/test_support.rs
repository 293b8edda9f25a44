#![cfg(test)]
use sea_orm::DatabaseConnection;
use models::db::{connect_and_migrate, DatabaseConfig};

/// Fresh migrated database per test; in-memory SQLite unless `TEST_DATABASE_URL` is set.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let cfg = DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
        acquire_timeout: std::time::Duration::from_secs(10),
        ..DatabaseConfig::default()
    };
    connect_and_migrate(&cfg).await
}
