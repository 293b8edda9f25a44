use super::setup_test_db;
use crate::db::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Statement};
use anyhow::Result;

#[tokio::test]
async fn migrations_are_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    // running again is a no-op
    migration::Migrator::up(&db, None).await?;
    let pending = migration::Migrator::get_pending_migrations(&db).await?;
    assert!(pending.is_empty());
    Ok(())
}

#[tokio::test]
async fn product_table_is_queryable() -> Result<()> {
    let db = setup_test_db().await?;
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(backend, "SELECT COUNT(*) AS n FROM product".to_string()))
        .await?
        .expect("count row");
    let n: i64 = row.try_get("", "n")?;
    assert_eq!(n, 0);
    Ok(())
}

#[test]
fn in_memory_detection() {
    let mem = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
    assert!(mem.is_in_memory());
    let file = DatabaseConfig { url: "sqlite://data/catalog.db?mode=rwc".into(), ..DatabaseConfig::default() };
    assert!(!file.is_in_memory());
    let pg = DatabaseConfig { url: "postgres://u:p@localhost/db".into(), ..DatabaseConfig::default() };
    assert!(!pg.is_in_memory());
}

#[test]
fn converts_from_toml_settings() {
    let settings = configs::load_from_str("[database]\nurl = \"sqlite::memory:\"\nacquire_timeout_secs = 7\n").unwrap();
    let cfg = DatabaseConfig::from(&settings.database);
    assert_eq!(cfg.url, "sqlite::memory:");
    assert_eq!(cfg.acquire_timeout, std::time::Duration::from_secs(7));
    assert_eq!(cfg.max_connections, 10);
}
