use std::{net::SocketAddr, path::Path};

use axum::Router;
use common::{env::ensure_storage, utils::logging::init_logging_from_env};
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::product::IMAGE_AREA;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Host/port from the resolved config.
pub fn load_bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire storage, database and routes into a ready router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    ensure_storage(Path::new(&cfg.storage.root), &[IMAGE_AREA]).await?;
    ensure_sqlite_dir(&cfg.database.url).await?;

    let db = models::db::connect_and_migrate(&models::db::DatabaseConfig::from(&cfg.database)).await?;
    let state = AppState::new(db, &cfg.storage);

    Ok(routes::build_router(state, build_cors(), cfg.server.body_limit_bytes))
}

/// SQLite creates the database file but not its parent directory.
async fn ensure_sqlite_dir(url: &str) -> anyhow::Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:")) else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env()?;
    let app = build_app(&cfg).await?;

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, storage = %cfg.storage.root, "starting product catalog");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9090;
        let addr = load_bind_addr(&cfg).unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[tokio::test]
    async fn sqlite_parent_dir_is_created() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let db = tmp.path().join("nested/catalog.db");
        ensure_sqlite_dir(&format!("sqlite://{}?mode=rwc", db.display())).await?;
        assert!(tmp.path().join("nested").is_dir());
        let short = tmp.path().join("short/catalog.db");
        ensure_sqlite_dir(&format!("sqlite:{}", short.display())).await?;
        assert!(tmp.path().join("short").is_dir());
        ensure_sqlite_dir("sqlite::memory:").await?;
        ensure_sqlite_dir("sqlite:catalog.db").await?;
        ensure_sqlite_dir("postgres://localhost/catalog").await?;
        Ok(())
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(load_bind_addr(&cfg).is_err());
    }
}
