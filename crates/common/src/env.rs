//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage tree exists at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the storage root and each named area below it exist.
pub async fn ensure_storage(root: &Path, areas: &[&str]) -> anyhow::Result<()> {
    if tokio::fs::metadata(root).await.is_err() {
        warn!(root = %root.display(), "storage root not found; creating it");
    }
    for area in areas {
        let dir = root.join(area);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    }
    info!(root = %root.display(), areas = areas.len(), "storage tree ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_storage_creates_nested_areas() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("storage");
        ensure_storage(&root, &["products", "misc"]).await?;
        assert!(root.join("products").is_dir());
        assert!(root.join("misc").is_dir());

        // idempotent
        ensure_storage(&root, &["products"]).await?;
        Ok(())
    }
}
