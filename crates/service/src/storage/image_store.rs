use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::image::ImageKind;

/// File side of a product: where its image bytes are kept.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write the bytes under `area` with a generated name; returns the relative path.
    async fn store(&self, area: &str, kind: ImageKind, bytes: &[u8]) -> Result<String, ServiceError>;
    /// Remove a stored file; `false` when it was already gone.
    async fn remove(&self, path: &str) -> Result<bool, ServiceError>;
    async fn exists(&self, path: &str) -> Result<bool, ServiceError>;
}

/// Filesystem-backed store rooted at a single directory.
///
/// Partial writes go to a staging directory outside the root, which is
/// served publicly, and are renamed into place once complete.
#[derive(Clone, Debug)]
pub struct LocalImageStore {
    root: PathBuf,
    staging: PathBuf,
}

impl LocalImageStore {
    /// Stages beside the root, in `.<root name>.staging`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "storage".into());
        let staging = root.with_file_name(format!(".{name}.staging"));
        Self { root, staging }
    }

    /// Stage somewhere else; must be on the same filesystem as the root.
    pub fn with_staging<P: Into<PathBuf>>(mut self, staging: P) -> Self {
        self.staging = staging.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn staging(&self) -> &Path {
        &self.staging
    }

    /// Map a relative path onto the root, refusing anything that could escape it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ServiceError> {
        let rel = Path::new(path);
        let clean = !path.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(ServiceError::Storage(format!("invalid storage path: {path:?}")));
        }
        Ok(self.root.join(rel))
    }
}

fn io_err(action: &str, path: &Path, e: std::io::Error) -> ServiceError {
    ServiceError::Storage(format!("{action} {}: {e}", path.display()))
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, area: &str, kind: ImageKind, bytes: &[u8]) -> Result<String, ServiceError> {
        let dir = self.resolve(area)?;
        fs::create_dir_all(&dir).await.map_err(|e| io_err("create", &dir, e))?;

        fs::create_dir_all(&self.staging).await.map_err(|e| io_err("create", &self.staging, e))?;

        let name = format!("{}.{}", Uuid::new_v4().simple(), kind.extension());
        let target = dir.join(&name);
        let staging = self.staging.join(format!("{name}.part"));
        if let Err(e) = fs::write(&staging, bytes).await {
            let _ = fs::remove_file(&staging).await;
            return Err(io_err("write", &staging, e));
        }
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(io_err("rename", &target, e));
        }

        let rel = format!("{area}/{name}");
        debug!(path = %rel, size = bytes.len(), "image stored");
        Ok(rel)
    }

    async fn remove(&self, path: &str) -> Result<bool, ServiceError> {
        let abs = self.resolve(path)?;
        match fs::remove_file(&abs).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_err("remove", &abs, e)),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, ServiceError> {
        let abs = self.resolve(path)?;
        fs::try_exists(&abs).await.map_err(|e| io_err("stat", &abs, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::image::fixtures::png;

    #[tokio::test]
    async fn store_then_remove() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let store = LocalImageStore::new(tmp.path()).with_staging(tmp.path().join(".staging"));

        let rel = store.store("products", ImageKind::Png, &png()).await?;
        assert!(rel.starts_with("products/"));
        assert!(rel.ends_with(".png"));
        assert!(store.exists(&rel).await?);
        assert_eq!(std::fs::read(tmp.path().join(&rel))?, png());

        // no staging leftovers
        let names: Vec<_> = std::fs::read_dir(tmp.path().join("products"))?
            .map(|e| e.map(|e| e.file_name()))
            .collect::<Result<_, _>>()?;
        assert_eq!(names.len(), 1);

        assert!(store.remove(&rel).await?);
        assert!(!store.exists(&rel).await?);
        assert!(!store.remove(&rel).await?);
        Ok(())
    }

    #[tokio::test]
    async fn names_are_unique() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let store = LocalImageStore::new(tmp.path()).with_staging(tmp.path().join(".staging"));
        let a = store.store("products", ImageKind::Jpeg, b"a").await?;
        let b = store.store("products", ImageKind::Jpeg, b"b").await?;
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        Ok(())
    }

    #[tokio::test]
    async fn staging_stays_outside_the_public_root() -> Result<(), anyhow::Error> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("public");
        let store = LocalImageStore::new(&root);
        assert_eq!(store.staging(), tmp.path().join(".public.staging"));
        assert!(!store.staging().starts_with(&root));

        let rel = store.store("products", ImageKind::Png, &png()).await?;
        assert!(root.join(&rel).is_file());
        // only the finished file ever lands under the root
        let under_root: Vec<_> = std::fs::read_dir(root.join("products"))?.collect::<Result<_, _>>()?;
        assert_eq!(under_root.len(), 1);
        assert_eq!(std::fs::read_dir(store.staging())?.count(), 0);
        Ok(())
    }

    #[test]
    fn resolve_rejects_escapes() {
        let store = LocalImageStore::new("/srv/storage");
        assert!(store.resolve("products/x.png").is_ok());
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("products/../../x").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("").is_err());
    }
}
