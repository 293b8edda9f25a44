use std::path::PathBuf;
use std::sync::Arc;

use service::product::{repository::SeaOrmProductRepository, service::ProductService};
use service::storage::LocalImageStore;

pub type CatalogService = ProductService<SeaOrmProductRepository, LocalImageStore>;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<CatalogService>,
    pub storage: StorageSettings,
}

/// Where stored images are served from.
#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub root: PathBuf,
    pub public_prefix: String,
}

impl AppState {
    pub fn new(db: sea_orm::DatabaseConnection, storage: &configs::StorageConfig) -> Self {
        let root = PathBuf::from(&storage.root);
        let repo = SeaOrmProductRepository { db };
        let images = LocalImageStore::new(root.clone());
        let products = ProductService::new(Arc::new(repo), Arc::new(images), storage.max_image_bytes());
        Self {
            products: Arc::new(products),
            storage: StorageSettings { root, public_prefix: storage.public_prefix.clone() },
        }
    }
}
