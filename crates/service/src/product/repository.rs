use async_trait::async_trait;
use models::product::{Model, ProductFields};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, pagination: Pagination) -> Result<Page<Model>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError>;
    async fn create(&self, fields: ProductFields, image: String) -> Result<Model, ServiceError>;
    async fn update(&self, id: i32, fields: ProductFields, image: Option<String>) -> Result<Model, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self, pagination: Pagination) -> Result<Page<Model>, ServiceError> {
        crate::db::product_service::list_products(&self.db, pagination).await
    }

    async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError> {
        crate::db::product_service::get_product(&self.db, id).await
    }

    async fn create(&self, fields: ProductFields, image: String) -> Result<Model, ServiceError> {
        crate::db::product_service::create_product(&self.db, fields, image).await
    }

    async fn update(&self, id: i32, fields: ProductFields, image: Option<String>) -> Result<Model, ServiceError> {
        crate::db::product_service::update_product(&self.db, id, fields, image).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        crate::db::product_service::delete_product(&self.db, id).await
    }
}
