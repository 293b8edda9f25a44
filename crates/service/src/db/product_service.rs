use sea_orm::{DatabaseConnection, PaginatorTrait};
use models::product::{self, ProductFields};
use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

/// One page of products, newest first.
pub async fn list_products(db: &DatabaseConnection, pagination: Pagination) -> Result<Page<product::Model>, ServiceError> {
    let (idx, per_page) = pagination.normalize();
    let paginator = product::latest().paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page::new(items, pagination, total))
}

/// Get a product by id.
pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<Option<product::Model>, ServiceError> {
    Ok(product::find(db, id).await?)
}

/// Insert a product row referencing an already stored image.
pub async fn create_product(db: &DatabaseConnection, fields: ProductFields, image: String) -> Result<product::Model, ServiceError> {
    Ok(product::insert(db, fields, image).await?)
}

/// Overwrite the scalar fields of a product, and its image path when one is given.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i32,
    fields: ProductFields,
    image: Option<String>,
) -> Result<product::Model, ServiceError> {
    let Some(existing) = product::find(db, id).await? else { return Err(ServiceError::not_found("product")); };
    Ok(product::update(db, existing, fields, image).await?)
}

/// Delete a product row; returns true if deleted.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    Ok(product::delete(db, id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn fields(title: &str) -> ProductFields {
        ProductFields { title: title.into(), description: "A small lamp".into(), price: 19.99, stock: 5 }
    }

    #[tokio::test]
    async fn product_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let a = create_product(&db, fields("Desk Lamp"), "products/a.png".into()).await?;
        let found = get_product(&db, a.id).await?.unwrap();
        assert_eq!(found.title, "Desk Lamp");

        let updated = update_product(&db, a.id, fields("Floor Lamp"), None).await?;
        assert_eq!(updated.title, "Floor Lamp");
        assert_eq!(updated.image, "products/a.png");

        let missing = update_product(&db, a.id + 1000, fields("Floor Lamp"), None).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        assert!(delete_product(&db, a.id).await?);
        assert!(get_product(&db, a.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_pages_newest_first() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for i in 0..23 {
            create_product(&db, fields(&format!("Product {i:02}")), format!("products/{i}.png")).await?;
        }

        let p1 = list_products(&db, Pagination::page(1)).await?;
        assert_eq!(p1.items.len(), 10);
        assert_eq!(p1.total, 23);
        assert_eq!(p1.last_page, 3);
        assert_eq!(p1.items[0].title, "Product 22");

        let p3 = list_products(&db, Pagination::page(3)).await?;
        assert_eq!(p3.items.len(), 3);
        assert_eq!(p3.items[2].title, "Product 00");

        let p4 = list_products(&db, Pagination::page(4)).await?;
        assert!(p4.items.is_empty());
        assert_eq!(p4.total, 23);

        // pages do not overlap
        let p2 = list_products(&db, Pagination::page(2)).await?;
        let mut ids: Vec<i32> = p1.items.iter().chain(&p2.items).chain(&p3.items).map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 23);
        Ok(())
    }
}
