use super::setup_test_db;
use crate::product::{self, ProductFields};
use anyhow::Result;
use sea_orm::{EntityTrait, PaginatorTrait};

fn lamp() -> ProductFields {
    ProductFields {
        title: "Desk Lamp".into(),
        description: "A small lamp".into(),
        price: 19.99,
        stock: 5,
    }
}

#[tokio::test]
async fn insert_find_update_delete() -> Result<()> {
    let db = setup_test_db().await?;

    let created = product::insert(&db, lamp(), "products/a.png".into()).await?;
    assert!(created.id > 0);
    assert_eq!(created.title, "Desk Lamp");
    assert_eq!(created.created_at, created.updated_at);

    let found = product::find(&db, created.id).await?.expect("row present");
    assert_eq!(found.image, "products/a.png");
    assert_eq!(found.stock, 5);

    // no new image: path stays
    let mut fields = lamp();
    fields.title = "Desk Lamp XL".into();
    fields.stock = 9;
    let updated = product::update(&db, found.clone(), fields.clone(), None).await?;
    assert_eq!(updated.title, "Desk Lamp XL");
    assert_eq!(updated.image, "products/a.png");
    assert!(updated.updated_at >= found.updated_at);

    let swapped = product::update(&db, updated, fields, Some("products/b.png".into())).await?;
    assert_eq!(swapped.image, "products/b.png");

    assert!(product::delete(&db, created.id).await?);
    assert!(product::find(&db, created.id).await?.is_none());
    assert!(!product::delete(&db, created.id).await?);
    Ok(())
}

#[tokio::test]
async fn latest_orders_newest_first() -> Result<()> {
    let db = setup_test_db().await?;
    let mut ids = Vec::new();
    for i in 0..3 {
        let mut f = lamp();
        f.title = format!("Lamp number {i}");
        ids.push(product::insert(&db, f, format!("products/{i}.png")).await?.id);
    }
    let rows = product::latest().all(&db).await?;
    let got: Vec<i32> = rows.iter().map(|r| r.id).collect();
    ids.reverse();
    assert_eq!(got, ids);
    assert_eq!(product::Entity::find().count(&db).await?, 3);
    Ok(())
}
