use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, ConnectionTrait, QueryOrder, Select, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
/// Largest price whose cents an `f64` still represents exactly.
pub const PRICE_MAX: f64 = 99_999_999_999.99;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    pub stock: i32,
    /// Path relative to the storage root, e.g. `products/<name>.png`.
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Scalar attributes that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

fn required<'a>(field: &str, raw: Option<&'a str>) -> Result<&'a str, ModelError> {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ModelError::Validation(format!("The {field} field is required."))),
    }
}

fn min_chars(field: &str, v: &str, min: usize) -> Result<(), ModelError> {
    if v.chars().count() < min {
        return Err(ModelError::Validation(format!("The {field} field must be at least {min} characters.")));
    }
    Ok(())
}

pub fn validate_title(raw: Option<&str>) -> Result<String, ModelError> {
    let v = required("title", raw)?;
    min_chars("title", v, TITLE_MIN_CHARS)?;
    if v.chars().count() > TITLE_MAX_CHARS {
        return Err(ModelError::Validation(format!(
            "The title field must not be greater than {TITLE_MAX_CHARS} characters."
        )));
    }
    Ok(v.to_string())
}

pub fn validate_description(raw: Option<&str>) -> Result<String, ModelError> {
    let v = required("description", raw)?;
    min_chars("description", v, DESCRIPTION_MIN_CHARS)?;
    Ok(v.to_string())
}

/// Numeric, finite and non-negative; kept to cent precision.
pub fn parse_price(raw: Option<&str>) -> Result<f64, ModelError> {
    let v = required("price", raw)?;
    let price = v
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| ModelError::Validation("The price field must be a number.".into()))?;
    if price < 0.0 {
        return Err(ModelError::Validation("The price field must be at least 0.".into()));
    }
    if price > PRICE_MAX {
        return Err(ModelError::Validation(format!("The price field must not be greater than {PRICE_MAX:.2}.")));
    }
    let rounded = (price * 100.0).round() / 100.0;
    // -0.0 sneaks through the sign check
    Ok(if rounded == 0.0 { 0.0 } else { rounded })
}

pub fn parse_stock(raw: Option<&str>) -> Result<i32, ModelError> {
    let v = required("stock", raw)?;
    match v.parse::<i32>() {
        Ok(n) if n < 0 => Err(ModelError::Validation("The stock field must be at least 0.".into())),
        Ok(n) => Ok(n),
        Err(_) => match v.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => Err(ModelError::Validation(format!(
                "The stock field must not be greater than {}.",
                i32::MAX
            ))),
            Ok(f) if f.is_finite() => Err(ModelError::Validation("The stock field must be an integer.".into())),
            _ => Err(ModelError::Validation("The stock field must be a number.".into())),
        },
    }
}

/// Newest first; the id breaks ties between rows created in the same instant.
pub fn latest() -> Select<Entity> {
    Entity::find().order_by_desc(Column::CreatedAt).order_by_desc(Column::Id)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn insert<C: ConnectionTrait>(db: &C, fields: ProductFields, image: String) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        title: Set(fields.title),
        description: Set(fields.description),
        price: Set(fields.price),
        stock: Set(fields.stock),
        image: Set(image),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Write new scalar fields onto an existing row; the image path only moves when one is given.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    fields: ProductFields,
    image: Option<String>,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = existing.into();
    am.title = Set(fields.title);
    am.description = Set(fields.description);
    am.price = Set(fields.price);
    am.stock = Set(fields.stock);
    if let Some(path) = image {
        am.image = Set(path);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
