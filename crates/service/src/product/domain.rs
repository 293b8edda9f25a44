use chrono::{DateTime, FixedOffset};
use models::product::{self, ProductFields};
use serde::Serialize;

use crate::errors::{ServiceError, ValidationErrors};
use crate::storage::image::{check_image, ImageKind, UploadedImage};

/// Raw form input, every field exactly as submitted.
#[derive(Clone, Debug, Default)]
pub struct ProductSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub image: Option<UploadedImage>,
}

/// A submission that passed every rule; nothing has been written yet.
#[derive(Clone, Debug)]
pub struct ValidatedSubmission {
    pub fields: ProductFields,
    pub image: Option<(ImageKind, Vec<u8>)>,
}

impl ProductSubmission {
    /// Check all fields, collecting one entry per failing rule.
    pub fn validate(self, image_required: bool, max_image_bytes: u64) -> Result<ValidatedSubmission, ServiceError> {
        let mut errors = ValidationErrors::new();

        let kind = check_image(self.image.as_ref(), image_required, max_image_bytes, &mut errors);
        let title = collect(&mut errors, "title", product::validate_title(self.title.as_deref()));
        let description = collect(&mut errors, "description", product::validate_description(self.description.as_deref()));
        let price = collect(&mut errors, "price", product::parse_price(self.price.as_deref()));
        let stock = collect(&mut errors, "stock", product::parse_stock(self.stock.as_deref()));

        errors.into_result()?;
        match (title, description, price, stock) {
            (Some(title), Some(description), Some(price), Some(stock)) => Ok(ValidatedSubmission {
                fields: ProductFields { title, description, price, stock },
                image: kind.zip(self.image).map(|(k, img)| (k, img.bytes)),
            }),
            _ => Err(ServiceError::Validation(ValidationErrors::new())),
        }
    }
}

fn collect<T>(errors: &mut ValidationErrors, field: &'static str, res: Result<T, models::errors::ModelError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            errors.add(field, e.to_string());
            None
        }
    }
}

/// Product as handed to clients, with a browser-reachable image URL.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub image: String,
    pub image_url: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ProductView {
    pub fn from_model(m: product::Model, public_prefix: &str) -> Self {
        let image_url = format!("{}/{}", public_prefix.trim_end_matches('/'), m.image);
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            price: m.price,
            stock: m.stock,
            image: m.image,
            image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
