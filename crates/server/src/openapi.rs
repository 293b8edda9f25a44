use std::collections::BTreeMap;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    /// Path relative to the storage root, e.g. `products/<name>.png`
    pub image: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ProductPageDoc {
    pub items: Vec<ProductDoc>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

/// Multipart body of create and update; `image` is optional on update.
#[derive(ToSchema)]
pub struct ProductSubmissionDoc {
    #[schema(value_type = String, format = Binary)]
    pub image: Option<Vec<u8>>,
    pub title: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    /// PUT, PATCH or DELETE when tunnelled through POST /products/{id}
    #[schema(rename = "_method")]
    pub method: Option<String>,
}

#[derive(ToSchema)]
pub struct FormFieldDoc {
    pub name: String,
    pub input: String,
    pub required: bool,
    pub rules: String,
    pub value: Option<String>,
}

#[derive(ToSchema)]
pub struct ProductFormDoc {
    pub action: String,
    pub method: String,
    pub enctype: String,
    pub fields: Vec<FormFieldDoc>,
}

#[derive(ToSchema)]
pub struct FlashDoc {
    pub message: String,
    pub data: ProductDoc,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub message: Option<String>,
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::index,
        crate::routes::products::create,
        crate::routes::products::store,
        crate::routes::products::show,
        crate::routes::products::edit,
        crate::routes::products::update,
        crate::routes::products::destroy,
        crate::routes::products::spoofed,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            ProductPageDoc,
            ProductSubmissionDoc,
            FormFieldDoc,
            ProductFormDoc,
            FlashDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_product_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/products"));
        assert!(paths.contains_key("/products/{id}"));
        assert!(paths.contains_key("/products/{id}/edit"));
        assert!(paths.contains_key("/health"));
    }
}
