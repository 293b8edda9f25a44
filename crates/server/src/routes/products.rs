use axum::{
    async_trait,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
        FromRequestParts, Multipart, Path, Query, State,
    },
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use common::types::Flash;
use service::{
    pagination::{Page, Pagination},
    product::{domain::{ProductSubmission, ProductView}, form::ProductForm},
    storage::UploadedImage,
};

use crate::{errors::JsonApiError, metrics::OperationTimer, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// 1-based page number; anything unparsable means page 1
    pub page: Option<String>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        let page = self.page.as_deref().and_then(|p| p.trim().parse::<u32>().ok()).unwrap_or(1);
        Pagination::page(page)
    }
}

/// Product id taken from the path. A segment that is not an id names no product.
#[derive(Debug, Clone, Copy)]
pub struct ProductId(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ProductId {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(PathRejection::FailedToDeserializePathParams(e)) => {
                Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.body_text())))
            }
            Err(other) => Err(JsonApiError::new(other.status(), "Invalid Path", Some(other.body_text()))),
        }
    }
}

/// Multipart body, kept as a `Result` so a malformed request still gets a JSON error.
type FormBody = Result<Multipart, MultipartRejection>;

/// A parsed multipart form: product fields plus the optional method override.
#[derive(Debug, Default)]
struct FormInput {
    method: Option<String>,
    submission: ProductSubmission,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    JsonApiError::new(e.status(), "Invalid Form", Some(e.body_text()))
}

async fn read_form(multipart: FormBody) -> Result<FormInput, JsonApiError> {
    let mut multipart =
        multipart.map_err(|e| JsonApiError::new(e.status(), "Invalid Form", Some(e.body_text())))?;
    let mut input = FormInput::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                debug!(file_name = file_name.as_deref().unwrap_or(""), size = bytes.len(), "image part received");
                input.submission.image = Some(UploadedImage { file_name, content_type, bytes: bytes.to_vec() });
            }
            "title" => input.submission.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => input.submission.description = Some(field.text().await.map_err(multipart_error)?),
            "price" => input.submission.price = Some(field.text().await.map_err(multipart_error)?),
            "stock" => input.submission.stock = Some(field.text().await.map_err(multipart_error)?),
            "_method" => input.method = Some(field.text().await.map_err(multipart_error)?),
            other => debug!(field = %other, "ignoring unknown form field"),
        }
    }
    Ok(input)
}

/// Mutations answer with a redirect to the listing and a success notice.
fn redirect_to_index(message: &str, view: ProductView) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/products")],
        Json(Flash::new(message, view)),
    )
        .into_response()
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "Newest products first, 10 per page", body = crate::openapi::ProductPageDoc),
        (status = 500, description = "List Failed")
    )
)]
pub async fn index(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Result<Json<Page<ProductView>>, JsonApiError> {
    let timer = OperationTimer::start("list");
    let res = state.products.list(q.pagination()).await;
    timer.finish(&res);
    let page = res?;
    debug!(page = page.page, count = page.items.len(), total = page.total, "list products");
    let prefix = state.storage.public_prefix.clone();
    Ok(Json(page.map(|m| ProductView::from_model(m, &prefix))))
}

#[utoipa::path(
    get, path = "/products/create", tag = "products",
    responses((status = 200, description = "Empty creation form", body = crate::openapi::ProductFormDoc))
)]
pub async fn create(State(state): State<AppState>) -> Json<ProductForm> {
    Json(state.products.create_form())
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body(content = crate::openapi::ProductSubmissionDoc, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Created; redirect to /products", body = crate::openapi::FlashDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn store(State(state): State<AppState>, multipart: FormBody) -> Result<Response, JsonApiError> {
    let input = read_form(multipart).await?;
    let timer = OperationTimer::start("create");
    let res = state.products.create(input.submission).await;
    timer.finish(&res);
    let created = res?;
    info!(id = created.id, "created product");
    let view = ProductView::from_model(created, &state.storage.public_prefix);
    Ok(redirect_to_index("Product created successfully.", view))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn show(State(state): State<AppState>, ProductId(id): ProductId) -> Result<Json<ProductView>, JsonApiError> {
    let timer = OperationTimer::start("read");
    let res = state.products.get(id).await;
    timer.finish(&res);
    Ok(Json(ProductView::from_model(res?, &state.storage.public_prefix)))
}

#[utoipa::path(
    get, path = "/products/{id}/edit", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Pre-filled edit form", body = crate::openapi::ProductFormDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn edit(State(state): State<AppState>, ProductId(id): ProductId) -> Result<Json<ProductForm>, JsonApiError> {
    Ok(Json(state.products.edit_form(id).await?))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = crate::openapi::ProductSubmissionDoc, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Updated; redirect to /products", body = crate::openapi::FlashDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(State(state): State<AppState>, ProductId(id): ProductId, multipart: FormBody) -> Result<Response, JsonApiError> {
    let input = read_form(multipart).await?;
    apply_update(&state, id, input.submission).await
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 303, description = "Deleted; redirect to /products", body = crate::openapi::FlashDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn destroy(State(state): State<AppState>, ProductId(id): ProductId) -> Result<Response, JsonApiError> {
    apply_delete(&state, id).await
}

/// HTML forms can only POST; `_method` selects the intended verb.
#[utoipa::path(
    post, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = crate::openapi::ProductSubmissionDoc, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Updated or deleted; redirect to /products", body = crate::openapi::FlashDoc),
        (status = 405, description = "Missing or unsupported _method"),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn spoofed(State(state): State<AppState>, ProductId(id): ProductId, multipart: FormBody) -> Result<Response, JsonApiError> {
    let input = read_form(multipart).await?;
    let method = input.method.as_deref().map(|m| m.trim().to_ascii_uppercase());
    match method.as_deref() {
        Some("PUT") | Some("PATCH") => apply_update(&state, id, input.submission).await,
        Some("DELETE") => apply_delete(&state, id).await,
        other => Err(JsonApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed",
            Some(format!("unsupported _method {:?}", other.unwrap_or(""))),
        )),
    }
}

async fn apply_update(state: &AppState, id: i32, submission: ProductSubmission) -> Result<Response, JsonApiError> {
    let timer = OperationTimer::start("update");
    let res = state.products.update(id, submission).await;
    timer.finish(&res);
    let updated = res?;
    info!(id = updated.id, "updated product");
    let view = ProductView::from_model(updated, &state.storage.public_prefix);
    Ok(redirect_to_index("Product updated successfully.", view))
}

async fn apply_delete(state: &AppState, id: i32) -> Result<Response, JsonApiError> {
    let timer = OperationTimer::start("delete");
    let res = state.products.delete(id).await;
    timer.finish(&res);
    let deleted = res?;
    info!(id = deleted.id, "deleted product");
    let view = ProductView::from_model(deleted, &state.storage.public_prefix);
    Ok(redirect_to_index("Product deleted successfully.", view))
}
