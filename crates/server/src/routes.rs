pub mod products;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: product resource, stored images, docs and ops endpoints
pub fn build_router(state: AppState, cors: CorsLayer, body_limit: usize) -> Router {
    let images = ServeDir::new(state.storage.root.clone());
    let image_prefix = state.storage.public_prefix.clone();

    let products = Router::new()
        .route("/products", get(products::index).post(products::store))
        .route("/products/create", get(products::create))
        .route(
            "/products/:id",
            get(products::show)
                .put(products::update)
                .patch(products::update)
                .delete(products::destroy)
                .post(products::spoofed),
        )
        .route("/products/:id/edit", get(products::edit));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .merge(products)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service(&image_prefix, images)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
