//! HTTP handlers for Products API

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{AppError, UuidPath, ValidatedJson};
use std::sync::Arc;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, Dashboard, Product, StockAdjustment, StockLevel, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Create the products router with all HTTP endpoints
///
/// Static segments (`/bulk`, `/export`, `/dashboard`, `/barcode/{sku}`) take
/// precedence over `/{id}`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/bulk", post(bulk_create))
        .route("/export", get(export_csv))
        .route("/dashboard", get(dashboard))
        .route("/barcode/{sku}", get(get_barcode))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", put(adjust_stock))
        .with_state(shared_service)
}

/// List all products
///
/// GET /products
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
///
/// POST /products
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Create several products atomically
///
/// POST /products/bulk
async fn bulk_create<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    payload: Result<Json<Vec<CreateProduct>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(inputs) = payload?;
    let products = service.bulk_create(inputs).await?;
    Ok((StatusCode::CREATED, Json(products)))
}

/// Get a product by ID
///
/// GET /products/{id}
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product's name, quantity and location
///
/// PUT /products/{id}
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Apply a signed stock delta
///
/// PUT /products/{id}/stock
async fn adjust_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(adjustment): ValidatedJson<StockAdjustment>,
) -> ProductResult<Json<StockLevel>> {
    let product = service.adjust_stock(id, adjustment).await?;
    Ok(Json(StockLevel::from(&product)))
}

/// Delete a product
///
/// DELETE /products/{id}
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Barcode PNG for a SKU
///
/// GET /products/barcode/{sku}
async fn get_barcode<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(sku): Path<String>,
) -> ProductResult<impl IntoResponse> {
    let png = service.barcode_image(&sku).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Stream the catalog as CSV
///
/// GET /products/export
async fn export_csv<R: ProductRepository + 'static>(
    State(service): State<Arc<ProductService<R>>>,
) -> impl IntoResponse {
    let body = Body::from_stream(service.export_csv());
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=products.csv",
            ),
        ],
        body,
    )
}

/// Stock summary
///
/// GET /products/dashboard
async fn dashboard<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Dashboard>> {
    let dashboard = service.dashboard().await?;
    Ok(Json(dashboard))
}
