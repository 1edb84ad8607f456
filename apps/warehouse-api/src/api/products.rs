//! Products API routes

use axum::{Router, middleware};
use axum_helpers::{JwtAuth, bearer_auth_middleware};
use domain_products::{
    FsBarcodeRenderer, PgProductRepository, ProductRepository, ProductService, handlers,
};
use std::sync::Arc;

use crate::state::AppState;

/// Catalog service backed by PostgreSQL and on-disk barcodes
pub fn service(state: &AppState) -> ProductService<PgProductRepository> {
    let repository = PgProductRepository::new(state.db.clone());
    let barcodes = Arc::new(FsBarcodeRenderer::new(state.config.barcode_root.clone()));
    ProductService::new(repository, barcodes)
}

/// Products router; every route requires a bearer token
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>, jwt: JwtAuth) -> Router {
    handlers::router(service).route_layer(middleware::from_fn_with_state(
        jwt,
        bearer_auth_middleware,
    ))
}
