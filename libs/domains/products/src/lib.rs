//! Products Domain
//!
//! Warehouse product catalog: SKU assignment, stock status derivation,
//! barcode artifacts and CSV export.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────────┐
//! │   Service   │ ──▶ │ BarcodeRenderer  │  ← Code 128 PNGs on disk
//! └──────┬──────┘     └──────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory / PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, StockStatus
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::{
//!     FsBarcodeRenderer, InMemoryProductRepository, ProductService, handlers,
//! };
//!
//! let barcodes = Arc::new(FsBarcodeRenderer::new("storage/barcodes"));
//! let service = ProductService::new(InMemoryProductRepository::new(), barcodes);
//!
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod barcode;
pub mod entity;
pub mod error;
pub mod export;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod sku;

// Re-export commonly used types
pub use barcode::{ArtifactHandle, BarcodeError, BarcodeRenderer, FsBarcodeRenderer};
pub use error::{ProductError, ProductResult};
pub use export::CSV_HEADER;
pub use models::{
    CreateProduct, Dashboard, Product, QuantityFilter, StockAdjustment, StockLevel, StockStatus,
    UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
