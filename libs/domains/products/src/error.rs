use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::barcode::BarcodeError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Product with SKU '{0}' not found")]
    SkuNotFound(String),

    #[error("Barcode for SKU '{0}' not found")]
    ArtifactNotFound(String),

    #[error("Product with SKU '{0}' already exists")]
    DuplicateSku(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Barcode rendering failed: {0}")]
    Render(String),

    #[error("Database error: {0}")]
    Persistence(String),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::SkuNotFound(sku) => {
                AppError::NotFound(format!("Product with SKU '{}' not found", sku))
            }
            ProductError::ArtifactNotFound(sku) => {
                AppError::NotFound(format!("Barcode for SKU '{}' not found", sku))
            }
            ProductError::DuplicateSku(sku) => {
                AppError::Conflict(format!("Product with SKU '{}' already exists", sku))
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Render(msg) => AppError::Render(msg),
            ProductError::Persistence(msg) => AppError::Persistence(msg),
            ProductError::Export(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProductError::Persistence(err.to_string())
    }
}

impl From<BarcodeError> for ProductError {
    fn from(err: BarcodeError) -> Self {
        match err {
            BarcodeError::NotFound(sku) => ProductError::ArtifactNotFound(sku),
            other => ProductError::Render(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_kinds_map_to_statuses() {
        let cases = [
            (ProductError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (ProductError::SkuNotFound("SKU-1".into()), StatusCode::NOT_FOUND),
            (ProductError::DuplicateSku("SKU-1".into()), StatusCode::CONFLICT),
            (ProductError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (ProductError::Render("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ProductError::Persistence("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status(), status);
        }
    }

    #[test]
    fn test_missing_artifact_is_not_a_render_failure() {
        let err: ProductError = BarcodeError::NotFound("SKU-9".into()).into();
        assert!(matches!(err, ProductError::ArtifactNotFound(sku) if sku == "SKU-9"));
    }
}
