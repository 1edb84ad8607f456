//! Product Service - Business logic layer

use bytes::Bytes;
use futures::Stream;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::barcode::BarcodeRenderer;
use crate::error::{ProductError, ProductResult};
use crate::export::{DEFAULT_PAGE_SIZE, csv_stream};
use crate::models::{
    CreateProduct, Dashboard, LOW_STOCK_THRESHOLD, Product, QuantityFilter, StockAdjustment,
    UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::sku::SkuGenerator;

/// Number of products shown in the dashboard's "recent" list
pub const RECENT_PRODUCTS: u64 = 5;

/// Product service providing business logic operations
///
/// Owns SKU assignment and keeps every stored product's barcode artifact in
/// step with its record.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    barcodes: Arc<dyn BarcodeRenderer>,
    skus: Arc<SkuGenerator>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            barcodes: self.barcodes.clone(),
            skus: self.skus.clone(),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, barcodes: Arc<dyn BarcodeRenderer>) -> Self {
        Self {
            repository: Arc::new(repository),
            barcodes,
            skus: Arc::new(SkuGenerator::new()),
        }
    }

    /// Create a product with a fresh SKU and barcode.
    ///
    /// Nothing is stored if rendering fails; the artifact is removed again
    /// if the record cannot be persisted.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let sku = self.skus.next_sku();
        let handle = self.barcodes.render(&sku).await?;
        let product = Product::new(input, sku.clone(), handle.as_reference());

        match self.repository.create(product).await {
            Ok(created) => Ok(created),
            Err(e) => {
                self.discard_artifacts(std::slice::from_ref(&sku)).await;
                Err(e)
            }
        }
    }

    /// Create every product or none
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn bulk_create(&self, inputs: Vec<CreateProduct>) -> ProductResult<Vec<Product>> {
        if inputs.is_empty() {
            return Err(ProductError::Validation(
                "At least one product is required".to_string(),
            ));
        }

        for (index, input) in inputs.iter().enumerate() {
            input
                .validate()
                .map_err(|e| ProductError::Validation(format!("item {}: {}", index, e)))?;
        }

        let mut products = Vec::with_capacity(inputs.len());
        let mut rendered = Vec::with_capacity(inputs.len());

        for input in inputs {
            let sku = self.skus.next_sku();
            match self.barcodes.render(&sku).await {
                Ok(handle) => {
                    products.push(Product::new(input, sku.clone(), handle.as_reference()));
                    rendered.push(sku);
                }
                Err(e) => {
                    self.discard_artifacts(&rendered).await;
                    return Err(e.into());
                }
            }
        }

        match self.repository.create_many(products).await {
            Ok(created) => Ok(created),
            Err(e) => {
                self.discard_artifacts(&rendered).await;
                Err(match e {
                    ProductError::Persistence(_) => e,
                    other => ProductError::Persistence(other.to_string()),
                })
            }
        }
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Get a product by SKU
    #[instrument(skip(self))]
    pub async fn get_by_sku(&self, sku: &str) -> ProductResult<Product> {
        self.repository
            .get_by_sku(sku)
            .await?
            .ok_or_else(|| ProductError::SkuNotFound(sku.to_string()))
    }

    /// All products in creation order
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Replace the mutable fields of a product; status is recomputed
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let mut product = self.get_product(id).await?;
        product.apply_update(input);

        self.repository.update(product).await
    }

    /// Apply a signed delta; the result is clamped at zero
    #[instrument(skip(self, adjustment), fields(delta = adjustment.delta))]
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        adjustment: StockAdjustment,
    ) -> ProductResult<Product> {
        adjustment
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let mut product = self.get_product(id).await?;
        let previous = product.quantity;
        let quantity = product.adjust_stock(adjustment.delta);

        let updated = self.repository.update(product).await?;
        tracing::info!(
            product_id = %id,
            previous,
            quantity,
            reason = adjustment.reason.as_deref().unwrap_or(""),
            "Adjusted stock"
        );
        Ok(updated)
    }

    /// Delete a product and its barcode artifact
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let product = self.get_product(id).await?;

        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }

        self.barcodes.delete(&product.sku).await?;
        Ok(())
    }

    /// PNG bytes of a product's barcode
    #[instrument(skip(self))]
    pub async fn barcode_image(&self, sku: &str) -> ProductResult<Bytes> {
        let product = self.get_by_sku(sku).await?;
        Ok(self.barcodes.load(&product.sku).await?)
    }

    /// Aggregate stock figures
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> ProductResult<Dashboard> {
        let below = QuantityFilter::Below(LOW_STOCK_THRESHOLD);

        Ok(Dashboard {
            total_products: self.repository.count(QuantityFilter::All).await?,
            out_of_stock: self.repository.count(QuantityFilter::OutOfStock).await?,
            low_stock: self.repository.count(below).await?,
            total_stock: self.repository.total_quantity().await?,
            low_stock_items: self.repository.list_by_quantity(below).await?,
            recent_products: self.repository.recent(RECENT_PRODUCTS).await?,
        })
    }

    async fn discard_artifacts(&self, skus: &[String]) {
        for sku in skus {
            if let Err(e) = self.barcodes.delete(sku).await {
                tracing::warn!(sku = %sku, error = %e, "Failed to remove orphaned barcode");
            }
        }
    }
}

impl<R: ProductRepository + 'static> ProductService<R> {
    /// Lazily stream the whole catalog as CSV
    pub fn export_csv(&self) -> impl Stream<Item = ProductResult<Bytes>> + Send + 'static {
        csv_stream(self.repository.clone(), DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{ArtifactHandle, BarcodeError, MockBarcodeRenderer};
    use crate::models::StockStatus;
    use crate::repository::MockProductRepository;
    use futures::TryStreamExt;
    use mockall::predicate::eq;

    fn input(name: &str, quantity: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            quantity,
            location: "A1".to_string(),
        }
    }

    fn rendering_barcodes() -> MockBarcodeRenderer {
        let mut barcodes = MockBarcodeRenderer::new();
        barcodes
            .expect_render()
            .returning(|sku| Ok(ArtifactHandle::new(format!("storage/barcodes/{sku}.png"))));
        barcodes
    }

    fn stored(quantity: i32) -> Product {
        Product::new(input("Widget", quantity), "SKU-1".into(), "SKU-1.png".into())
    }

    #[tokio::test]
    async fn test_create_product_assigns_sku_and_status() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().times(1).returning(Ok);

        let service = ProductService::new(repo, Arc::new(rendering_barcodes()));
        let product = service.create_product(input("Widget", 5)).await.unwrap();

        assert!(product.sku.starts_with("SKU-"));
        assert_eq!(product.status, StockStatus::LowStock);
        assert_eq!(product.barcode_path, format!("storage/barcodes/{}.png", product.sku));
    }

    #[tokio::test]
    async fn test_create_product_render_failure_persists_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes
            .expect_render()
            .returning(|sku| Err(BarcodeError::Unencodable(sku.to_string())));

        let service = ProductService::new(repo, Arc::new(barcodes));
        let result = service.create_product(input("Widget", 5)).await;

        assert!(matches!(result, Err(ProductError::Render(_))));
    }

    #[tokio::test]
    async fn test_create_product_persistence_failure_removes_artifact() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .returning(|_| Err(ProductError::Persistence("connection reset".into())));

        let mut barcodes = rendering_barcodes();
        barcodes.expect_delete().times(1).returning(|_| Ok(()));

        let service = ProductService::new(repo, Arc::new(barcodes));
        let result = service.create_product(input("Widget", 5)).await;

        assert!(matches!(result, Err(ProductError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_create_product_rejects_blank_name() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes.expect_render().never();

        let service = ProductService::new(repo, Arc::new(barcodes));
        let result = service.create_product(input("", 5)).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_create_empty_is_validation_error() {
        let mut repo = MockProductRepository::new();
        repo.expect_create_many().never();

        let service = ProductService::new(repo, Arc::new(MockBarcodeRenderer::new()));
        let result = service.bulk_create(vec![]).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_create_assigns_distinct_skus() {
        let mut repo = MockProductRepository::new();
        repo.expect_create_many()
            .withf(|batch| batch.len() == 3)
            .returning(Ok);

        let service = ProductService::new(repo, Arc::new(rendering_barcodes()));
        let created = service
            .bulk_create(vec![input("A", 0), input("B", 5), input("C", 50)])
            .await
            .unwrap();

        let mut skus: Vec<_> = created.iter().map(|p| p.sku.clone()).collect();
        skus.dedup();
        assert_eq!(skus.len(), 3);
        assert_eq!(created[0].status, StockStatus::OutOfStock);
        assert_eq!(created[2].status, StockStatus::Available);
    }

    #[tokio::test]
    async fn test_bulk_create_invalid_item_renders_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_create_many().never();

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes.expect_render().never();

        let service = ProductService::new(repo, Arc::new(barcodes));
        let result = service.bulk_create(vec![input("A", 1), input("", 1)]).await;

        assert!(matches!(result, Err(ProductError::Validation(msg)) if msg.starts_with("item 1")));
    }

    #[tokio::test]
    async fn test_bulk_create_store_failure_cleans_up_every_artifact() {
        let mut repo = MockProductRepository::new();
        repo.expect_create_many()
            .returning(|_| Err(ProductError::DuplicateSku("SKU-1".into())));

        let mut barcodes = rendering_barcodes();
        barcodes.expect_delete().times(2).returning(|_| Ok(()));

        let service = ProductService::new(repo, Arc::new(barcodes));
        let result = service.bulk_create(vec![input("A", 1), input("B", 2)]).await;

        assert!(matches!(result, Err(ProductError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_and_saves() {
        let product = stored(3);
        let id = product.id;

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_update()
            .withf(|p| p.quantity == 0 && p.status == StockStatus::OutOfStock && p.sku == "SKU-1")
            .returning(Ok);

        let service = ProductService::new(repo, Arc::new(MockBarcodeRenderer::new()));
        let updated = service
            .adjust_stock(id, StockAdjustment { delta: -20, reason: None })
            .await
            .unwrap();

        assert_eq!(updated.quantity, 0);
    }

    #[tokio::test]
    async fn test_adjust_stock_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = ProductService::new(repo, Arc::new(MockBarcodeRenderer::new()));
        let result = service
            .adjust_stock(Uuid::now_v7(), StockAdjustment { delta: 1, reason: None })
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_artifact() {
        let product = stored(3);
        let id = product.id;

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_delete().with(eq(id)).returning(|_| Ok(true));

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes
            .expect_delete()
            .withf(|sku| sku == "SKU-1")
            .times(1)
            .returning(|_| Ok(()));

        let service = ProductService::new(repo, Arc::new(barcodes));
        service.delete_product(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_reports_artifact_failure_after_record_removal() {
        let product = stored(3);
        let id = product.id;

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_delete().with(eq(id)).times(1).returning(|_| Ok(true));

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes.expect_delete().times(1).returning(|_| {
            Err(BarcodeError::Storage(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        });

        let service = ProductService::new(repo, Arc::new(barcodes));
        assert!(matches!(
            service.delete_product(id).await,
            Err(ProductError::Render(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes.expect_delete().never();

        let service = ProductService::new(repo, Arc::new(barcodes));
        assert!(matches!(
            service.delete_product(Uuid::now_v7()).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_barcode_image_unknown_sku() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_sku().returning(|_| Ok(None));

        let mut barcodes = MockBarcodeRenderer::new();
        barcodes.expect_load().never();

        let service = ProductService::new(repo, Arc::new(barcodes));
        assert!(matches!(
            service.barcode_image("SKU-404").await,
            Err(ProductError::SkuNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard_uses_fixed_recent_window() {
        let mut repo = MockProductRepository::new();
        repo.expect_count()
            .with(eq(QuantityFilter::All))
            .returning(|_| Ok(5));
        repo.expect_count()
            .with(eq(QuantityFilter::OutOfStock))
            .returning(|_| Ok(2));
        repo.expect_count()
            .with(eq(QuantityFilter::Below(10)))
            .returning(|_| Ok(4));
        repo.expect_total_quantity().returning(|| Ok(27));
        repo.expect_list_by_quantity().returning(|_| Ok(vec![]));
        repo.expect_recent().with(eq(5)).returning(|_| Ok(vec![]));

        let service = ProductService::new(repo, Arc::new(MockBarcodeRenderer::new()));
        let dashboard = service.dashboard().await.unwrap();

        assert_eq!(dashboard.total_products, 5);
        assert_eq!(dashboard.out_of_stock, 2);
        assert_eq!(dashboard.low_stock, 4);
        assert_eq!(dashboard.total_stock, 27);
    }

    #[tokio::test]
    async fn test_export_csv_pages_through_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_page()
            .with(eq(0), eq(DEFAULT_PAGE_SIZE))
            .returning(|_, _| Ok(vec![stored(1)]));

        let service = ProductService::new(repo, Arc::new(MockBarcodeRenderer::new()));
        let chunks: Vec<Bytes> = service.export_csv().try_collect().await.unwrap();
        let csv = String::from_utf8(chunks.concat()).unwrap();

        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().nth(1).unwrap().contains(",SKU-1,1,A1,Low Stock,SKU-1.png"));
    }
}
