use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, QuantityFilter};

/// Repository trait for Product persistence
///
/// Listing methods return products in creation order unless noted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert one product
    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Insert all products or none
    async fn create_many(&self, products: Vec<Product>) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>>;

    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// One page of products for streaming consumers
    async fn list_page(&self, offset: u64, limit: u64) -> ProductResult<Vec<Product>>;

    async fn list_by_quantity(&self, filter: QuantityFilter) -> ProductResult<Vec<Product>>;

    async fn count(&self, filter: QuantityFilter) -> ProductResult<u64>;

    /// Sum of all quantities
    async fn total_quantity(&self) -> ProductResult<i64>;

    /// Newest products first
    async fn recent(&self, limit: u64) -> ProductResult<Vec<Product>>;

    /// Persist a modified product; `NotFound` if it no longer exists
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Delete by ID, returning whether a record was removed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if products.iter().any(|p| p.sku == product.sku) {
            return Err(ProductError::DuplicateSku(product.sku));
        }

        products.push(product.clone());
        tracing::info!(product_id = %product.id, sku = %product.sku, "Created product");
        Ok(product)
    }

    async fn create_many(&self, batch: Vec<Product>) -> ProductResult<Vec<Product>> {
        // Held for the whole batch so the insert is all-or-nothing
        let mut products = self.products.write().await;

        for (i, candidate) in batch.iter().enumerate() {
            let clashes_stored = products.iter().any(|p| p.sku == candidate.sku);
            let clashes_batch = batch[..i].iter().any(|p| p.sku == candidate.sku);
            if clashes_stored || clashes_batch {
                return Err(ProductError::Persistence(format!(
                    "duplicate SKU '{}' in batch",
                    candidate.sku
                )));
            }
        }

        products.extend(batch.iter().cloned());
        tracing::info!(count = batch.len(), "Created products in bulk");
        Ok(batch)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.sku == sku).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn list_page(&self, offset: u64, limit: u64) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_by_quantity(&self, filter: QuantityFilter) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| filter.matches(p.quantity))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: QuantityFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| filter.matches(p.quantity)).count() as u64)
    }

    async fn total_quantity(&self) -> ProductResult<i64> {
        let products = self.products.read().await;
        Ok(products.iter().map(|p| i64::from(p.quantity)).sum())
    }

    async fn recent(&self, limit: u64) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(ProductError::NotFound(product.id))?;

        *slot = product.clone();
        tracing::info!(product_id = %product.id, quantity = product.quantity, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);

        let deleted = products.len() < before;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }
}
