//! PostgreSQL repository tests. Run with `cargo test -- --ignored` (requires Docker).

use domain_products::{
    CreateProduct, FsBarcodeRenderer, PgProductRepository, Product, ProductError,
    ProductRepository, ProductService, QuantityFilter, StockAdjustment, StockStatus,
};
use std::sync::Arc;
use test_utils::TestDatabase;

fn input(name: &str, quantity: i32) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        quantity,
        location: "Dock".to_string(),
    }
}

fn product(sku: &str, quantity: i32) -> Product {
    Product::new(input(sku, quantity), sku.to_string(), format!("{sku}.png"))
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_crud_and_aggregates() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    for (i, q) in [0, 3, 15, 0, 9].into_iter().enumerate() {
        repo.create(product(&format!("SKU-PG-{i}"), q)).await.unwrap();
    }

    assert_eq!(repo.count(QuantityFilter::All).await.unwrap(), 5);
    assert_eq!(repo.count(QuantityFilter::OutOfStock).await.unwrap(), 2);
    assert_eq!(repo.count(QuantityFilter::Below(10)).await.unwrap(), 4);
    assert_eq!(repo.total_quantity().await.unwrap(), 27);
    assert_eq!(repo.recent(3).await.unwrap().len(), 3);
    assert_eq!(repo.list_page(4, 10).await.unwrap().len(), 1);

    let fetched = repo.get_by_sku("SKU-PG-2").await.unwrap().unwrap();
    assert_eq!(fetched.status, StockStatus::Available);

    assert!(repo.delete(fetched.id).await.unwrap());
    assert!(repo.get_by_id(fetched.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_duplicate_sku_conflicts() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    repo.create(product("SKU-DUP", 1)).await.unwrap();
    let result = repo.create(product("SKU-DUP", 1)).await;

    assert!(matches!(result, Err(ProductError::DuplicateSku(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_bulk_insert_rolls_back() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    repo.create(product("SKU-EXISTING", 1)).await.unwrap();

    let result = repo
        .create_many(vec![product("SKU-NEW-1", 1), product("SKU-EXISTING", 2)])
        .await;

    assert!(matches!(result, Err(ProductError::Persistence(_))));
    assert!(repo.get_by_sku("SKU-NEW-1").await.unwrap().is_none());
    assert_eq!(repo.count(QuantityFilter::All).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_update_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let result = repo.update(product("SKU-GHOST", 1)).await;
    assert!(matches!(result, Err(ProductError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_postgres_service_stock_scenario() {
    let db = TestDatabase::new().await;
    let storage = tempfile::tempdir().unwrap();
    let service = ProductService::new(
        PgProductRepository::new(db.connection()),
        Arc::new(FsBarcodeRenderer::new(storage.path())),
    );

    let created = service.create_product(input("Pallet", 0)).await.unwrap();
    assert_eq!(created.status, StockStatus::OutOfStock);

    let up = service
        .adjust_stock(created.id, StockAdjustment { delta: 15, reason: None })
        .await
        .unwrap();
    assert_eq!(up.status, StockStatus::Available);

    let down = service
        .adjust_stock(created.id, StockAdjustment { delta: -20, reason: None })
        .await
        .unwrap();
    assert_eq!(down.quantity, 0);
    assert_eq!(down.sku, created.sku);
}
