use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Product, QuantityFilter},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository using SeaORM
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn quantity_condition(filter: QuantityFilter) -> Condition {
    match filter {
        QuantityFilter::All => Condition::all(),
        QuantityFilter::OutOfStock => Condition::all().add(entity::Column::Quantity.eq(0)),
        QuantityFilter::Below(threshold) => {
            Condition::all().add(entity::Column::Quantity.lt(threshold))
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let sku = product.sku.clone();
        let active_model: entity::ActiveModel = product.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ProductError::DuplicateSku(sku)
                } else {
                    e.into()
                }
            })?;

        tracing::info!(product_id = %model.id, sku = %model.sku, "Created product");
        Ok(model.into())
    }

    async fn create_many(&self, products: Vec<Product>) -> ProductResult<Vec<Product>> {
        let count = products.len();
        let models: Vec<entity::ActiveModel> =
            products.iter().cloned().map(Into::into).collect();

        // Dropping the transaction without commit rolls it back
        let txn = self.db.begin().await?;
        entity::Entity::insert_many(models).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(count, "Created products in bulk");
        Ok(products)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Sku.eq(sku))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_page(&self, offset: u64, limit: u64) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_quantity(&self, filter: QuantityFilter) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(quantity_condition(filter))
            .order_by_asc(entity::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: QuantityFilter) -> ProductResult<u64> {
        let count = entity::Entity::find()
            .filter(quantity_condition(filter))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn total_quantity(&self) -> ProductResult<i64> {
        let total: Option<Option<i64>> = entity::Entity::find()
            .select_only()
            .column_as(entity::Column::Quantity.sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }

    async fn recent(&self, limit: u64) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let id = product.id;
        let active_model: entity::ActiveModel = product.into();

        let model = entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => ProductError::NotFound(id),
                other => other.into(),
            })?;

        tracing::info!(product_id = %id, quantity = model.quantity, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }
}
