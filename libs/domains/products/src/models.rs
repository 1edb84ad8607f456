use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Quantities strictly below this count as low stock
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Stock status, always derived from quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum StockStatus {
    #[serde(rename = "Available")]
    #[strum(serialize = "Available")]
    Available,
    #[serde(rename = "Low Stock")]
    #[strum(serialize = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockStatus::LowStock
        } else {
            StockStatus::Available
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Assigned at creation, never changes
    pub sku: String,
    pub quantity: i32,
    pub location: String,
    pub status: StockStatus,
    /// Handle of the rendered barcode image
    pub barcode_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub location: String,
}

/// Full replace of the mutable fields.
///
/// `sku`, `barcode_path` and `status` are not part of this payload; serde
/// drops them if a client sends them.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub location: String,
}

/// Signed stock delta
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StockAdjustment {
    /// Quantity to add (positive) or remove (negative)
    #[serde(alias = "quantity")]
    pub delta: i32,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub reason: Option<String>,
}

/// Stock adjustment response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: Uuid,
    pub sku: String,
    pub quantity: i32,
    pub status: StockStatus,
}

impl From<&Product> for StockLevel {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku.clone(),
            quantity: product.quantity,
            status: product.status,
        }
    }
}

/// Aggregate inventory view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_products: u64,
    pub out_of_stock: u64,
    pub low_stock: u64,
    /// Sum of all quantities
    pub total_stock: i64,
    pub low_stock_items: Vec<Product>,
    pub recent_products: Vec<Product>,
}

/// Quantity predicates used by dashboard queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFilter {
    All,
    OutOfStock,
    Below(i32),
}

impl QuantityFilter {
    pub fn matches(&self, quantity: i32) -> bool {
        match self {
            QuantityFilter::All => true,
            QuantityFilter::OutOfStock => quantity == 0,
            QuantityFilter::Below(threshold) => quantity < *threshold,
        }
    }
}

impl Product {
    /// Build a new product around an already assigned SKU and barcode
    pub fn new(input: CreateProduct, sku: String, barcode_path: String) -> Self {
        let now = Utc::now();
        let quantity = input.quantity.max(0);
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            sku,
            quantity,
            location: input.location,
            status: StockStatus::from_quantity(quantity),
            barcode_path,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace name, quantity and location; status follows quantity
    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.name = update.name;
        self.location = update.location;
        self.set_quantity(update.quantity);
    }

    /// Apply a signed delta, clamping at zero. Returns the new quantity.
    pub fn adjust_stock(&mut self, delta: i32) -> i32 {
        self.set_quantity(self.quantity.saturating_add(delta));
        self.quantity
    }

    fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity.max(0);
        self.status = StockStatus::from_quantity(self.quantity);
        self.updated_at = Utc::now();
    }
}
