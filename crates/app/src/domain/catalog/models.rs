//! Catalog Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Availability derived from a variant's stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    InStock,
    OutOfStock,
}

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Find one of this product's variants by sku.
    #[must_use]
    pub fn variant(&self, sku: &str) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.sku == sku)
    }

    /// First image, used as the thumbnail on cart lines.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Variant Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub sku: String,
    pub product_id: String,
    pub size: String,
    pub price: u64,
    pub stock: u32,
}

impl Variant {
    #[must_use]
    pub fn inventory_status(&self) -> InventoryStatus {
        if self.stock > 0 {
            InventoryStatus::InStock
        } else {
            InventoryStatus::OutOfStock
        }
    }

    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.inventory_status() == InventoryStatus::InStock
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub variants: Vec<NewVariant>,
}

/// New Variant Model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    pub sku: String,
    pub size: String,
    pub price: u64,
    pub stock: u32,
}
