//! Product Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use storefront_app::domain::catalog::models::{InventoryStatus, Product, Variant};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// Stable product identifier
    pub id: String,

    pub name: String,

    /// URL slug
    pub slug: String,

    pub category: String,

    pub description: String,

    pub images: Vec<String>,

    /// First image, used as the listing thumbnail
    pub image: Option<String>,

    /// Purchasable sizes, in display order
    pub variants: Vec<VariantResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            image: product.primary_image().map(str::to_owned),
            variants: product.variants.into_iter().map(Into::into).collect(),
            id: product.id,
            name: product.name,
            slug: product.slug,
            category: product.category,
            description: product.description,
            images: product.images,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantResponse {
    pub sku: String,

    /// Bottle size label, e.g. `50ml`
    pub size: String,

    /// Unit price in minor currency units
    pub price: u64,

    /// Units currently available
    pub stock: u32,

    /// `IN_STOCK` or `OUT_OF_STOCK`
    pub inventory_status: String,
}

impl From<Variant> for VariantResponse {
    fn from(variant: Variant) -> Self {
        let inventory_status = match variant.inventory_status() {
            InventoryStatus::InStock => "IN_STOCK",
            InventoryStatus::OutOfStock => "OUT_OF_STOCK",
        };

        Self {
            sku: variant.sku,
            size: variant.size,
            price: variant.price,
            stock: variant.stock,
            inventory_status: inventory_status.to_string(),
        }
    }
}
