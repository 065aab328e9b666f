//! Cart Requests & Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use storefront_app::domain::{
    carts::models::{Cart, CartItem, MAX_LINE_QUANTITY, MIN_LINE_QUANTITY, is_valid_quantity},
    stock::models::{InvalidItem, QuantityAdjustment, StockReport, ValidatedItem},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub items: Vec<CartItemResponse>,

    /// Sum of line quantities
    pub total_items: u32,

    /// Sum of line totals in minor currency units
    pub total_price: u64,

    /// Stock check for every line, when requested with `?validate=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<StockReportResponse>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            items: cart.items.into_iter().map(Into::into).collect(),
            validation: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub sku: String,
    pub product_id: String,
    pub product_name: String,
    pub size: String,

    /// Current catalog unit price
    pub price: u64,

    pub quantity: u32,
    pub image: Option<String>,

    /// `price * quantity`
    pub line_total: u64,

    pub added_at: String,
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            line_total: item.line_total(),
            sku: item.sku,
            product_id: item.product_id,
            product_name: item.product_name,
            size: item.size,
            price: item.price,
            quantity: item.quantity,
            image: item.image,
            added_at: item.added_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Add-to-cart body. Display fields and price are taken from the catalog, so
/// any the client sends are ignored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToCartRequest {
    pub sku: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateQuantityRequest {
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockReportResponse {
    /// No line needs attention
    pub valid: bool,

    pub items: Vec<ValidatedItemResponse>,
    pub invalid_items: Vec<InvalidItemResponse>,
    pub adjustments: Vec<AdjustmentResponse>,
}

impl From<StockReport> for StockReportResponse {
    fn from(report: StockReport) -> Self {
        Self {
            valid: report.is_valid(),
            items: report.items.into_iter().map(Into::into).collect(),
            invalid_items: report.invalid_items.into_iter().map(Into::into).collect(),
            adjustments: report.adjustments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatedItemResponse {
    pub sku: String,
    pub product_name: String,
    pub requested_quantity: u32,
    pub available_quantity: u32,
    pub in_stock: bool,
    pub is_valid: bool,
}

impl From<ValidatedItem> for ValidatedItemResponse {
    fn from(item: ValidatedItem) -> Self {
        Self {
            sku: item.sku,
            product_name: item.product_name,
            requested_quantity: item.requested_quantity,
            available_quantity: item.available_quantity,
            in_stock: item.in_stock,
            is_valid: item.is_valid,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InvalidItemResponse {
    pub sku: String,
    pub product_name: String,
    pub requested_quantity: u32,
    pub available_quantity: u32,
    pub in_stock: bool,
}

impl From<InvalidItem> for InvalidItemResponse {
    fn from(item: InvalidItem) -> Self {
        Self {
            sku: item.sku,
            product_name: item.product_name,
            requested_quantity: item.requested_quantity,
            available_quantity: item.available_quantity,
            in_stock: item.in_stock,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdjustmentResponse {
    pub sku: String,
    pub current_quantity: u32,

    /// Largest quantity the line can currently hold
    pub suggested_quantity: u32,
}

impl From<QuantityAdjustment> for AdjustmentResponse {
    fn from(adjustment: QuantityAdjustment) -> Self {
        Self {
            sku: adjustment.sku,
            current_quantity: adjustment.current_quantity,
            suggested_quantity: adjustment.suggested_quantity,
        }
    }
}

/// Read a quantity in the accepted line range.
pub(crate) fn quantity(value: Option<i64>) -> Result<u32, String> {
    let quantity = value.ok_or_else(|| "quantity is required".to_string())?;

    u32::try_from(quantity)
        .ok()
        .filter(|quantity| is_valid_quantity(*quantity))
        .ok_or_else(|| {
            format!(
                "quantity must be between {MIN_LINE_QUANTITY} and {MAX_LINE_QUANTITY}, got {quantity}"
            )
        })
}
