//! Stock Validator

use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    carts::models::CartItem,
    catalog::CatalogService,
    stock::models::{StockCheck, StockReport, ValidatedItem},
};

/// Read-only cross-check of requested lines against catalog stock.
#[derive(Clone)]
pub struct StockValidator {
    catalog: Arc<dyn CatalogService>,
}

impl std::fmt::Debug for StockValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockValidator").finish_non_exhaustive()
    }
}

impl StockValidator {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    /// Annotate each line with live availability. Lookup failures count as unavailable.
    pub async fn validate(&self, checks: Vec<StockCheck>) -> Vec<ValidatedItem> {
        let mut validated = Vec::with_capacity(checks.len());

        for check in checks {
            let available = match self.catalog.get_variant(check.sku.clone()).await {
                Ok(variant) => variant.stock,
                Err(error) => {
                    warn!(sku = %check.sku, error = %error, "stock lookup failed, treating as unavailable");
                    0
                }
            };

            validated.push(ValidatedItem::new(check, available));
        }

        validated
    }

    /// Validate and derive the invalid-item and adjustment reports.
    pub async fn report(&self, checks: Vec<StockCheck>) -> StockReport {
        StockReport::from_validated(self.validate(checks).await)
    }
}

impl From<&CartItem> for StockCheck {
    fn from(item: &CartItem) -> Self {
        Self {
            sku: item.sku.clone(),
            product_name: item.product_name.clone(),
            requested_quantity: item.quantity,
        }
    }
}
