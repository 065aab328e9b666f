//! Stock Validation Models

/// One requested line to check against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCheck {
    pub sku: String,
    pub product_name: String,
    pub requested_quantity: u32,
}

/// A checked line annotated with live availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedItem {
    pub sku: String,
    pub product_name: String,
    pub requested_quantity: u32,
    pub available_quantity: u32,
    pub in_stock: bool,
    pub is_valid: bool,
}

impl ValidatedItem {
    #[must_use]
    pub fn new(check: StockCheck, available_quantity: u32) -> Self {
        let in_stock = available_quantity > 0;

        Self {
            is_valid: in_stock && available_quantity >= check.requested_quantity,
            sku: check.sku,
            product_name: check.product_name,
            requested_quantity: check.requested_quantity,
            available_quantity,
            in_stock,
        }
    }

    /// In stock, but fewer units than requested.
    #[must_use]
    pub fn needs_adjustment(&self) -> bool {
        self.in_stock && self.available_quantity < self.requested_quantity
    }
}

/// A line that cannot be fulfilled as requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidItem {
    pub sku: String,
    pub product_name: String,
    pub requested_quantity: u32,
    pub available_quantity: u32,
    pub in_stock: bool,
}

/// A suggested quantity for a partially available line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityAdjustment {
    pub sku: String,
    pub current_quantity: u32,
    pub suggested_quantity: u32,
}

/// Advisory result of checking a set of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StockReport {
    pub items: Vec<ValidatedItem>,
    pub invalid_items: Vec<InvalidItem>,
    pub adjustments: Vec<QuantityAdjustment>,
}

impl StockReport {
    #[must_use]
    pub fn from_validated(items: Vec<ValidatedItem>) -> Self {
        let invalid_items = items
            .iter()
            .filter(|item| !item.is_valid)
            .map(|item| InvalidItem {
                sku: item.sku.clone(),
                product_name: item.product_name.clone(),
                requested_quantity: item.requested_quantity,
                available_quantity: item.available_quantity,
                in_stock: item.in_stock,
            })
            .collect();

        let adjustments = items
            .iter()
            .filter(|item| item.needs_adjustment())
            .map(|item| QuantityAdjustment {
                sku: item.sku.clone(),
                current_quantity: item.requested_quantity,
                suggested_quantity: item.available_quantity,
            })
            .collect();

        Self {
            items,
            invalid_items,
            adjustments,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid_items.is_empty() && self.adjustments.is_empty()
    }
}
