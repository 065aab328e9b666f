//! Cart Models

use jiff::Timestamp;

use crate::domain::sessions::GuestSession;

/// Smallest quantity a line item may hold.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Largest quantity a line item may hold, regardless of stock.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// Whether `quantity` is within the per-line bounds.
#[must_use]
pub fn is_valid_quantity(quantity: u32) -> bool {
    (MIN_LINE_QUANTITY..=MAX_LINE_QUANTITY).contains(&quantity)
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cart {
    pub session: Option<GuestSession>,
    pub items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn empty(session: Option<GuestSession>) -> Self {
        Self {
            session,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn item(&self, sku: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.sku == sku)
    }

    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// CartItem Model
///
/// `price` and the display fields are copied from the catalog on every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub sku: String,
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub price: u64,
    pub quantity: u32,
    pub image: Option<String>,
    pub added_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub sku: String,
    pub product_id: String,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, price: u64, quantity: u32) -> CartItem {
        CartItem {
            sku: sku.to_string(),
            product_id: "noir".to_string(),
            product_name: "Noir".to_string(),
            size: "50ml".to_string(),
            price,
            quantity,
            image: None,
            added_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn totals_are_derived_from_items() {
        let cart = Cart {
            session: None,
            items: vec![item("A", 1000, 2), item("B", 250, 3)],
        };

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), 2750);
    }

    #[test]
    fn empty_cart_has_zero_totals() {
        let cart = Cart::empty(None);

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0);
    }

    #[test]
    fn quantity_bounds_are_inclusive() {
        assert!(!is_valid_quantity(0));
        assert!(is_valid_quantity(1));
        assert!(is_valid_quantity(10));
        assert!(!is_valid_quantity(11));
    }
}
