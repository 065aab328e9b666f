//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::debug;

use crate::domain::{
    carts::{
        errors::CartsServiceError,
        models::{Cart, CartItem, MAX_LINE_QUANTITY, NewCartItem, is_valid_quantity},
        repositories::CartItemsRepository,
    },
    catalog::{
        CatalogService,
        models::{Product, Variant},
    },
    sessions::GuestSession,
    stock::{StockValidator, models::StockReport},
};

pub struct DefaultCartsService {
    catalog: Arc<dyn CatalogService>,
    items: Arc<dyn CartItemsRepository>,
    validator: StockValidator,
    ttl: SignedDuration,
}

impl std::fmt::Debug for DefaultCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCartsService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl DefaultCartsService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        items: Arc<dyn CartItemsRepository>,
        ttl: SignedDuration,
    ) -> Self {
        Self {
            validator: StockValidator::new(Arc::clone(&catalog)),
            catalog,
            items,
            ttl,
        }
    }

    async fn load(&self, session: GuestSession, now: Timestamp) -> Result<Cart, CartsServiceError> {
        let items = self.items.get_items(session, now).await?;

        Ok(Cart {
            session: Some(session),
            items,
        })
    }

    async fn lookup(
        &self,
        product_id: String,
        sku: &str,
    ) -> Result<(Product, Variant), CartsServiceError> {
        let product = self.catalog.get_product(product_id).await?;

        let variant = product
            .variant(sku)
            .cloned()
            .ok_or(CartsServiceError::ProductNotFound)?;

        Ok((product, variant))
    }

    async fn write(
        &self,
        session: GuestSession,
        item: CartItem,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        self.items.put_item(session, item, now + self.ttl).await?;

        self.load(session, now).await
    }
}

/// Line item priced and described from the catalog, never from the caller.
fn catalog_line(
    product: &Product,
    variant: &Variant,
    quantity: u32,
    added_at: Timestamp,
    now: Timestamp,
) -> CartItem {
    CartItem {
        sku: variant.sku.clone(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        size: variant.size.clone(),
        price: variant.price,
        quantity,
        image: product.primary_image().map(str::to_string),
        added_at,
        updated_at: now,
    }
}

#[async_trait]
impl CartsService for DefaultCartsService {
    async fn get_cart(&self, session: Option<GuestSession>) -> Result<Cart, CartsServiceError> {
        match session {
            Some(session) => self.load(session, Timestamp::now()).await,
            None => Ok(Cart::empty(None)),
        }
    }

    async fn add_item(
        &self,
        session: GuestSession,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError> {
        if !is_valid_quantity(item.quantity) {
            return Err(CartsServiceError::InvalidQuantity {
                quantity: item.quantity,
            });
        }

        let (product, variant) = self.lookup(item.product_id, &item.sku).await?;

        if !variant.is_in_stock() {
            return Err(CartsServiceError::OutOfStock { sku: variant.sku });
        }

        let now = Timestamp::now();
        let cart = self.load(session, now).await?;
        let existing = cart.item(&variant.sku);

        let quantity = existing.map_or(0, |line| line.quantity) + item.quantity;

        if quantity > variant.stock {
            return Err(CartsServiceError::InsufficientStock {
                sku: variant.sku,
                requested: quantity,
                available: variant.stock,
            });
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CartsServiceError::LineLimitExceeded { quantity });
        }

        let added_at = existing.map_or(now, |line| line.added_at);

        debug!(%session, sku = %variant.sku, quantity, "adding to cart");

        self.write(
            session,
            catalog_line(&product, &variant, quantity, added_at, now),
            now,
        )
        .await
    }

    async fn update_quantity(
        &self,
        session: GuestSession,
        sku: String,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if !is_valid_quantity(quantity) {
            return Err(CartsServiceError::InvalidQuantity { quantity });
        }

        let now = Timestamp::now();
        let cart = self.load(session, now).await?;

        let existing = cart.item(&sku).ok_or(CartsServiceError::ItemNotFound)?;

        let (product, variant) = self.lookup(existing.product_id.clone(), &sku).await?;

        if quantity > variant.stock {
            return Err(CartsServiceError::InsufficientStock {
                sku,
                requested: quantity,
                available: variant.stock,
            });
        }

        let line = catalog_line(&product, &variant, quantity, existing.added_at, now);

        self.write(session, line, now).await
    }

    async fn remove_item(
        &self,
        session: GuestSession,
        sku: String,
    ) -> Result<Cart, CartsServiceError> {
        self.items.delete_item(session, sku).await?;

        self.load(session, Timestamp::now()).await
    }

    async fn clear_cart(&self, session: GuestSession) -> Result<(), CartsServiceError> {
        self.items.clear_items(session).await?;

        Ok(())
    }

    async fn validate_cart(
        &self,
        session: Option<GuestSession>,
    ) -> Result<StockReport, CartsServiceError> {
        let cart = self.get_cart(session).await?;

        Ok(self
            .validator
            .report(cart.items.iter().map(Into::into).collect())
            .await)
    }

    async fn purge_expired(&self) -> Result<u64, CartsServiceError> {
        Ok(self.items.purge_expired(Timestamp::now()).await?)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the cart for a session. No session yields an empty cart.
    async fn get_cart(&self, session: Option<GuestSession>) -> Result<Cart, CartsServiceError>;

    /// Add units of a variant, merging with any existing line for the same sku.
    async fn add_item(
        &self,
        session: GuestSession,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError>;

    /// Replace the quantity of an existing line.
    async fn update_quantity(
        &self,
        session: GuestSession,
        sku: String,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line. Removing an absent sku is not an error.
    async fn remove_item(
        &self,
        session: GuestSession,
        sku: String,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, session: GuestSession) -> Result<(), CartsServiceError>;

    /// Check the session's cart against live stock without changing it.
    async fn validate_cart(
        &self,
        session: Option<GuestSession>,
    ) -> Result<StockReport, CartsServiceError>;

    /// Delete expired lines across all sessions.
    async fn purge_expired(&self) -> Result<u64, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::catalog::CatalogService,
        memory::MemoryStore,
        test::helpers::{memory_carts, new_item, new_product},
    };

    use super::*;

    async fn seeded() -> (MemoryStore, DefaultCartsService) {
        let store = MemoryStore::new();

        store
            .create_product(new_product("noir", &[("NOIR-50", 1000, 3), ("NOIR-100", 1800, 20)]))
            .await
            .expect("seeding should succeed");

        store
            .create_product(new_product("blanc", &[("BLANC-50", 900, 0)]))
            .await
            .expect("seeding should succeed");

        let carts = memory_carts(&store);

        (store, carts)
    }

    #[tokio::test]
    async fn get_cart_without_session_is_empty() -> TestResult {
        let (_store, carts) = seeded().await;

        let cart = carts.get_cart(None).await?;

        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_then_get_cart_shows_quantity() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-50", 2)).await?;

        let cart = carts.get_cart(Some(session)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].product_name, "Noir");
        assert_eq!(cart.total_price(), 2000);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_sku_twice_merges_quantities() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        let first = carts.add_item(session, new_item("noir", "NOIR-100", 2)).await?;
        let cart = carts.add_item(session, new_item("noir", "NOIR-100", 3)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].added_at, first.items[0].added_at);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_quantity_out_of_bounds() {
        let (_store, carts) = seeded().await;

        for quantity in [0, 11] {
            let result = carts
                .add_item(GuestSession::new(), new_item("noir", "NOIR-100", quantity))
                .await;

            assert!(
                matches!(result, Err(CartsServiceError::InvalidQuantity { .. })),
                "expected InvalidQuantity, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn add_item_unknown_product_returns_not_found() {
        let (_store, carts) = seeded().await;

        let result = carts
            .add_item(GuestSession::new(), new_item("missing", "NOIR-50", 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_sku_of_other_product_returns_not_found() {
        let (_store, carts) = seeded().await;

        let result = carts
            .add_item(GuestSession::new(), new_item("noir", "BLANC-50", 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_out_of_stock_variant_fails() {
        let (_store, carts) = seeded().await;

        let result = carts
            .add_item(GuestSession::new(), new_item("blanc", "BLANC-50", 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::OutOfStock { .. })),
            "expected OutOfStock, got {result:?}"
        );
    }

    #[tokio::test]
    async fn merged_quantity_above_stock_fails_and_keeps_line() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-50", 2)).await?;

        let result = carts.add_item(session, new_item("noir", "NOIR-50", 2)).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock { requested: 4, available: 3, .. })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = carts.get_cart(Some(session)).await?;

        assert_eq!(cart.items[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn merged_quantity_above_line_cap_fails_even_with_stock() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-100", 8)).await?;

        let result = carts.add_item(session, new_item("noir", "NOIR-100", 3)).await;

        assert!(
            matches!(result, Err(CartsServiceError::LineLimitExceeded { quantity: 11 })),
            "expected LineLimitExceeded, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn price_is_refreshed_from_catalog_on_write() -> TestResult {
        let (store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-100", 1)).await?;

        store.set_price("NOIR-100", 2500).await;

        let unchanged = carts.get_cart(Some(session)).await?;

        assert_eq!(unchanged.items[0].price, 1800);

        let updated = carts
            .update_quantity(session, "NOIR-100".to_string(), 2)
            .await?;

        assert_eq!(updated.items[0].price, 2500);
        assert_eq!(updated.total_price(), 5000);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_replaces_rather_than_sums() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-100", 4)).await?;

        let cart = carts
            .update_quantity(session, "NOIR-100".to_string(), 2)
            .await?;

        assert_eq!(cart.items[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_above_stock_leaves_line_unchanged() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-50", 1)).await?;

        let result = carts
            .update_quantity(session, "NOIR-50".to_string(), 4)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = carts.get_cart(Some(session)).await?;

        assert_eq!(cart.items[0].quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_of_absent_sku_returns_item_not_found() {
        let (_store, carts) = seeded().await;

        let result = carts
            .update_quantity(GuestSession::new(), "NOIR-50".to_string(), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_absent_sku_returns_cart_unchanged() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        let before = carts.add_item(session, new_item("noir", "NOIR-50", 1)).await?;
        let after = carts.remove_item(session, "NOIR-100".to_string()).await?;

        assert_eq!(before, after);

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_drops_only_that_line() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-50", 1)).await?;
        carts.add_item(session, new_item("noir", "NOIR-100", 1)).await?;

        let cart = carts.remove_item(session, "NOIR-50".to_string()).await?;

        let skus: Vec<&str> = cart.items.iter().map(|i| i.sku.as_str()).collect();

        assert_eq!(skus, ["NOIR-100"]);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_is_a_no_op_when_empty() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.clear_cart(session).await?;
        carts.add_item(session, new_item("noir", "NOIR-50", 1)).await?;
        carts.clear_cart(session).await?;

        assert!(carts.get_cart(Some(session)).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn validate_cart_reports_stock_drops() -> TestResult {
        let (store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-50", 3)).await?;
        carts.add_item(session, new_item("noir", "NOIR-100", 2)).await?;

        store.set_stock("NOIR-50", 1).await;
        store.set_stock("NOIR-100", 0).await;

        let report = carts.validate_cart(Some(session)).await?;

        let adjusted: Vec<&str> = report.adjustments.iter().map(|a| a.sku.as_str()).collect();
        let invalid: Vec<&str> = report.invalid_items.iter().map(|i| i.sku.as_str()).collect();

        assert_eq!(adjusted, ["NOIR-50"]);
        assert_eq!(invalid, ["NOIR-50", "NOIR-100"]);

        Ok(())
    }

    #[tokio::test]
    async fn validate_cart_with_stock_is_valid() -> TestResult {
        let (_store, carts) = seeded().await;
        let session = GuestSession::new();

        carts.add_item(session, new_item("noir", "NOIR-50", 2)).await?;

        assert!(carts.validate_cart(Some(session)).await?.is_valid());

        Ok(())
    }

    #[tokio::test]
    async fn expired_lines_are_hidden_and_purged() -> TestResult {
        let store = MemoryStore::new();

        store
            .create_product(new_product("noir", &[("NOIR-50", 1000, 3)]))
            .await?;

        let carts = DefaultCartsService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            SignedDuration::from_secs(-1),
        );

        let session = GuestSession::new();
        let cart = carts.add_item(session, new_item("noir", "NOIR-50", 1)).await?;

        assert!(cart.is_empty());
        assert_eq!(carts.purge_expired().await?, 1);

        Ok(())
    }
}
