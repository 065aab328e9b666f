//! In-memory storage backend.
//!
//! Implements the catalog, cart line and order ledger seams behind a single
//! async mutex, so every operation (including the stock decrement and the
//! pending-only payment transition) is a compare-and-set against one state.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use crate::domain::{
    carts::{CartItemsRepository, models::CartItem},
    catalog::{
        CatalogService, CatalogServiceError,
        models::{NewProduct, Product, Variant},
    },
    orders::{
        OrdersService, OrdersServiceError,
        models::{
            NewOrder, Order, OrderStatus, OrderUuid, PaymentStatus, PaymentTransition,
            PaymentUpdate,
        },
    },
    sessions::{GuestSession, UserIdentity},
};

#[derive(Debug, Clone)]
struct StoredItem {
    item: CartItem,
    expires_at: Timestamp,
}

#[derive(Debug, Default)]
struct MemoryState {
    products: BTreeMap<String, Product>,
    carts: FxHashMap<GuestSession, Vec<StoredItem>>,
    orders: FxHashMap<OrderUuid, Order>,
}

impl MemoryState {
    fn variant_mut(&mut self, sku: &str) -> Option<&mut Variant> {
        self.products
            .values_mut()
            .flat_map(|product| product.variants.iter_mut())
            .find(|variant| variant.sku == sku)
    }

    fn variant(&self, sku: &str) -> Option<&Variant> {
        self.products
            .values()
            .flat_map(|product| product.variants.iter())
            .find(|variant| variant.sku == sku)
    }

    fn order_mut(&mut self, order: OrderUuid) -> Result<&mut Order, OrdersServiceError> {
        self.orders
            .get_mut(&order)
            .ok_or(OrdersServiceError::NotFound)
    }
}

/// Process-local store; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn set_price(&self, sku: &str, price: u64) {
        if let Some(variant) = self.state.lock().await.variant_mut(sku) {
            variant.price = price;
        }
    }

    #[cfg(test)]
    pub(crate) async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    #[cfg(test)]
    pub(crate) async fn set_stock(&self, sku: &str, stock: u32) {
        if let Some(variant) = self.state.lock().await.variant_mut(sku) {
            variant.stock = stock;
        }
    }
}

#[async_trait]
impl CatalogService for MemoryStore {
    async fn list_products(
        &self,
        category: Option<String>,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        let state = self.state.lock().await;

        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|product| category.as_ref().is_none_or(|c| &product.category == c))
            .cloned()
            .collect();

        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(products)
    }

    async fn get_product(&self, product_id: String) -> Result<Product, CatalogServiceError> {
        self.state
            .lock()
            .await
            .products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogServiceError::NotFound)
    }

    async fn get_variant(&self, sku: String) -> Result<Variant, CatalogServiceError> {
        self.state
            .lock()
            .await
            .variant(&sku)
            .cloned()
            .ok_or(CatalogServiceError::NotFound)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let mut state = self.state.lock().await;

        let duplicate = state.products.contains_key(&product.id)
            || state.products.values().any(|p| p.slug == product.slug)
            || product.variants.iter().any(|v| state.variant(&v.sku).is_some());

        if duplicate {
            return Err(CatalogServiceError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = Product {
            variants: product
                .variants
                .into_iter()
                .map(|variant| Variant {
                    sku: variant.sku,
                    product_id: product.id.clone(),
                    size: variant.size,
                    price: variant.price,
                    stock: variant.stock,
                })
                .collect(),
            id: product.id,
            name: product.name,
            slug: product.slug,
            category: product.category,
            description: product.description,
            images: product.images,
            created_at: now,
            updated_at: now,
        };

        state.products.insert(created.id.clone(), created.clone());

        Ok(created)
    }

    async fn decrement_stock(
        &self,
        sku: String,
        quantity: u32,
    ) -> Result<Variant, CatalogServiceError> {
        let mut state = self.state.lock().await;

        let variant = state
            .variant_mut(&sku)
            .ok_or(CatalogServiceError::NotFound)?;

        let Some(remaining) = variant.stock.checked_sub(quantity) else {
            return Err(CatalogServiceError::InsufficientStock {
                requested: quantity,
                available: variant.stock,
                sku,
            });
        };

        variant.stock = remaining;

        Ok(variant.clone())
    }
}

#[async_trait]
impl CartItemsRepository for MemoryStore {
    async fn get_items(
        &self,
        session: GuestSession,
        now: Timestamp,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        let state = self.state.lock().await;

        let mut items: Vec<CartItem> = state
            .carts
            .get(&session)
            .into_iter()
            .flatten()
            .filter(|stored| stored.expires_at > now)
            .map(|stored| stored.item.clone())
            .collect();

        items.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.sku.cmp(&b.sku)));

        Ok(items)
    }

    async fn put_item(
        &self,
        session: GuestSession,
        item: CartItem,
        expires_at: Timestamp,
    ) -> Result<CartItem, sqlx::Error> {
        let mut state = self.state.lock().await;
        let lines = state.carts.entry(session).or_default();

        let stored = StoredItem {
            item: item.clone(),
            expires_at,
        };

        match lines.iter_mut().find(|line| line.item.sku == item.sku) {
            Some(line) => *line = stored,
            None => lines.push(stored),
        }

        Ok(item)
    }

    async fn delete_item(&self, session: GuestSession, sku: String) -> Result<u64, sqlx::Error> {
        let mut state = self.state.lock().await;

        let Some(lines) = state.carts.get_mut(&session) else {
            return Ok(0);
        };

        let before = lines.len();

        lines.retain(|line| line.item.sku != sku);

        Ok((before - lines.len()) as u64)
    }

    async fn clear_items(&self, session: GuestSession) -> Result<u64, sqlx::Error> {
        let removed = self.state.lock().await.carts.remove(&session);

        Ok(removed.map_or(0, |lines| lines.len() as u64))
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64, sqlx::Error> {
        let mut state = self.state.lock().await;
        let mut purged = 0;

        for lines in state.carts.values_mut() {
            let before = lines.len();

            lines.retain(|line| line.expires_at > now);

            purged += (before - lines.len()) as u64;
        }

        state.carts.retain(|_, lines| !lines.is_empty());

        Ok(purged)
    }
}

#[async_trait]
impl OrdersService for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let mut state = self.state.lock().await;

        if state.orders.contains_key(&order.uuid) {
            return Err(OrdersServiceError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = Order {
            uuid: order.uuid,
            order_number: order.order_number,
            session: order.session,
            user: None,
            placed_as_guest: true,
            linked_at: None,
            customer: order.customer,
            shipping_address: order.shipping_address,
            items: order.items,
            subtotal: order.subtotal,
            tax: order.tax,
            shipping_cost: order.shipping_cost,
            total: order.total,
            currency: order.currency,
            payment_method: order.payment_method,
            razorpay_order_id: None,
            razorpay_payment_id: None,
            razorpay_signature: None,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            inventory_reconciliation_pending: false,
            paid_at: None,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        };

        state.orders.insert(created.uuid, created.clone());

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        self.state
            .lock()
            .await
            .orders
            .get(&order)
            .cloned()
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn find_by_razorpay_order_id(
        &self,
        razorpay_order_id: String,
    ) -> Result<Order, OrdersServiceError> {
        self.state
            .lock()
            .await
            .orders
            .values()
            .find(|order| {
                order.razorpay_order_id.as_deref() == Some(razorpay_order_id.as_str())
            })
            .cloned()
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn update_razorpay_order_id(
        &self,
        order: OrderUuid,
        razorpay_order_id: String,
    ) -> Result<Order, OrdersServiceError> {
        let mut state = self.state.lock().await;

        let taken = state.orders.values().any(|other| {
            other.uuid != order
                && other.razorpay_order_id.as_deref() == Some(razorpay_order_id.as_str())
        });

        if taken {
            return Err(OrdersServiceError::AlreadyExists);
        }

        let stored = state.order_mut(order)?;

        stored.razorpay_order_id = Some(razorpay_order_id);
        stored.updated_at = Timestamp::now();

        Ok(stored.clone())
    }

    async fn update_payment_details(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<PaymentTransition, OrdersServiceError> {
        let mut state = self.state.lock().await;
        let stored = state.order_mut(order)?;

        if !stored.is_pending() {
            return Ok(PaymentTransition::Unchanged(stored.clone()));
        }

        if let Some(payment_id) = update.payment_id {
            stored.razorpay_payment_id = Some(payment_id);
        }

        if let Some(signature) = update.signature {
            stored.razorpay_signature = Some(signature);
        }

        stored.payment_status = update.payment_status;
        stored.status = update.status;
        stored.paid_at = update.paid_at.or(stored.paid_at);
        stored.confirmed_at = update.confirmed_at.or(stored.confirmed_at);
        stored.updated_at = Timestamp::now();

        Ok(PaymentTransition::Applied(stored.clone()))
    }

    async fn flag_inventory_reconciliation(
        &self,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut state = self.state.lock().await;
        let stored = state.order_mut(order)?;

        stored.inventory_reconciliation_pending = true;
        stored.updated_at = Timestamp::now();

        Ok(stored.clone())
    }

    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut state = self.state.lock().await;

        match state.orders.get(&order) {
            Some(stored) if stored.is_pending() => {
                state.orders.remove(&order);

                Ok(())
            }
            _ => Err(OrdersServiceError::NotFound),
        }
    }

    async fn link_to_user(
        &self,
        order: OrderUuid,
        user: UserIdentity,
    ) -> Result<Order, OrdersServiceError> {
        let mut state = self.state.lock().await;
        let stored = state.order_mut(order)?;

        if stored.user.is_some() {
            return Err(OrdersServiceError::AlreadyLinked);
        }

        let now = Timestamp::now();

        stored.user = Some(user);
        stored.linked_at = Some(now);
        stored.updated_at = now;

        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::helpers::{new_order, new_product};

    use super::*;

    #[tokio::test]
    async fn concurrent_decrements_of_last_unit_sell_it_once() -> TestResult {
        let store = MemoryStore::new();

        store
            .create_product(new_product("noir", &[("NOIR-50", 1000, 1)]))
            .await?;

        let (first, second) = tokio::join!(
            store.decrement_stock("NOIR-50".to_string(), 1),
            store.decrement_stock("NOIR-50".to_string(), 1),
        );

        let failures: Vec<_> = [first, second].into_iter().filter_map(Result::err).collect();

        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            CatalogServiceError::InsufficientStock { available: 0, .. }
        ));
        assert_eq!(store.get_variant("NOIR-50".to_string()).await?.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_decrements_across_tasks_never_oversell() -> TestResult {
        let store = MemoryStore::new();

        store
            .create_product(new_product("noir", &[("NOIR-50", 1000, 5)]))
            .await?;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();

                tokio::spawn(async move { store.decrement_stock("NOIR-50".to_string(), 1).await })
            })
            .collect();

        let mut sold = 0;

        for handle in handles {
            if handle.await?.is_ok() {
                sold += 1;
            }
        }

        assert_eq!(sold, 5);
        assert_eq!(store.get_variant("NOIR-50".to_string()).await?.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_product_rejects_duplicate_sku() -> TestResult {
        let store = MemoryStore::new();

        store
            .create_product(new_product("noir", &[("NOIR-50", 1000, 1)]))
            .await?;

        let result = store
            .create_product(new_product("blanc", &[("NOIR-50", 1000, 1)]))
            .await;

        assert!(matches!(result, Err(CatalogServiceError::AlreadyExists)));

        Ok(())
    }

    #[tokio::test]
    async fn payment_transition_is_pending_only() -> TestResult {
        let store = MemoryStore::new();
        let order = store.create_order(new_order(1, 1000)).await?;

        let applied = store
            .update_payment_details(
                order.uuid,
                PaymentUpdate::paid("pay_1".to_string(), None, Timestamp::now()),
            )
            .await?;

        assert!(matches!(applied, PaymentTransition::Applied(_)));

        let repeated = store
            .update_payment_details(order.uuid, PaymentUpdate::failed(None, None))
            .await?;

        let PaymentTransition::Unchanged(current) = repeated else {
            panic!("expected Unchanged");
        };

        assert_eq!(current.status, OrderStatus::Confirmed);

        Ok(())
    }

    #[tokio::test]
    async fn delete_order_only_removes_pending_orders() -> TestResult {
        let store = MemoryStore::new();
        let pending = store.create_order(new_order(1, 1000)).await?;
        let failed = store.create_order(new_order(1, 1000)).await?;

        store
            .update_payment_details(failed.uuid, PaymentUpdate::failed(None, None))
            .await?;

        store.delete_order(pending.uuid).await?;

        assert!(matches!(
            store.get_order(pending.uuid).await,
            Err(OrdersServiceError::NotFound)
        ));
        assert!(matches!(
            store.delete_order(failed.uuid).await,
            Err(OrdersServiceError::NotFound)
        ));

        Ok(())
    }
}
