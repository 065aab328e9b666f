//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    context::AppContext,
    domain::{
        carts::{MockCartsService, models::{Cart, CartItem}},
        catalog::{MockCatalogService, models::{Product, Variant}},
        orders::{
            MockOrdersService,
            models::{
                CustomerContact, Order, OrderItem, OrderStatus, OrderUuid, PaymentStatus,
                ShippingAddress,
            },
        },
        payments::MockPaymentsService,
        sessions::GuestSession,
    },
};

use crate::{
    sessions::{self, SessionSettings},
    state::State,
};

pub(crate) const TEST_SESSION: GuestSession = GuestSession::from_uuid(Uuid::from_u128(
    0x0190_0000_0000_7000_8000_0000_0000_0001,
));

pub(crate) fn session_cookie() -> String {
    format!("cart_session_id={TEST_SESSION}")
}

/// Service mocks; any call not explicitly expected fails the test.
pub(crate) struct Mocks {
    pub(crate) catalog: MockCatalogService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) payments: MockPaymentsService,
}

impl Default for Mocks {
    fn default() -> Self {
        let mut catalog = MockCatalogService::new();

        catalog.expect_list_products().never();
        catalog.expect_get_product().never();
        catalog.expect_get_variant().never();
        catalog.expect_create_product().never();
        catalog.expect_decrement_stock().never();

        let mut carts = MockCartsService::new();

        carts.expect_get_cart().never();
        carts.expect_add_item().never();
        carts.expect_update_quantity().never();
        carts.expect_remove_item().never();
        carts.expect_clear_cart().never();
        carts.expect_validate_cart().never();
        carts.expect_purge_expired().never();

        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();
        orders.expect_get_order().never();
        orders.expect_find_by_razorpay_order_id().never();
        orders.expect_update_razorpay_order_id().never();
        orders.expect_update_payment_details().never();
        orders.expect_flag_inventory_reconciliation().never();
        orders.expect_delete_order().never();
        orders.expect_link_to_user().never();

        let mut payments = MockPaymentsService::new();

        payments.expect_create_checkout().never();
        payments.expect_verify_payment().never();
        payments.expect_process_webhook().never();

        Self {
            catalog,
            carts,
            orders,
            payments,
        }
    }
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::new(
            AppContext {
                catalog: Arc::new(self.catalog),
                carts: Arc::new(self.carts),
                orders: Arc::new(self.orders),
                payments: Arc::new(self.payments),
            },
            SessionSettings::default(),
        )
    }

    /// Mount `route` behind the state and session middleware.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(sessions::middleware)
                .push(route),
        )
    }
}

pub(crate) fn make_product(id: &str, variants: &[(&str, u64, u32)]) -> Product {
    Product {
        id: id.to_string(),
        name: format!("{id} eau de parfum"),
        slug: id.to_string(),
        category: "unisex".to_string(),
        description: String::new(),
        images: vec![format!("/images/{id}.jpg")],
        variants: variants
            .iter()
            .map(|(sku, price, stock)| Variant {
                sku: (*sku).to_string(),
                product_id: id.to_string(),
                size: "50ml".to_string(),
                price: *price,
                stock: *stock,
            })
            .collect(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(lines: &[(&str, u64, u32)]) -> Cart {
    Cart {
        session: Some(TEST_SESSION),
        items: lines
            .iter()
            .map(|(sku, price, quantity)| CartItem {
                sku: (*sku).to_string(),
                product_id: "oud".to_string(),
                product_name: "Oud eau de parfum".to_string(),
                size: "50ml".to_string(),
                price: *price,
                quantity: *quantity,
                image: None,
                added_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            })
            .collect(),
    }
}

pub(crate) fn make_order(status: OrderStatus, payment_status: PaymentStatus) -> Order {
    Order {
        uuid: OrderUuid::new(),
        order_number: "ORD-123456".to_string(),
        session: Some(TEST_SESSION),
        user: None,
        placed_as_guest: true,
        linked_at: None,
        customer: CustomerContact {
            email: "asha@example.com".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "9999999999".to_string(),
        },
        shipping_address: ShippingAddress {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9999999999".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            zip_code: "560001".to_string(),
            country: "IN".to_string(),
        },
        items: vec![OrderItem {
            sku: "OUD-50".to_string(),
            product_id: "oud".to_string(),
            product_name: "Oud eau de parfum".to_string(),
            size: "50ml".to_string(),
            quantity: 2,
            price: 1000,
            image: None,
            total: 2000,
        }],
        subtotal: 2000,
        tax: 0,
        shipping_cost: 0,
        total: 2000,
        currency: "INR".to_string(),
        payment_method: None,
        razorpay_order_id: Some("order_test_1".to_string()),
        razorpay_payment_id: None,
        razorpay_signature: None,
        payment_status,
        status,
        inventory_reconciliation_pending: false,
        paid_at: None,
        confirmed_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
