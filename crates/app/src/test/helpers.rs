//! Test Helpers

use std::sync::Arc;

use jiff::Timestamp;

use crate::{
    domain::{
        carts::{
            DefaultCartsService,
            models::{CartItem, NewCartItem},
        },
        catalog::models::{NewProduct, NewVariant},
        orders::models::{
            CustomerContact, NewOrder, OrderItem, OrderUuid, ShippingAddress, order_number,
        },
        payments::{
            models::{CheckoutRequest, PaymentSettings},
            signature::SigningSecret,
        },
        sessions::DEFAULT_SESSION_TTL,
    },
    memory::MemoryStore,
};

pub(crate) const TEST_KEY_ID: &str = "rzp_test_key";
pub(crate) const TEST_KEY_SECRET: &str = "rzp_test_secret";
pub(crate) const TEST_WEBHOOK_SECRET: &str = "rzp_webhook_secret";

/// A product named after its id, with `(sku, price, stock)` variants.
pub(crate) fn new_product(id: &str, variants: &[(&str, u64, u32)]) -> NewProduct {
    let mut name = id.to_string();

    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    NewProduct {
        id: id.to_string(),
        name,
        slug: id.to_string(),
        category: "unisex".to_string(),
        description: String::new(),
        images: vec![format!("/images/{id}.jpg")],
        variants: variants
            .iter()
            .map(|&(sku, price, stock)| NewVariant {
                sku: sku.to_string(),
                size: "50ml".to_string(),
                price,
                stock,
            })
            .collect(),
    }
}

pub(crate) fn new_item(product_id: &str, sku: &str, quantity: u32) -> NewCartItem {
    NewCartItem {
        sku: sku.to_string(),
        product_id: product_id.to_string(),
        quantity,
    }
}

pub(crate) fn cart_item(sku: &str, price: u64, quantity: u32, now: Timestamp) -> CartItem {
    CartItem {
        sku: sku.to_string(),
        product_id: "noir".to_string(),
        product_name: "Noir".to_string(),
        size: "50ml".to_string(),
        price,
        quantity,
        image: None,
        added_at: now,
        updated_at: now,
    }
}

pub(crate) fn customer() -> CustomerContact {
    CustomerContact {
        email: "asha@example.com".to_string(),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        phone: "9999999999".to_string(),
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9999999999".to_string(),
        street: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "KA".to_string(),
        zip_code: "560001".to_string(),
        country: "IN".to_string(),
    }
}

/// A pending order snapshot holding one `NOIR-50` line.
pub(crate) fn new_order(quantity: u32, price: u64) -> NewOrder {
    let total = price * u64::from(quantity);

    NewOrder {
        uuid: OrderUuid::new(),
        order_number: order_number("ORD", Timestamp::now()),
        session: None,
        customer: customer(),
        shipping_address: shipping_address(),
        items: vec![OrderItem {
            sku: "NOIR-50".to_string(),
            product_id: "noir".to_string(),
            product_name: "Noir".to_string(),
            size: "50ml".to_string(),
            quantity,
            price,
            image: None,
            total,
        }],
        subtotal: total,
        tax: 0,
        shipping_cost: 0,
        total,
        currency: "INR".to_string(),
        payment_method: None,
    }
}

pub(crate) fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        customer: customer(),
        shipping_address: shipping_address(),
        tax: 0,
        shipping_cost: 0,
        payment_method: Some("razorpay".to_string()),
    }
}

pub(crate) fn payment_settings() -> PaymentSettings {
    PaymentSettings {
        key_id: Some(TEST_KEY_ID.to_string()),
        key_secret: Some(SigningSecret::new(TEST_KEY_SECRET)),
        webhook_secret: Some(SigningSecret::new(TEST_WEBHOOK_SECRET)),
        ..PaymentSettings::default()
    }
}

pub(crate) fn memory_carts(store: &MemoryStore) -> DefaultCartsService {
    DefaultCartsService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        DEFAULT_SESSION_TTL,
    )
}
