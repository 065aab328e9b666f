//! Payment Models

use serde::Deserialize;

use crate::domain::{
    orders::models::{CustomerContact, Order, OrderUuid, ShippingAddress},
    payments::signature::SigningSecret,
};

/// Provider credentials and checkout defaults.
#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub key_id: Option<String>,
    pub key_secret: Option<SigningSecret>,
    pub webhook_secret: Option<SigningSecret>,
    pub currency: String,
    pub order_number_prefix: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            webhook_secret: None,
            currency: "INR".to_string(),
            order_number_prefix: crate::domain::orders::models::DEFAULT_ORDER_NUMBER_PREFIX
                .to_string(),
        }
    }
}

/// Customer details submitted at checkout. Line items come from the session's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer: CustomerContact,
    pub shipping_address: ShippingAddress,
    pub tax: u64,
    pub shipping_cost: u64,
    pub payment_method: Option<String>,
}

/// A pending order with its provider payment intent.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub order: Order,
    pub razorpay_order_id: String,
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
}

/// Signed callback relayed by the browser after payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    pub order: OrderUuid,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub order: Order,
    /// The order had already been finalized; nothing was written.
    pub already_processed: bool,
    /// Skus whose stock decrement did not apply.
    pub skipped_items: Vec<String>,
}

/// Outcome of a verified webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Confirmed(Reconciliation),
    /// A payment attempt failed. The order is left as it was so the shopper
    /// can retry against the same provider order.
    AttemptFailed { order: Order, payment_id: String },
    Ignored { event: String },
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WebhookPayload {
    pub payment: Option<WebhookEntity<WebhookPayment>>,
    pub order: Option<WebhookEntity<WebhookOrder>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookEntity<T> {
    pub entity: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookPayment {
    pub id: String,
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookOrder {
    pub id: String,
}

impl WebhookEvent {
    pub(crate) fn payment_id(&self) -> Option<&str> {
        self.payload
            .payment
            .as_ref()
            .map(|payment| payment.entity.id.as_str())
    }

    pub(crate) fn provider_order_id(&self) -> Option<&str> {
        self.payload
            .payment
            .as_ref()
            .and_then(|payment| payment.entity.order_id.as_deref())
            .or_else(|| {
                self.payload
                    .order
                    .as_ref()
                    .map(|order| order.entity.id.as_str())
            })
    }
}
