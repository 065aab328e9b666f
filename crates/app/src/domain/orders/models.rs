//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::sessions::{GuestSession, UserIdentity},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Default prefix for human-facing order numbers.
pub const DEFAULT_ORDER_NUMBER_PREFIX: &str = "ORD";

/// Human-facing order number: the prefix plus the last six digits of the millisecond clock.
#[must_use]
pub fn order_number(prefix: &str, now: Timestamp) -> String {
    format!("{prefix}-{:06}", now.as_millisecond().rem_euclid(1_000_000))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Failed,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown status `{0}`")]
pub struct UnknownStatus(pub String);

/// Customer contact captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Shipping address snapshot, stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Line item snapshot, stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub sku: String,
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub quantity: u32,
    pub price: u64,
    pub image: Option<String>,
    pub total: u64,
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub session: Option<GuestSession>,
    pub user: Option<UserIdentity>,
    pub placed_as_guest: bool,
    pub linked_at: Option<Timestamp>,
    pub customer: CustomerContact,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub currency: String,
    pub payment_method: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub inventory_reconciliation_pending: bool,
    pub paid_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub session: Option<GuestSession>,
    pub customer: CustomerContact,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub currency: String,
    pub payment_method: Option<String>,
}

/// Payment outcome to record. Timestamps are written only when supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub paid_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
}

impl PaymentUpdate {
    #[must_use]
    pub fn paid(payment_id: String, signature: Option<String>, now: Timestamp) -> Self {
        Self {
            payment_id: Some(payment_id),
            signature,
            payment_status: PaymentStatus::Paid,
            status: OrderStatus::Confirmed,
            paid_at: Some(now),
            confirmed_at: Some(now),
        }
    }

    #[must_use]
    pub fn failed(payment_id: Option<String>, signature: Option<String>) -> Self {
        Self {
            payment_id,
            signature,
            payment_status: PaymentStatus::Failed,
            status: OrderStatus::Failed,
            paid_at: None,
            confirmed_at: None,
        }
    }
}

/// Result of a conditional payment transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentTransition {
    /// The order was pending and now carries the update.
    Applied(Order),
    /// The order had already left `pending`; nothing was written.
    Unchanged(Order),
}

impl PaymentTransition {
    #[must_use]
    pub fn into_order(self) -> Order {
        match self {
            Self::Applied(order) | Self::Unchanged(order) => order,
        }
    }
}
