//! Payments service errors.

use thiserror::Error;

use crate::domain::{
    carts::CartsServiceError,
    orders::{OrdersServiceError, models::OrderStatus},
    payments::razorpay::RazorpayError,
    stock::models::StockReport,
};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("cart is empty")]
    EmptyCart,

    #[error("{} item(s) in the cart are unavailable", .0.invalid_items.len())]
    StockUnavailable(StockReport),

    #[error("order total overflows")]
    AmountOverflow,

    #[error("payment provider not configured")]
    NotConfigured,

    #[error("payment provider error")]
    Provider(#[source] RazorpayError),

    #[error("payment signature verification failed")]
    InvalidSignature,

    #[error("order not found")]
    OrderNotFound,

    #[error("order is {status} and can no longer be paid")]
    OrderClosed { status: OrderStatus },

    #[error("malformed webhook payload")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("webhook event is missing `{field}`")]
    MissingEventField { field: &'static str },

    #[error("orders error")]
    Orders(#[source] OrdersServiceError),

    #[error("carts error")]
    Carts(#[source] CartsServiceError),
}

impl From<OrdersServiceError> for PaymentsServiceError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::NotFound => Self::OrderNotFound,
            other => Self::Orders(other),
        }
    }
}

impl From<CartsServiceError> for PaymentsServiceError {
    fn from(error: CartsServiceError) -> Self {
        Self::Carts(error)
    }
}

impl From<RazorpayError> for PaymentsServiceError {
    fn from(error: RazorpayError) -> Self {
        Self::Provider(error)
    }
}
