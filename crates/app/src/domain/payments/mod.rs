//! Payments

pub mod errors;
pub mod models;
pub mod razorpay;
pub mod service;
pub mod signature;

pub use errors::PaymentsServiceError;
pub use service::*;
