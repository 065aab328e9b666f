//! Carts

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use repositories::{CartItemsRepository, MockCartItemsRepository, PgCartItemsRepository};
pub use service::*;
