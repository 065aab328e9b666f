//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::catalog::CatalogServiceError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be between 1 and 10, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    #[error("a line may hold at most 10 units, would hold {quantity}")]
    LineLimitExceeded { quantity: u32 },

    #[error("product not found")]
    ProductNotFound,

    #[error("item not in cart")]
    ItemNotFound,

    #[error("{sku} is out of stock")]
    OutOfStock { sku: String },

    #[error("only {available} of {sku} available, requested {requested}")]
    InsufficientStock {
        sku: String,
        requested: u32,
        available: u32,
    },

    #[error("invalid data")]
    InvalidData,

    #[error("catalog error")]
    Catalog(#[source] CatalogServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<CatalogServiceError> for CartsServiceError {
    fn from(error: CatalogServiceError) -> Self {
        match error {
            CatalogServiceError::NotFound => Self::ProductNotFound,
            other => Self::Catalog(other),
        }
    }
}
