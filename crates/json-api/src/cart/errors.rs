//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity { .. } | CartsServiceError::LineLimitExceeded { .. } => {
            StatusError::bad_request().brief(error.to_string())
        }
        CartsServiceError::InvalidData => StatusError::bad_request().brief("Invalid cart payload"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Item not in cart"),
        CartsServiceError::OutOfStock { .. } | CartsServiceError::InsufficientStock { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        CartsServiceError::Catalog(source) => {
            error!("cart catalog lookup failed: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Quantity updates report stock shortfalls as a bad request.
pub(crate) fn update_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::OutOfStock { .. } | CartsServiceError::InsufficientStock { .. } => {
            StatusError::bad_request().brief(error.to_string())
        }
        other => into_status_error(other),
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn stock_errors_conflict_on_add_but_reject_on_update() {
        let shortfall = || CartsServiceError::InsufficientStock {
            sku: "OUD-50".to_string(),
            requested: 4,
            available: 2,
        };

        assert_eq!(into_status_error(shortfall()).code, StatusCode::CONFLICT);
        assert_eq!(update_status_error(shortfall()).code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn brief_names_the_offending_quantity() {
        let status = into_status_error(CartsServiceError::InvalidQuantity { quantity: 11 });

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "quantity must be between 1 and 10, got 11");
    }
}
