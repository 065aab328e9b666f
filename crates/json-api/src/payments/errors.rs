//! Payment Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::domain::{
    payments::PaymentsServiceError, stock::models::StockReport,
};

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::MissingField { field } => {
            StatusError::bad_request().brief(format!("{field} is required"))
        }
        PaymentsServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        PaymentsServiceError::AmountOverflow => {
            StatusError::bad_request().brief("Order total is out of range")
        }
        PaymentsServiceError::StockUnavailable(report) => StatusError::conflict()
            .brief("Some items in your cart are unavailable")
            .detail(describe_unavailable(&report)),
        PaymentsServiceError::NotConfigured => {
            error!("checkout attempted without payment provider credentials");

            StatusError::internal_server_error().brief("Payment provider not configured")
        }
        PaymentsServiceError::Provider(source) => {
            error!("payment provider call failed: {source}");

            StatusError::bad_gateway().brief("Payment provider unavailable")
        }
        PaymentsServiceError::InvalidSignature => {
            warn!("payment signature verification failed");

            StatusError::bad_request().brief("Payment verification failed")
        }
        PaymentsServiceError::OrderNotFound => StatusError::not_found().brief("Order not found"),
        PaymentsServiceError::OrderClosed { status } => {
            StatusError::conflict().brief(format!("Order is {status} and can no longer be paid"))
        }
        PaymentsServiceError::InvalidPayload(source) => {
            warn!("malformed webhook payload: {source}");

            StatusError::bad_request().brief("Malformed webhook payload")
        }
        PaymentsServiceError::MissingEventField { field } => {
            StatusError::bad_request().brief(format!("Webhook event is missing {field}"))
        }
        PaymentsServiceError::Orders(source) => {
            error!("order ledger failed during payment: {source}");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::Carts(source) => {
            error!("cart lookup failed during payment: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// One clause per line that cannot be fulfilled.
fn describe_unavailable(report: &StockReport) -> String {
    report
        .invalid_items
        .iter()
        .map(|item| {
            if item.in_stock {
                format!(
                    "{} ({}): only {} available, {} requested",
                    item.product_name, item.sku, item.available_quantity, item.requested_quantity
                )
            } else {
                format!("{} ({}): out of stock", item.product_name, item.sku)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use storefront_app::domain::stock::models::{StockCheck, ValidatedItem};

    use super::*;

    fn check(sku: &str, requested_quantity: u32) -> StockCheck {
        StockCheck {
            sku: sku.to_string(),
            product_name: "Oud".to_string(),
            requested_quantity,
        }
    }

    #[test]
    fn unavailable_stock_enumerates_every_item() {
        let report = StockReport::from_validated(vec![
            ValidatedItem::new(check("OUD-50", 3), 1),
            ValidatedItem::new(check("OUD-100", 1), 0),
            ValidatedItem::new(check("OUD-10", 1), 9),
        ]);

        let status = into_status_error(PaymentsServiceError::StockUnavailable(report));

        assert_eq!(status.code, StatusCode::CONFLICT);
        assert_eq!(
            status.detail.as_deref(),
            Some("Oud (OUD-50): only 1 available, 3 requested; Oud (OUD-100): out of stock")
        );
    }

    #[test]
    fn provider_and_configuration_failures_are_distinguished() {
        assert_eq!(
            into_status_error(PaymentsServiceError::NotConfigured).code,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            into_status_error(PaymentsServiceError::InvalidSignature).code,
            StatusCode::BAD_REQUEST
        );
    }
}
