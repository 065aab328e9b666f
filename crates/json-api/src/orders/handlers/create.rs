//! Create Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use storefront_app::domain::payments::models::CheckoutRequest;

use crate::{
    extensions::*,
    orders::models::{CreateOrderRequest, CreateOrderResponse},
    payments::errors::into_status_error,
    state::State,
};

/// Create Order Handler
///
/// Snapshots the session's cart into a pending order and opens a provider
/// payment intent for its total.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::OK, description = "Pending order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing field or empty cart"),
        (status_code = StatusCode::CONFLICT, description = "Some cart items are unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Provider not configured"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Provider call failed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<CreateOrderResponse>, StatusError> {
    let request = CheckoutRequest::try_from(json.into_inner())
        .map_err(|brief| StatusError::bad_request().brief(brief))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let checkout = state
        .app
        .payments
        .create_checkout(depot.guest_session(), request)
        .await
        .map_err(into_status_error)?;

    Ok(Json(checkout.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::models::{OrderStatus, PaymentStatus},
        payments::{
            PaymentsServiceError,
            models::Checkout,
            razorpay::RazorpayError,
        },
        stock::models::{StockCheck, StockReport, ValidatedItem},
    };

    use crate::test_helpers::{Mocks, TEST_SESSION, make_order, session_cookie};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("orders/create").post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "customerEmail": "asha@example.com",
            "customerFirstName": "Asha",
            "customerLastName": "Rao",
            "customerPhone": "9999999999",
            "shippingAddress": {
                "firstName": "Asha",
                "lastName": "Rao",
                "street": "12 MG Road",
                "city": "Bengaluru",
                "state": "KA",
                "zipCode": "560001",
                "country": "IN"
            },
            "tax": 100,
            "shippingCost": 50
        })
    }

    #[tokio::test]
    async fn test_create_returns_provider_intent() -> TestResult {
        let mut mocks = Mocks::default();
        let order = make_order(OrderStatus::Pending, PaymentStatus::Pending);
        let order_id = order.uuid;

        mocks
            .payments
            .expect_create_checkout()
            .once()
            .withf(|session, request| {
                *session == Some(TEST_SESSION)
                    && request.customer.email == "asha@example.com"
                    && request.shipping_address.zip_code == "560001"
                    && request.tax == 100
                    && request.shipping_cost == 50
            })
            .return_once(move |_, _| {
                Ok(Checkout {
                    order,
                    razorpay_order_id: "order_test_1".to_string(),
                    amount: 2150,
                    currency: "INR".to_string(),
                    key_id: "rzp_test_key".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let created: CreateOrderResponse = res.take_json().await?;

        assert_eq!(created.order_id, order_id.into_uuid());
        assert_eq!(created.razorpay_order_id, "order_test_1");
        assert_eq!(created.amount, 2150);
        assert_eq!(created.key_id, "rzp_test_key");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_missing_email_returns_400() -> TestResult {
        let mut payload = body();

        if let Some(fields) = payload.as_object_mut() {
            fields.remove("customerEmail");
        }

        let mut res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&payload)
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("customerEmail is required"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_without_shipping_address_returns_400() -> TestResult {
        let mut res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&json!({
                "customerEmail": "asha@example.com",
                "customerFirstName": "Asha",
                "customerPhone": "9999999999"
            }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("shippingAddress is required"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_blank_city_returns_400() -> TestResult {
        let mut payload = body();

        if let Some(address) = payload
            .get_mut("shippingAddress")
            .and_then(serde_json::Value::as_object_mut)
        {
            address.insert("city".to_string(), json!("  "));
        }

        let mut res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&payload)
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains("shippingAddress.city is required"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_empty_cart_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_create_checkout()
            .once()
            .return_once(|_, _| Err(PaymentsServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_unavailable_items_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.payments.expect_create_checkout().once().return_once(|_, _| {
            Err(PaymentsServiceError::StockUnavailable(
                StockReport::from_validated(vec![ValidatedItem::new(
                    StockCheck {
                        sku: "OUD-50".to_string(),
                        product_name: "Oud".to_string(),
                        requested_quantity: 2,
                    },
                    0,
                )]),
            ))
        });

        let res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_without_credentials_returns_500() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_create_checkout()
            .once()
            .return_once(|_, _| Err(PaymentsServiceError::NotConfigured));

        let res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_provider_failure_returns_502() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.payments.expect_create_checkout().once().return_once(|_, _| {
            Err(PaymentsServiceError::Provider(
                RazorpayError::UnexpectedResponse("503 Service Unavailable".to_string()),
            ))
        });

        let res = TestClient::post("http://example.com/orders/create")
            .add_header("cookie", session_cookie(), true)
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }
}
