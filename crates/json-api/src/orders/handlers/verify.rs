//! Verify Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::{info, warn};

use storefront_app::domain::{orders::models::OrderUuid, payments::models::PaymentVerification};

use crate::{
    extensions::*,
    fields::required,
    observability::record_reconciliation_failures,
    orders::models::{OrderResponse, VerifyPaymentRequest, VerifyPaymentResponse},
    payments::errors::into_status_error,
    state::State,
};

impl TryFrom<VerifyPaymentRequest> for PaymentVerification {
    type Error = String;

    fn try_from(request: VerifyPaymentRequest) -> Result<Self, Self::Error> {
        let order = required(request.order_id, "orderId")?;

        Ok(PaymentVerification {
            order: order
                .parse::<OrderUuid>()
                .map_err(|_ignored| "orderId must be a UUID".to_string())?,
            razorpay_order_id: required(request.razorpay_order_id, "razorpayOrderId")?,
            razorpay_payment_id: required(request.razorpay_payment_id, "razorpayPaymentId")?,
            razorpay_signature: required(request.razorpay_signature, "razorpaySignature")?,
        })
    }
}

/// Verify Payment Handler
///
/// Checks the provider's callback signature, confirms the order and takes its
/// stock. Repeating the call for a confirmed order has no further effect.
#[endpoint(
    tags("orders"),
    summary = "Verify Payment",
    responses(
        (status_code = StatusCode::OK, description = "Order confirmed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing field or signature mismatch"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order already failed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<VerifyPaymentResponse>, StatusError> {
    let verification = PaymentVerification::try_from(json.into_inner())
        .map_err(|brief| StatusError::bad_request().brief(brief))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reconciliation = state
        .app
        .payments
        .verify_payment(verification)
        .await
        .map_err(into_status_error)?;

    if !reconciliation.skipped_items.is_empty() {
        warn!(
            order = %reconciliation.order.uuid,
            skipped = ?reconciliation.skipped_items,
            "order confirmed with stock left to reconcile"
        );

        record_reconciliation_failures(reconciliation.skipped_items.len());
    }

    info!(
        order = %reconciliation.order.uuid,
        already_processed = reconciliation.already_processed,
        "payment verified"
    );

    Ok(Json(VerifyPaymentResponse {
        already_processed: reconciliation.already_processed,
        order: OrderResponse::from(reconciliation.order),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::models::{OrderStatus, PaymentStatus},
        payments::{PaymentsServiceError, models::Reconciliation},
    };

    use crate::test_helpers::{Mocks, make_order};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("orders/verify-payment").post(handler))
    }

    fn body(order: OrderUuid) -> serde_json::Value {
        json!({
            "orderId": order.to_string(),
            "razorpayOrderId": "order_test_1",
            "razorpayPaymentId": "pay_test_1",
            "razorpaySignature": "abc123"
        })
    }

    #[tokio::test]
    async fn test_verify_confirms_order() -> TestResult {
        let mut mocks = Mocks::default();
        let order = make_order(OrderStatus::Confirmed, PaymentStatus::Paid);
        let order_id = order.uuid;

        mocks
            .payments
            .expect_verify_payment()
            .once()
            .withf(move |verification| {
                verification.order == order_id
                    && verification.razorpay_order_id == "order_test_1"
                    && verification.razorpay_payment_id == "pay_test_1"
                    && verification.razorpay_signature == "abc123"
            })
            .return_once(move |_| {
                Ok(Reconciliation {
                    order,
                    already_processed: false,
                    skipped_items: Vec::new(),
                })
            });

        let mut res = TestClient::post("http://example.com/orders/verify-payment")
            .json(&body(order_id))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let verified: VerifyPaymentResponse = res.take_json().await?;

        assert!(!verified.already_processed);
        assert_eq!(verified.order.status, "confirmed");
        assert_eq!(verified.order.payment_status, "paid");

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_bad_signature_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(PaymentsServiceError::InvalidSignature));

        let res = TestClient::post("http://example.com/orders/verify-payment")
            .json(&body(OrderUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_missing_signature_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/orders/verify-payment")
            .json(&json!({
                "orderId": OrderUuid::new().to_string(),
                "razorpayOrderId": "order_test_1",
                "razorpayPaymentId": "pay_test_1"
            }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_unknown_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(PaymentsServiceError::OrderNotFound));

        let res = TestClient::post("http://example.com/orders/verify-payment")
            .json(&body(OrderUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_failed_order_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.payments.expect_verify_payment().once().return_once(|_| {
            Err(PaymentsServiceError::OrderClosed {
                status: OrderStatus::Failed,
            })
        });

        let res = TestClient::post("http://example.com/orders/verify-payment")
            .json(&body(OrderUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
