//! Payment Webhook Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use storefront_app::domain::payments::models::WebhookOutcome;

use crate::{
    extensions::*, observability::record_reconciliation_failures,
    payments::errors::into_status_error, state::State,
};

const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebhookResponse {
    /// `confirmed`, `attempt_failed` or `ignored`
    pub outcome: String,

    pub order_id: Option<String>,
}

/// Payment Webhook Handler
///
/// Server-to-server notification from the provider. The raw body must carry a
/// valid HMAC signature in `X-Razorpay-Signature`.
#[endpoint(
    tags("payments"),
    summary = "Payment Provider Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event applied or ignored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad signature or payload"),
        (status_code = StatusCode::NOT_FOUND, description = "No order for the provider order id"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let signature = req
        .header::<String>(SIGNATURE_HEADER)
        .filter(|signature| !signature.trim().is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("Missing webhook signature"))?;

    let body = req
        .payload()
        .await
        .or_400("Could not read webhook body")?
        .to_vec();

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = state
        .app
        .payments
        .process_webhook(body, signature)
        .await
        .map_err(into_status_error)?;

    let response = match outcome {
        WebhookOutcome::Confirmed(reconciliation) => {
            if !reconciliation.skipped_items.is_empty() {
                warn!(
                    order = %reconciliation.order.uuid,
                    skipped = ?reconciliation.skipped_items,
                    "order confirmed with stock left to reconcile"
                );

                record_reconciliation_failures(reconciliation.skipped_items.len());
            }

            WebhookResponse {
                outcome: "confirmed".to_string(),
                order_id: Some(reconciliation.order.uuid.to_string()),
            }
        }
        WebhookOutcome::AttemptFailed { order, .. } => WebhookResponse {
            outcome: "attempt_failed".to_string(),
            order_id: Some(order.uuid.to_string()),
        },
        WebhookOutcome::Ignored { event } => {
            info!(event = %event, "webhook event ignored");

            WebhookResponse {
                outcome: "ignored".to_string(),
                order_id: None,
            }
        }
    };

    Ok(Json(response))
}
