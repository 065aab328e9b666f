//! Payments service.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{error, info, instrument, warn};

use crate::domain::{
    carts::{CartsService, models::CartItem},
    catalog::CatalogService,
    orders::{
        OrdersService,
        models::{
            NewOrder, Order, OrderItem, OrderStatus, OrderUuid, PaymentTransition, PaymentUpdate,
            order_number,
        },
    },
    payments::{
        errors::PaymentsServiceError,
        models::{
            Checkout, CheckoutRequest, PaymentSettings, PaymentVerification, Reconciliation,
            WebhookEvent, WebhookOutcome,
        },
        razorpay::{PaymentGateway, ProviderOrderRequest},
        signature::{verify_payment_signature, verify_webhook_signature},
    },
    sessions::GuestSession,
    stock::StockValidator,
};

pub struct DefaultPaymentsService {
    orders: Arc<dyn OrdersService>,
    catalog: Arc<dyn CatalogService>,
    carts: Arc<dyn CartsService>,
    validator: StockValidator,
    gateway: Option<Arc<dyn PaymentGateway>>,
    settings: PaymentSettings,
}

impl std::fmt::Debug for DefaultPaymentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultPaymentsService")
            .field("settings", &self.settings)
            .field("gateway", &self.gateway.is_some())
            .finish_non_exhaustive()
    }
}

impl DefaultPaymentsService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        catalog: Arc<dyn CatalogService>,
        carts: Arc<dyn CartsService>,
        gateway: Option<Arc<dyn PaymentGateway>>,
        settings: PaymentSettings,
    ) -> Self {
        Self {
            validator: StockValidator::new(Arc::clone(&catalog)),
            orders,
            catalog,
            carts,
            gateway,
            settings,
        }
    }

    /// Undo a checkout whose payment intent could not be attached.
    async fn discard(&self, order: OrderUuid) {
        if let Err(error) = self.orders.delete_order(order).await {
            error!(%order, error = %error, "failed to discard pending order");
        }
    }

    /// Confirm a pending order, then apply its one-time side effects.
    async fn confirm(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<Reconciliation, PaymentsServiceError> {
        match self.orders.update_payment_details(order, update).await? {
            PaymentTransition::Applied(order) => Ok(self.settle(order).await),
            PaymentTransition::Unchanged(order) if order.status == OrderStatus::Confirmed => {
                info!(order = %order.uuid, "payment already reconciled");

                Ok(Reconciliation {
                    order,
                    already_processed: true,
                    skipped_items: Vec::new(),
                })
            }
            PaymentTransition::Unchanged(order) => Err(PaymentsServiceError::OrderClosed {
                status: order.status,
            }),
        }
    }

    /// Best-effort stock decrement and cart clearing after a confirmed payment.
    async fn settle(&self, mut order: Order) -> Reconciliation {
        let mut skipped_items = Vec::new();

        for item in &order.items {
            if let Err(error) = self
                .catalog
                .decrement_stock(item.sku.clone(), item.quantity)
                .await
            {
                warn!(
                    order = %order.uuid,
                    sku = %item.sku,
                    quantity = item.quantity,
                    error = %error,
                    "stock decrement failed after payment"
                );

                skipped_items.push(item.sku.clone());
            }
        }

        if !skipped_items.is_empty() {
            match self.orders.flag_inventory_reconciliation(order.uuid).await {
                Ok(flagged) => order = flagged,
                Err(error) => {
                    error!(order = %order.uuid, error = %error, "failed to flag order for inventory reconciliation");
                }
            }
        }

        if let Some(session) = order.session
            && let Err(error) = self.carts.clear_cart(session).await
        {
            warn!(order = %order.uuid, %session, error = %error, "failed to clear cart after payment");
        }

        Reconciliation {
            order,
            already_processed: false,
            skipped_items,
        }
    }
}

fn require(value: &str, field: &'static str) -> Result<(), PaymentsServiceError> {
    if value.trim().is_empty() {
        return Err(PaymentsServiceError::MissingField { field });
    }

    Ok(())
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            sku: item.sku.clone(),
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            size: item.size.clone(),
            quantity: item.quantity,
            price: item.price,
            image: item.image.clone(),
            total: item.line_total(),
        }
    }
}

#[async_trait]
impl PaymentsService for DefaultPaymentsService {
    #[instrument(skip(self, request))]
    async fn create_checkout(
        &self,
        session: Option<GuestSession>,
        request: CheckoutRequest,
    ) -> Result<Checkout, PaymentsServiceError> {
        require(&request.customer.email, "customerEmail")?;
        require(&request.customer.first_name, "customerFirstName")?;
        require(&request.customer.phone, "customerPhone")?;
        require(&request.shipping_address.street, "shippingAddress.street")?;
        require(&request.shipping_address.city, "shippingAddress.city")?;
        require(&request.shipping_address.zip_code, "shippingAddress.zipCode")?;
        require(&request.shipping_address.country, "shippingAddress.country")?;

        let (Some(gateway), Some(key_id)) = (&self.gateway, &self.settings.key_id) else {
            return Err(PaymentsServiceError::NotConfigured);
        };

        let Some(session) = session else {
            return Err(PaymentsServiceError::EmptyCart);
        };

        let cart = self.carts.get_cart(Some(session)).await?;

        if cart.is_empty() {
            return Err(PaymentsServiceError::EmptyCart);
        }

        let report = self
            .validator
            .report(cart.items.iter().map(Into::into).collect())
            .await;

        if !report.invalid_items.is_empty() {
            return Err(PaymentsServiceError::StockUnavailable(report));
        }

        let subtotal = cart.total_price();
        let total = subtotal
            .checked_add(request.tax)
            .and_then(|amount| amount.checked_add(request.shipping_cost))
            .ok_or(PaymentsServiceError::AmountOverflow)?;

        let currency = self.settings.currency.clone();

        let order = self
            .orders
            .create_order(NewOrder {
                uuid: OrderUuid::new(),
                order_number: order_number(&self.settings.order_number_prefix, Timestamp::now()),
                session: Some(session),
                customer: request.customer,
                shipping_address: request.shipping_address,
                items: cart.items.iter().map(Into::into).collect(),
                subtotal,
                tax: request.tax,
                shipping_cost: request.shipping_cost,
                total,
                currency: currency.clone(),
                payment_method: request.payment_method,
            })
            .await?;

        let notes = BTreeMap::from([
            ("orderNumber".to_string(), order.order_number.clone()),
            ("customerEmail".to_string(), order.customer.email.clone()),
            (
                "customerName".to_string(),
                format!("{} {}", order.customer.first_name, order.customer.last_name)
                    .trim()
                    .to_string(),
            ),
        ]);

        let provider_order = match gateway
            .create_order(ProviderOrderRequest {
                amount: total,
                currency: currency.clone(),
                receipt: order.uuid.to_string(),
                notes,
            })
            .await
        {
            Ok(provider_order) => provider_order,
            Err(error) => {
                error!(order = %order.uuid, error = %error, "failed to create provider order");

                self.discard(order.uuid).await;

                return Err(error.into());
            }
        };

        let order = match self
            .orders
            .update_razorpay_order_id(order.uuid, provider_order.id.clone())
            .await
        {
            Ok(order) => order,
            Err(error) => {
                self.discard(order.uuid).await;

                return Err(error.into());
            }
        };

        info!(order = %order.uuid, order_number = %order.order_number, total, "checkout created");

        Ok(Checkout {
            order,
            razorpay_order_id: provider_order.id,
            amount: total,
            currency,
            key_id: key_id.clone(),
        })
    }

    #[instrument(skip(self, verification), fields(order = %verification.order))]
    async fn verify_payment(
        &self,
        verification: PaymentVerification,
    ) -> Result<Reconciliation, PaymentsServiceError> {
        let Some(secret) = &self.settings.key_secret else {
            return Err(PaymentsServiceError::NotConfigured);
        };

        let order = self.orders.get_order(verification.order).await?;

        let signature_valid = verify_payment_signature(
            secret,
            &verification.razorpay_order_id,
            &verification.razorpay_payment_id,
            &verification.razorpay_signature,
        )
        .is_ok();

        let intent_matches =
            order.razorpay_order_id.as_deref() == Some(verification.razorpay_order_id.as_str());

        if !(signature_valid && intent_matches) {
            warn!(signature_valid, intent_matches, "payment verification failed");

            self.orders
                .update_payment_details(
                    order.uuid,
                    PaymentUpdate::failed(
                        Some(verification.razorpay_payment_id),
                        Some(verification.razorpay_signature),
                    ),
                )
                .await?;

            return Err(PaymentsServiceError::InvalidSignature);
        }

        self.confirm(
            order.uuid,
            PaymentUpdate::paid(
                verification.razorpay_payment_id,
                Some(verification.razorpay_signature),
                Timestamp::now(),
            ),
        )
        .await
    }

    #[instrument(skip_all)]
    async fn process_webhook(
        &self,
        body: Vec<u8>,
        signature: String,
    ) -> Result<WebhookOutcome, PaymentsServiceError> {
        let Some(secret) = &self.settings.webhook_secret else {
            return Err(PaymentsServiceError::NotConfigured);
        };

        verify_webhook_signature(secret, &body, &signature)
            .map_err(|_| PaymentsServiceError::InvalidSignature)?;

        let event: WebhookEvent =
            serde_json::from_slice(&body).map_err(PaymentsServiceError::InvalidPayload)?;

        let confirming = matches!(event.event.as_str(), "payment.captured" | "order.paid");

        if !confirming && event.event != "payment.failed" {
            return Ok(WebhookOutcome::Ignored { event: event.event });
        }

        let provider_order_id = event
            .provider_order_id()
            .ok_or(PaymentsServiceError::MissingEventField { field: "order_id" })?;

        let payment_id = event
            .payment_id()
            .ok_or(PaymentsServiceError::MissingEventField { field: "payment.id" })?
            .to_string();

        let order = self
            .orders
            .find_by_razorpay_order_id(provider_order_id.to_string())
            .await?;

        if !confirming {
            warn!(order = %order.uuid, %payment_id, status = %order.status, "payment attempt failed");

            return Ok(WebhookOutcome::AttemptFailed { order, payment_id });
        }

        match self
            .confirm(
                order.uuid,
                PaymentUpdate::paid(payment_id, None, Timestamp::now()),
            )
            .await
        {
            Ok(reconciliation) => Ok(WebhookOutcome::Confirmed(reconciliation)),
            Err(PaymentsServiceError::OrderClosed { status }) => {
                warn!(order = %order.uuid, %status, event = %event.event, "payment captured for a closed order");

                Ok(WebhookOutcome::Ignored { event: event.event })
            }
            Err(error) => Err(error),
        }
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Turn the session's cart into a pending order with a provider payment intent.
    async fn create_checkout(
        &self,
        session: Option<GuestSession>,
        request: CheckoutRequest,
    ) -> Result<Checkout, PaymentsServiceError>;

    /// Verify a signed checkout callback and finalize the order.
    async fn verify_payment(
        &self,
        verification: PaymentVerification,
    ) -> Result<Reconciliation, PaymentsServiceError>;

    /// Verify and apply a provider webhook delivery.
    async fn process_webhook(
        &self,
        body: Vec<u8>,
        signature: String,
    ) -> Result<WebhookOutcome, PaymentsServiceError>;
}
