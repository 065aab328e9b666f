//! Order Requests & Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::{non_blank, required};

use storefront_app::domain::{
    orders::models::{CustomerContact, Order, OrderItem, ShippingAddress},
    payments::models::{Checkout, CheckoutRequest},
};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            first_name: address.first_name,
            last_name: address.last_name,
            email: address.email,
            phone: address.phone,
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
        }
    }
}

/// Checkout body. Line items are taken from the session's cart.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub customer_email: Option<String>,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address: Option<ShippingAddressBody>,

    /// Tax in minor currency units
    pub tax: u64,

    /// Shipping cost in minor currency units
    pub shipping_cost: u64,

    pub payment_method: Option<String>,
}

impl TryFrom<ShippingAddressBody> for ShippingAddress {
    type Error = String;

    fn try_from(body: ShippingAddressBody) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: body.first_name.trim().to_owned(),
            last_name: body.last_name.trim().to_owned(),
            email: body.email.trim().to_owned(),
            phone: body.phone.trim().to_owned(),
            street: non_blank(body.street, "shippingAddress.street")?,
            city: non_blank(body.city, "shippingAddress.city")?,
            state: body.state.trim().to_owned(),
            zip_code: non_blank(body.zip_code, "shippingAddress.zipCode")?,
            country: non_blank(body.country, "shippingAddress.country")?,
        })
    }
}

impl TryFrom<CreateOrderRequest> for CheckoutRequest {
    type Error = String;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        let customer = CustomerContact {
            email: required(request.customer_email, "customerEmail")?,
            first_name: required(request.customer_first_name, "customerFirstName")?,
            last_name: request
                .customer_last_name
                .map(|name| name.trim().to_owned())
                .unwrap_or_default(),
            phone: required(request.customer_phone, "customerPhone")?,
        };

        let shipping_address = request
            .shipping_address
            .ok_or_else(|| "shippingAddress is required".to_string())?
            .try_into()?;

        Ok(Self {
            customer,
            shipping_address,
            tax: request.tax,
            shipping_cost: request.shipping_cost,
            payment_method: request.payment_method,
        })
    }
}

/// Everything the browser needs to open the provider's checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub razorpay_order_id: String,

    /// Amount to charge in minor currency units
    pub amount: u64,

    pub currency: String,

    /// Public provider key id
    pub key_id: String,
}

impl From<Checkout> for CreateOrderResponse {
    fn from(checkout: Checkout) -> Self {
        Self {
            order_id: checkout.order.uuid.into_uuid(),
            order_number: checkout.order.order_number,
            razorpay_order_id: checkout.razorpay_order_id,
            amount: checkout.amount,
            currency: checkout.currency,
            key_id: checkout.key_id,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct VerifyPaymentRequest {
    pub order_id: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyPaymentResponse {
    pub order: OrderResponse,

    /// The order had already been finalized by an earlier call
    pub already_processed: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub sku: String,
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub quantity: u32,

    /// Unit price at checkout
    pub price: u64,

    pub image: Option<String>,
    pub total: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            sku: item.sku,
            product_id: item.product_id,
            product_name: item.product_name,
            size: item.size,
            quantity: item.quantity,
            price: item.price,
            image: item.image,
            total: item.total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub order_id: Uuid,
    pub order_number: String,

    /// `pending`, `confirmed` or `failed`
    pub status: String,

    /// `pending`, `paid` or `failed`
    pub payment_status: String,

    pub customer: CustomerResponse,
    pub shipping_address: ShippingAddressBody,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub currency: String,
    pub payment_method: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub placed_as_guest: bool,

    /// Some stock decrements did not apply after payment
    pub inventory_reconciliation_pending: bool,

    pub paid_at: Option<String>,
    pub confirmed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.uuid.into_uuid(),
            order_number: order.order_number,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            customer: CustomerResponse {
                email: order.customer.email,
                first_name: order.customer.first_name,
                last_name: order.customer.last_name,
                phone: order.customer.phone,
            },
            shipping_address: order.shipping_address.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping_cost: order.shipping_cost,
            total: order.total,
            currency: order.currency,
            payment_method: order.payment_method,
            razorpay_order_id: order.razorpay_order_id,
            razorpay_payment_id: order.razorpay_payment_id,
            placed_as_guest: order.placed_as_guest,
            inventory_reconciliation_pending: order.inventory_reconciliation_pending,
            paid_at: order.paid_at.map(|at| at.to_string()),
            confirmed_at: order.confirmed_at.map(|at| at.to_string()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
