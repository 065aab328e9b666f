//! Payments Config

use clap::Args;

use storefront_app::domain::{
    orders::models::DEFAULT_ORDER_NUMBER_PREFIX,
    payments::{models::PaymentSettings, razorpay::DEFAULT_API_BASE, signature::SigningSecret},
};

/// Razorpay credentials and checkout defaults.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Razorpay API key id
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: Option<String>,

    /// Razorpay API key secret
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: Option<String>,

    /// Razorpay webhook signing secret
    #[arg(long, env = "RAZORPAY_WEBHOOK_SECRET", hide_env_values = true)]
    pub razorpay_webhook_secret: Option<String>,

    /// Razorpay API base URL
    #[arg(long, env = "RAZORPAY_API_BASE", default_value = DEFAULT_API_BASE)]
    pub razorpay_api_base: String,

    /// ISO currency code for new orders
    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "INR")]
    pub payment_currency: String,

    /// Prefix for human-facing order numbers
    #[arg(long, env = "ORDER_NUMBER_PREFIX", default_value = DEFAULT_ORDER_NUMBER_PREFIX)]
    pub order_number_prefix: String,
}

impl PaymentsConfig {
    #[must_use]
    pub fn settings(&self) -> PaymentSettings {
        PaymentSettings {
            key_id: non_blank(self.razorpay_key_id.as_deref()).map(str::to_owned),
            key_secret: non_blank(self.razorpay_key_secret.as_deref()).map(SigningSecret::new),
            webhook_secret: non_blank(self.razorpay_webhook_secret.as_deref())
                .map(SigningSecret::new),
            currency: self.payment_currency.clone(),
            order_number_prefix: self.order_number_prefix.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
