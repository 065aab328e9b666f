//! Razorpay Orders API client.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::payments::signature::SigningSecret;

/// Default Razorpay API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

/// Configuration for connecting to Razorpay.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Public key id, also handed to the browser checkout.
    pub key_id: String,

    /// Key secret used for basic auth and callback signatures.
    pub key_secret: SigningSecret,

    /// API base URL, e.g. `"https://api.razorpay.com"`.
    pub api_base: String,
}

/// Payment intent to mint with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderOrderRequest {
    /// Amount in minor currency units.
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

/// Payment intent as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

/// Mints payment intents with an external provider.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        request: ProviderOrderRequest,
    ) -> Result<ProviderOrder, RazorpayError>;
}

/// HTTP client for the Razorpay Orders API.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    config: RazorpayConfig,
    http: Client,
}

impl RazorpayClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        request: ProviderOrderRequest,
    ) -> Result<ProviderOrder, RazorpayError> {
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose()))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(RazorpayError::UnexpectedResponse(format!(
                "order request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

/// Errors that can occur when communicating with Razorpay.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Razorpay returned a non-2xx response.
    #[error("unexpected response from Razorpay: {0}")]
    UnexpectedResponse(String),
}
