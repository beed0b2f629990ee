//! Gateway client. The service talks to the `PaymentGateway` trait so
//! tests can substitute a mock; `RazorpayClient` is the HTTP implementation.

use async_trait::async_trait;

use crate::config::RazorpayOptions;
use crate::error::RazorpayError;
use crate::types::{CreateOrderRequest, GatewayOrder};

/// Creates gateway orders (with optional per-dealer transfers).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<GatewayOrder, RazorpayError>;
}

/// HTTP client for the Razorpay Orders API.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    options: RazorpayOptions,
}

impl RazorpayClient {
    pub fn new(options: RazorpayOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            options,
        }
    }

    /// The key secret, for signature verification at the service layer.
    pub fn key_secret(&self) -> &str {
        &self.options.key_secret
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<GatewayOrder, RazorpayError> {
        let url = format!("{}/v1/orders", self.options.api_base);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.options.key_id, Some(&self.options.key_secret))
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }
}
