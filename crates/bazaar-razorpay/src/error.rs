use thiserror::Error;

/// Errors surfaced by the gateway client.
#[derive(Debug, Error)]
pub enum RazorpayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway rejected the request ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Amount cannot be represented in minor units: {0}")]
    InvalidAmount(String),
}
