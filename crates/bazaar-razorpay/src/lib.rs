//! Razorpay integration for bazaar.
//!
//! Three concerns live here: credentials ([`config::RazorpayOptions`]),
//! the orders/transfers API ([`client::PaymentGateway`] and its HTTP
//! implementation), and stateless payment-signature verification
//! ([`signature`]).

pub mod client;
pub mod config;
pub mod error;
pub mod signature;
pub mod types;

pub use client::{PaymentGateway, RazorpayClient};
pub use config::RazorpayOptions;
pub use error::RazorpayError;
pub use types::{minor_units, CreateOrderRequest, GatewayOrder, TransferSpec};
