//! Core types for the bazaar marketplace backend.
//!
//! This crate carries everything the service and its adapters share:
//! domain models, the dealer plan/commission table, the error taxonomy,
//! the document-store [`db::Adapter`] abstraction, service options, and
//! environment/logging bootstrap. It deliberately contains no HTTP or
//! database-driver code.

pub mod db;
pub mod env;
pub mod error;
pub mod options;
pub mod plan;

pub use error::{ApiError, CommerceError, ErrorCode, HttpStatus, Result};
