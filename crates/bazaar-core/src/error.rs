// Error taxonomy shared by every route handler: an ErrorCode names what
// went wrong, HttpStatus says how it maps onto the wire, and ApiError
// carries both plus a human-readable message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// All error codes emitted by the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingRequiredFields,
    MissingDealerFields,
    AccountNumberMismatch,
    UserAlreadyExists,
    UserNotFound,
    InvalidEmailOrPassword,
    InvalidToken,
    Unauthorized,
    ProductNotFound,
    OrderNotFound,
    AddressNotFound,
    CartEmpty,
    InvalidQuantity,
    InsufficientStock,
    InvalidDeliveryStatus,
    OrderNotDelivered,
    ReturnWindowExpired,
    SignatureMismatch,
    PaymentGatewayFailure,
    GoogleVerificationFailed,
    InternalServerError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingRequiredFields => "Missing required fields",
            Self::MissingDealerFields => "Missing required dealer fields",
            Self::AccountNumberMismatch => {
                "Account number and re-entered account number do not match"
            }
            Self::UserAlreadyExists => "User already exists",
            Self::UserNotFound => "User not found",
            Self::InvalidEmailOrPassword => "Invalid email or password",
            Self::InvalidToken => "Invalid or expired token",
            Self::Unauthorized => "Authentication required",
            Self::ProductNotFound => "Product not found",
            Self::OrderNotFound => "Order not found",
            Self::AddressNotFound => "Address not found",
            Self::CartEmpty => "Cart is empty",
            Self::InvalidQuantity => "Quantity must be a positive integer",
            Self::InsufficientStock => "Insufficient stock",
            Self::InvalidDeliveryStatus => "Invalid delivery status",
            Self::OrderNotDelivered => "Order has not been delivered yet",
            Self::ReturnWindowExpired => "Return period has expired (7 days limit)",
            Self::SignatureMismatch => "Payment signature verification failed",
            Self::PaymentGatewayFailure => "Payment gateway order creation failed",
            Self::GoogleVerificationFailed => "Google token verification failed",
            Self::InternalServerError => "Internal server error",
        };
        write!(f, "{msg}")
    }
}

/// HTTP status codes used by the API error system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpStatus {
    Ok = 200,
    Created = 201,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    UnprocessableEntity = 422,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn status_code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// API error carrying an HTTP status, an error code, and a message.
///
/// The message defaults to the code's display text; handlers that know
/// more (e.g. which product is out of stock) attach a specific message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status} {code}: {message}")]
pub struct ApiError {
    pub status: HttpStatus,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: HttpStatus, code: ErrorCode) -> Self {
        Self {
            message: code.to_string(),
            status,
            code,
        }
    }

    pub fn with_message(status: HttpStatus, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: ErrorCode) -> Self {
        Self::new(HttpStatus::BadRequest, code)
    }

    pub fn unauthorized(code: ErrorCode) -> Self {
        Self::new(HttpStatus::Unauthorized, code)
    }

    pub fn not_found(code: ErrorCode) -> Self {
        Self::new(HttpStatus::NotFound, code)
    }

    pub fn conflict(code: ErrorCode) -> Self {
        Self::new(HttpStatus::UnprocessableEntity, code)
    }

    pub fn internal(code: ErrorCode) -> Self {
        Self::new(HttpStatus::InternalServerError, code)
    }

    /// Build the JSON body for the error response.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.message,
        })
    }
}

/// Internal (non-HTTP) error for configuration, store, and crypto failures.
#[derive(Debug, thiserror::Error)]
pub enum CommerceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl CommerceError {
    /// Collapse into the API error presented to the client. Internal
    /// details stay out of the response body.
    pub fn into_api_error(self) -> ApiError {
        match self {
            CommerceError::Api(e) => e,
            CommerceError::Gateway(_) => ApiError::internal(ErrorCode::PaymentGatewayFailure),
            _ => ApiError::internal(ErrorCode::InternalServerError),
        }
    }
}

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self {
        e.into_api_error()
    }
}

/// Unified result type for bazaar operations.
pub type Result<T> = std::result::Result<T, CommerceError>;
