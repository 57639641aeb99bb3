//! # Payment Error Types
//!
//! Typed error handling for the charge service.
//! All fallible operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all charge operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (bad address, unparseable values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request body could not be read or decoded into an invoice
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error producing a response body
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Returns true if the caller is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result type alias for charge operations
pub type PaymentResult<T> = Result<T, PaymentError>;
