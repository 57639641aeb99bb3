//! # pay-core
//!
//! Core types and traits for the payment charge service.
//!
//! This crate provides:
//! - `Invoice` and the opaque `Currency` placeholder
//! - `OutcomeGenerator` trait deciding whether a charge succeeds
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use pay_core::{CoinFlip, Invoice};
//!
//! let mut invoice = Invoice::from_json(br#"{"currency":{},"customer_id":1,"value":301.99}"#)?;
//! invoice.settle(&CoinFlip);
//!
//! let body = invoice.to_json()?;
//! # Ok::<(), pay_core::PaymentError>(())
//! ```

pub mod error;
pub mod invoice;
pub mod outcome;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use invoice::{Currency, Invoice};
pub use outcome::{
    outcome_generator, BoxedOutcomeGenerator, CoinFlip, OutcomeGenerator, SeededCoinFlip,
};
