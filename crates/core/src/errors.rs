//! Core error types for the Familyfolio engine.
//!
//! The engine itself performs no I/O, so every error here is either a
//! validation failure raised before a computation starts or a failure
//! surfaced by one of the external providers.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine and its services.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider operation failed: {0}")]
    Provider(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Validation errors for holdings, thresholds and cash amounts.
///
/// Invalid input is always rejected, never clamped.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fund '{fund_id}' has a negative current value: {value}")]
    NegativeValue { fund_id: String, value: Decimal },

    #[error("Fund '{fund_id}' has a target percent outside 0-100: {target}")]
    TargetOutOfRange { fund_id: String, target: Decimal },

    #[error("Rebalance threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(Decimal),

    #[error("Cash amount must not be negative, got {0}")]
    NegativeCashAmount(Decimal),

    #[error("Fund '{0}' appears more than once in the holdings")]
    DuplicateFund(String),

    #[error("{name} exceeds the supported maximum of {max}: {value}")]
    AmountTooLarge {
        name: String,
        value: Decimal,
        max: Decimal,
    },

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),
}
