/// Type-safe wrappers for domain primitives
///
/// These types prevent common errors by enforcing validation at construction
/// time and providing checked arithmetic operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Amount out of range: {minor} minor units (min: {min}, max: {max})")]
    AmountOutOfRange { minor: i64, min: i64, max: i64 },

    #[error("Amount overflow in operation")]
    AmountOverflow,

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(f64),

    #[error("Transaction code too long: {length} chars (max {max})")]
    TransactionCodeTooLong { length: usize, max: usize },

    #[error("Transaction code must not be empty")]
    EmptyTransactionCode,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Monetary amount in minor units (cents) with overflow protection
///
/// Providers speak decimal majors on the wire; the engine and the stores only
/// ever see minor units, which keeps arithmetic exact and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Create a new Amount with range validation
    pub fn new(minor: i64) -> Result<Self, ValidationError> {
        if !(0..=MAX_AMOUNT_MINOR).contains(&minor) {
            return Err(ValidationError::AmountOutOfRange {
                minor,
                min: 0,
                max: MAX_AMOUNT_MINOR,
            });
        }
        Ok(Self(minor))
    }

    /// Create without validation (for internal use)
    pub fn new_unchecked(minor: i64) -> Self {
        Self(minor)
    }

    /// Parse a decimal major-unit value as it appears on provider wires.
    ///
    /// Rounds to the nearest minor unit so that `9.99` and `9.990000001`
    /// land on the same posting amount.
    pub fn from_major(major: f64) -> Result<Self, ValidationError> {
        if !major.is_finite() || major < 0.0 {
            return Err(ValidationError::NegativeAmount(major));
        }
        let minor = (major * 100.0).round() as i64;
        Self::new(minor)
    }

    /// Raw minor-unit value
    pub fn as_minor(&self) -> i64 {
        self.0
    }

    /// Decimal major-unit value for response envelopes
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Result<Self, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Self::new_unchecked)
            .ok_or(ValidationError::AmountOverflow)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Amount) -> Result<Self, ValidationError> {
        self.0
            .checked_sub(other.0)
            .map(Self::new_unchecked)
            .ok_or(ValidationError::AmountOverflow)
    }
}

impl TryFrom<i64> for Amount {
    type Error = ValidationError;

    fn try_from(minor: i64) -> Result<Self, Self::Error> {
        Self::new(minor)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.to_major())
    }
}

/// Provider-supplied transaction code, validated before it becomes part of
/// an external id or a store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionCode(String);

impl TransactionCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for TransactionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTransactionCode);
        }
        if trimmed.len() > MAX_TRANSACTION_CODE_LENGTH {
            return Err(ValidationError::TransactionCodeTooLong {
                length: trimmed.len(),
                max: MAX_TRANSACTION_CODE_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<&str> for TransactionCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl std::fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
