/// Shared error types for the wallet integration gateway
///
/// Design Philosophy:
/// - Standardized error codes for consistent error handling across adapters
/// - Categorized by error domain (Validation, Network, Wallet, Internal)
/// - Implements both Display and std::error::Error for compatibility
/// - Includes context fields for debugging (error_code, message, context)
///
/// Usage:
/// - The gateway wraps its specific errors in ServiceError at the HTTP edge
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
/// - Context field used for additional debugging information
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories that map to HTTP status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Validation errors (400 Bad Request)
    /// Caller provided invalid input
    Validation,

    /// Network errors (502/503 Bad Gateway/Service Unavailable)
    /// External service is unavailable or timing out
    Network,

    /// Wallet ledger errors
    /// The gateway answered with a non-success status code
    Wallet,

    /// Internal service errors (500 Internal Server Error)
    /// Unexpected failures, store issues, programming errors
    Internal,

    /// Resource not found (404 Not Found)
    NotFound,

    /// Authorization/Authentication errors (401/403)
    Unauthorized,
}

impl ErrorCategory {
    /// Map error category to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Network => 503,
            ErrorCategory::Wallet => 502,
            ErrorCategory::Internal => 500,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Unauthorized => 401,
        }
    }

    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::Network => "error",
            ErrorCategory::Wallet => "warn",
            ErrorCategory::Internal => "error",
            ErrorCategory::NotFound => "info",
            ErrorCategory::Unauthorized => "warn",
        }
    }
}

/// Standard error codes used across the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_AMOUNT: ErrorCode = ErrorCode("VALIDATION_INVALID_AMOUNT");
    pub const VALIDATION_INVALID_TRANSACTION_CODE: ErrorCode =
        ErrorCode("VALIDATION_INVALID_TRANSACTION_CODE");
    pub const VALIDATION_MISSING_FIELD: ErrorCode = ErrorCode("VALIDATION_MISSING_FIELD");
    pub const VALIDATION_INVALID_INPUT: ErrorCode = ErrorCode("VALIDATION_INVALID_INPUT");
    pub const VALIDATION_INSUFFICIENT_FUND: ErrorCode = ErrorCode("VALIDATION_INSUFFICIENT_FUND");
    pub const VALIDATION_BATCH_TOO_LARGE: ErrorCode = ErrorCode("VALIDATION_BATCH_TOO_LARGE");

    // Network errors
    pub const NETWORK_WALLET_UNAVAILABLE: ErrorCode = ErrorCode("NETWORK_WALLET_UNAVAILABLE");
    pub const NETWORK_PROVIDER_API: ErrorCode = ErrorCode("NETWORK_PROVIDER_API");
    pub const NETWORK_REDIS_CONNECTION: ErrorCode = ErrorCode("NETWORK_REDIS_CONNECTION");

    // Wallet ledger errors
    pub const WALLET_REJECTED: ErrorCode = ErrorCode("WALLET_REJECTED");

    // Internal errors
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");
    pub const INTERNAL_SERIALIZATION: ErrorCode = ErrorCode("INTERNAL_SERIALIZATION");
    pub const INTERNAL_STORE: ErrorCode = ErrorCode("INTERNAL_STORE");
    pub const INTERNAL_CONFIGURATION: ErrorCode = ErrorCode("INTERNAL_CONFIGURATION");

    // Resource errors
    pub const NOT_FOUND_PLAYER: ErrorCode = ErrorCode("NOT_FOUND_PLAYER");
    pub const NOT_FOUND_TRANSACTION: ErrorCode = ErrorCode("NOT_FOUND_TRANSACTION");
    pub const NOT_FOUND_CREDENTIALS: ErrorCode = ErrorCode("NOT_FOUND_CREDENTIALS");

    // Authorization errors
    pub const UNAUTHORIZED_INVALID_TOKEN: ErrorCode = ErrorCode("UNAUTHORIZED_INVALID_TOKEN");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure used at the gateway's HTTP edge
///
/// This provides consistent error reporting with:
/// - Structured error codes for programmatic handling
/// - Human-readable messages
/// - Optional context for debugging
/// - Category-based classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context (e.g., field names, ids)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    /// Create a new ServiceError
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Validation error constructors
    pub fn invalid_amount(amount: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_AMOUNT,
            format!("Invalid amount: {}", amount),
        )
        .with_context(reason)
    }

    pub fn insufficient_fund(required: impl fmt::Display, available: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INSUFFICIENT_FUND,
            "Insufficient funds",
        )
        .with_context(format!("required: {}, available: {}", required, available))
    }

    // Network error constructors
    pub fn wallet_unavailable(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_WALLET_UNAVAILABLE,
            "Wallet gateway unavailable",
        )
        .with_context(error.to_string())
    }

    pub fn provider_api_error(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_PROVIDER_API,
            "Provider API request failed",
        )
        .with_context(error.to_string())
    }

    pub fn redis_error(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_REDIS_CONNECTION,
            "Redis connection error",
        )
        .with_context(error.to_string())
    }

    // Wallet ledger error constructors
    pub fn wallet_rejected(status: i64) -> Self {
        Self::new(
            ErrorCategory::Wallet,
            ErrorCode::WALLET_REJECTED,
            "Wallet gateway rejected the operation",
        )
        .with_context(format!("status: {}", status))
    }

    // Resource not found constructors
    pub fn player_not_found(play_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_PLAYER,
            format!("Player not found: {}", play_id),
        )
    }

    pub fn transaction_not_found(external_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_TRANSACTION,
            format!("Transaction not found: {}", external_id),
        )
    }

    pub fn credentials_not_found(currency: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_CREDENTIALS,
            format!("No credentials configured for currency: {}", currency),
        )
    }

    // Authorization error constructors
    pub fn invalid_token(play_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Unauthorized,
            ErrorCode::UNAUTHORIZED_INVALID_TOKEN,
            format!("Invalid or expired session token for player: {}", play_id),
        )
    }

    // Internal error constructors
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_UNEXPECTED,
            message,
        )
    }

    pub fn store_error(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_STORE,
            "Store operation failed",
        )
        .with_context(error.to_string())
    }

    pub fn serialization_error(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_SERIALIZATION,
            "Serialization error",
        )
        .with_context(error.to_string())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

// Convenience type alias
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_status_codes() {
        assert_eq!(ErrorCategory::Validation.status_code(), 400);
        assert_eq!(ErrorCategory::Network.status_code(), 503);
        assert_eq!(ErrorCategory::NotFound.status_code(), 404);
        assert_eq!(ErrorCategory::Unauthorized.status_code(), 401);
        assert_eq!(ErrorCategory::Internal.status_code(), 500);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(
            ErrorCode::NOT_FOUND_PLAYER.to_string(),
            "NOT_FOUND_PLAYER"
        );
    }

    #[test]
    fn test_service_error_creation() {
        let error = ServiceError::player_not_found("alice01");
        assert_eq!(error.category, ErrorCategory::NotFound);
        assert_eq!(error.code, "NOT_FOUND_PLAYER");
        assert!(error.message.contains("alice01"));
    }

    #[test]
    fn test_service_error_with_context() {
        let error = ServiceError::insufficient_fund("100.00", "42.50");
        assert!(error.context.is_some());
        assert!(error.to_string().contains("available: 42.50"));
    }

    #[test]
    fn test_error_serialization() {
        let error = ServiceError::transaction_not_found("wager-abc");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NOT_FOUND_TRANSACTION"));
        assert!(json.contains("wager-abc"));
    }
}
