use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::errors::ServiceError;
use shared::Amount;

use crate::repository::StoreError;

/// Typed errors raised by the reconciliation engine.
///
/// Provider adapters translate these into provider-specific numeric codes
/// inside HTTP 200 envelopes; operator-facing routes (launch, detail) render
/// them through the standardized ServiceError envelope instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Invalid or expired session token for player: {0}")]
    InvalidToken(String),

    #[error("No credentials configured for currency: {0}")]
    InvalidAgent(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFund { required: Amount, available: Amount },

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Refund transaction not found for round: {0}")]
    RefundTransactionNotFound(String),

    #[error("Wallet gateway returned status {0}")]
    Wallet(i64),

    #[error("Third-party API error: {0}")]
    ThirdPartyApi(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] shared::ValidationError),
}

impl EngineError {
    fn to_service_error(&self) -> ServiceError {
        match self {
            EngineError::PlayerNotFound(play_id) => ServiceError::player_not_found(play_id),
            EngineError::InvalidToken(play_id) => ServiceError::invalid_token(play_id),
            EngineError::InvalidAgent(currency) => ServiceError::credentials_not_found(currency),
            EngineError::InsufficientFund {
                required,
                available,
            } => ServiceError::insufficient_fund(required, available),
            EngineError::TransactionNotFound(id) => ServiceError::transaction_not_found(id),
            EngineError::RefundTransactionNotFound(round) => {
                ServiceError::transaction_not_found(round)
            }
            EngineError::Wallet(status) => ServiceError::wallet_rejected(*status),
            EngineError::ThirdPartyApi(msg) => ServiceError::provider_api_error(msg),
            EngineError::Store(e) => ServiceError::store_error(e),
            EngineError::InvalidRequest(e) => {
                ServiceError::invalid_amount("request", e.to_string())
            }
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let service_error = self.to_service_error();
        let status = StatusCode::from_u16(service_error.category.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match service_error.category.log_level() {
            "error" => tracing::error!(code = %service_error.code, "{}", service_error),
            "warn" => tracing::warn!(code = %service_error.code, "{}", service_error),
            _ => tracing::info!(code = %service_error.code, "{}", service_error),
        }
        metrics::counter!(
            "errors_total",
            "code" => service_error.code.clone()
        )
        .increment(1);

        let body = Json(json!({ "error": service_error }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
