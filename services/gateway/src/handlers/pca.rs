//! Pca provider adapter.
//!
//! Pca batches debits and credits: `multi_withdraw` and `multi_deposit`
//! each carry up to [`shared::MAX_BATCH_ITEMS`] items, every item with its
//! own player and token. Items are processed independently and each gets
//! its own result code; one bad item never aborts its siblings, and the
//! HTTP response stays 200. Pca also owns its session lifecycle through
//! explicit login/logout callbacks.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{Amount, TransactionCode, MAX_BATCH_ITEMS};

use crate::domain::{deserialize_amount, deserialize_opt_amount, SettleRequest, WagerRequest};
use crate::errors::EngineError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

use super::parse_bet_time;

pub const CODE_OK: i32 = 0;
pub const CODE_PLAYER_NOT_FOUND: i32 = 1;
pub const CODE_INVALID_TOKEN: i32 = 2;
pub const CODE_INSUFFICIENT_FUND: i32 = 3;
pub const CODE_TRANSACTION_NOT_FOUND: i32 = 4;
pub const CODE_REFUND_NOT_FOUND: i32 = 5;
pub const CODE_INVALID_AGENT: i32 = 6;
pub const CODE_WALLET_ERROR: i32 = 7;
pub const CODE_OTHER: i32 = 8;
pub const CODE_MALFORMED_BATCH: i32 = 9;

fn code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::PlayerNotFound(_) => CODE_PLAYER_NOT_FOUND,
        EngineError::InvalidToken(_) => CODE_INVALID_TOKEN,
        EngineError::InsufficientFund { .. } => CODE_INSUFFICIENT_FUND,
        EngineError::TransactionNotFound(_) => CODE_TRANSACTION_NOT_FOUND,
        EngineError::RefundTransactionNotFound(_) => CODE_REFUND_NOT_FOUND,
        EngineError::InvalidAgent(_) => CODE_INVALID_AGENT,
        EngineError::Wallet(_) => CODE_WALLET_ERROR,
        EngineError::InvalidRequest(_)
        | EngineError::ThirdPartyApi(_)
        | EngineError::Store(_) => CODE_OTHER,
    }
}

fn reject(err: &EngineError) -> Json<Value> {
    tracing::debug!(provider = "pca", error = %err, "Callback rejected");
    Json(json!({ "code": code_for(err) }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub play_id: String,
    pub username: String,
    pub currency: String,
    pub game_code: String,
}

/// Pca drives the session from its side: login issues the token the later
/// batch callbacks must present.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Json<Value> {
    match state
        .engines
        .pca
        .register_session(&req.play_id, &req.username, &req.currency, &req.game_code)
        .await
    {
        Ok((session, _creds)) => Json(json!({ "code": CODE_OK, "token": session.token })),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub play_id: String,
    pub token: String,
}

pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> Json<Value> {
    match state.engines.pca.logout(&req.play_id, &req.token).await {
        Ok(()) => Json(json!({ "code": CODE_OK })),
        Err(e) => reject(&e),
    }
}

pub async fn balance(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> Json<Value> {
    match state.engines.pca.balance(&req.play_id, &req.token).await {
        Ok(balance) => Json(json!({ "code": CODE_OK, "balance": balance.to_major() })),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct WithdrawItem {
    pub play_id: String,
    pub token: String,
    pub txn_id: String,
    pub round_id: String,
    pub game_code: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Amount,
    #[serde(default)]
    pub bet_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MultiWithdrawRequest {
    pub items: Vec<WithdrawItem>,
}

#[derive(Debug, Deserialize)]
pub struct DepositItem {
    pub play_id: String,
    pub token: String,
    pub txn_id: String,
    pub round_id: String,
    pub game_code: String,
    #[serde(default, deserialize_with = "deserialize_opt_amount")]
    pub win_amount: Option<Amount>,
    #[serde(default)]
    pub settle_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MultiDepositRequest {
    pub items: Vec<DepositItem>,
}

fn item_result(txn_id: &str, outcome: Result<Amount, EngineError>) -> Value {
    match outcome {
        Ok(balance) => json!({
            "txn_id": txn_id,
            "code": CODE_OK,
            "balance": balance.to_major(),
        }),
        Err(e) => {
            tracing::debug!(provider = "pca", txn_id, error = %e, "Batch item rejected");
            json!({ "txn_id": txn_id, "code": code_for(&e) })
        }
    }
}

pub async fn multi_withdraw(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MultiWithdrawRequest>,
) -> Json<Value> {
    if req.items.len() > MAX_BATCH_ITEMS {
        tracing::warn!(
            provider = "pca",
            items = req.items.len(),
            "Oversized withdraw batch rejected"
        );
        return Json(json!({ "code": CODE_MALFORMED_BATCH }));
    }

    let mut results = Vec::with_capacity(req.items.len());
    for item in req.items {
        let txn_id = item.txn_id.clone();
        let outcome = match TransactionCode::try_from(item.txn_id) {
            Ok(transaction_code) => {
                state
                    .engines
                    .pca
                    .wager(WagerRequest {
                        play_id: item.play_id,
                        token: item.token,
                        transaction_code,
                        round_id: item.round_id,
                        game_code: item.game_code,
                        amount: item.amount,
                        bet_time: parse_bet_time(item.bet_time.as_deref()),
                    })
                    .await
            }
            Err(e) => Err(EngineError::from(e)),
        };
        results.push(item_result(&txn_id, outcome));
    }

    Json(json!({ "code": CODE_OK, "results": results }))
}

pub async fn multi_deposit(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MultiDepositRequest>,
) -> Json<Value> {
    if req.items.len() > MAX_BATCH_ITEMS {
        tracing::warn!(
            provider = "pca",
            items = req.items.len(),
            "Oversized deposit batch rejected"
        );
        return Json(json!({ "code": CODE_MALFORMED_BATCH }));
    }

    let mut results = Vec::with_capacity(req.items.len());
    for item in req.items {
        let txn_id = item.txn_id.clone();
        let outcome = match TransactionCode::try_from(item.txn_id) {
            Ok(transaction_code) => {
                state
                    .engines
                    .pca
                    .settle(SettleRequest {
                        play_id: item.play_id,
                        token: item.token,
                        transaction_code,
                        round_id: item.round_id,
                        game_code: item.game_code,
                        win_amount: item.win_amount,
                        settle_time: parse_bet_time(item.settle_time.as_deref()),
                    })
                    .await
            }
            Err(e) => Err(EngineError::from(e)),
        };
        results.push(item_result(&txn_id, outcome));
    }

    Json(json!({ "code": CODE_OK, "results": results }))
}
