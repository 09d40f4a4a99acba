//! Pla provider adapter.
//!
//! Snake_case wire fields and split bet/gameresult callbacks like Gs5, but
//! refunds go through the wallet resettle call rather than cancel, and the
//! response envelope carries `error_code` plus the balance at top level.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{Amount, TransactionCode};

use crate::domain::{RefundRequest, SettleRequest, WagerRequest};
use crate::domain::{deserialize_amount, deserialize_opt_amount};
use crate::errors::EngineError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

use super::parse_bet_time;

pub const ERROR_OK: i32 = 0;
pub const ERROR_INTERNAL: i32 = 1;
pub const ERROR_PLAYER_NOT_FOUND: i32 = 2;
pub const ERROR_INVALID_TOKEN: i32 = 3;
pub const ERROR_INSUFFICIENT_FUND: i32 = 4;
pub const ERROR_TRANSACTION_NOT_FOUND: i32 = 5;
pub const ERROR_REFUND_NOT_FOUND: i32 = 6;
pub const ERROR_INVALID_AGENT: i32 = 7;
pub const ERROR_WALLET: i32 = 8;
pub const ERROR_INVALID_REQUEST: i32 = 9;

fn code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::PlayerNotFound(_) => ERROR_PLAYER_NOT_FOUND,
        EngineError::InvalidToken(_) => ERROR_INVALID_TOKEN,
        EngineError::InsufficientFund { .. } => ERROR_INSUFFICIENT_FUND,
        EngineError::TransactionNotFound(_) => ERROR_TRANSACTION_NOT_FOUND,
        EngineError::RefundTransactionNotFound(_) => ERROR_REFUND_NOT_FOUND,
        EngineError::InvalidAgent(_) => ERROR_INVALID_AGENT,
        EngineError::InvalidRequest(_) => ERROR_INVALID_REQUEST,
        EngineError::Wallet(_) => ERROR_WALLET,
        EngineError::ThirdPartyApi(_) | EngineError::Store(_) => ERROR_INTERNAL,
    }
}

fn reject(err: &EngineError) -> Json<Value> {
    tracing::debug!(provider = "pla", error = %err, "Callback rejected");
    Json(json!({ "error_code": code_for(err) }))
}

fn balance_ok(balance: Amount) -> Json<Value> {
    Json(json!({ "error_code": ERROR_OK, "balance": balance.to_major() }))
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub play_id: String,
    pub token: String,
}

pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthenticateRequest>,
) -> Json<Value> {
    match state.engines.pla.authenticate(&req.play_id, &req.token).await {
        Ok(player) => Json(json!({
            "error_code": ERROR_OK,
            "play_id": player.play_id,
            "username": player.username,
            "currency": player.currency,
        })),
        Err(e) => reject(&e),
    }
}

pub async fn balance(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthenticateRequest>,
) -> Json<Value> {
    match state.engines.pla.balance(&req.play_id, &req.token).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct BetRequest {
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

pub async fn bet(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BetRequest>,
) -> Json<Value> {
    let transaction_code = match TransactionCode::try_from(req.txn_id) {
        Ok(code) => code,
        Err(e) => return reject(&EngineError::from(e)),
    };

    let wager = WagerRequest {
        play_id: req.play_id,
        token: req.token,
        transaction_code,
        round_id: req.round_id,
        game_code: req.game_code,
        amount: req.amount,
        bet_time: parse_bet_time(req.bet_time.as_deref()),
    };
    match state.engines.pla.wager(wager).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct GameResultRequest {
    pub play_id: String,
    pub token: String,
    pub txn_id: String,
    pub round_id: String,
    pub game_code: String,
    /// Absent when the round was a loss.
    #[serde(default, deserialize_with = "deserialize_opt_amount")]
    pub win_amount: Option<Amount>,
    #[serde(default)]
    pub settle_time: Option<String>,
}

pub async fn gameresult(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GameResultRequest>,
) -> Json<Value> {
    let transaction_code = match TransactionCode::try_from(req.txn_id) {
        Ok(code) => code,
        Err(e) => return reject(&EngineError::from(e)),
    };

    let settle = SettleRequest {
        play_id: req.play_id,
        token: req.token,
        transaction_code,
        round_id: req.round_id,
        game_code: req.game_code,
        win_amount: req.win_amount,
        settle_time: parse_bet_time(req.settle_time.as_deref()),
    };
    match state.engines.pla.settle(settle).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct RefundCallback {
    pub play_id: String,
    pub token: String,
    pub txn_id: String,
    pub round_id: String,
}

pub async fn refund(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefundCallback>,
) -> Json<Value> {
    let transaction_code = match TransactionCode::try_from(req.txn_id) {
        Ok(code) => code,
        Err(e) => return reject(&EngineError::from(e)),
    };

    let refund = RefundRequest {
        play_id: req.play_id,
        token: req.token,
        transaction_code,
        round_id: req.round_id,
    };
    match state.engines.pla.refund(refund).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LaunchRequest {
    pub play_id: String,
    pub username: String,
    pub currency: String,
    pub game_code: String,
    #[serde(default)]
    pub lang: Option<String>,
}

pub async fn launch(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LaunchRequest>,
) -> Result<Json<Value>, EngineError> {
    let engine = &state.engines.pla;
    let (session, creds) = engine
        .register_session(&req.play_id, &req.username, &req.currency, &req.game_code)
        .await?;
    let url = state
        .provider_api
        .launch_url(
            &creds,
            &req.play_id,
            &session.token,
            &req.game_code,
            req.lang.as_deref().unwrap_or("en"),
        )
        .await?;

    metrics::counter!("launches_total", "provider" => "pla").increment(1);
    Ok(Json(json!({ "token": session.token, "url": url })))
}
