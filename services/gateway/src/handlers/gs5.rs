//! Gs5 provider adapter.
//!
//! CamelCase wire fields, split wager/result callbacks, refunds through the
//! wallet `cancel` call. Business outcomes are numeric status codes in
//! HTTP 200 envelopes; the wire-level status never signals them.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{Amount, TransactionCode};

use crate::domain::{
    deserialize_amount, deserialize_opt_amount, RefundRequest, SettleRequest, Transaction,
    WagerRequest,
};
use crate::errors::EngineError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

use super::parse_bet_time;

pub const STATUS_OK: i32 = 0;
pub const STATUS_PLAYER_NOT_FOUND: i32 = 1;
pub const STATUS_INVALID_TOKEN: i32 = 2;
pub const STATUS_INSUFFICIENT_FUND: i32 = 3;
pub const STATUS_TRANSACTION_NOT_FOUND: i32 = 4;
pub const STATUS_REFUND_NOT_FOUND: i32 = 5;
pub const STATUS_INVALID_AGENT: i32 = 6;
pub const STATUS_INVALID_REQUEST: i32 = 7;
pub const STATUS_API_ERROR: i32 = 8;
pub const STATUS_WALLET_ERROR: i32 = 9;

fn code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::PlayerNotFound(_) => STATUS_PLAYER_NOT_FOUND,
        EngineError::InvalidToken(_) => STATUS_INVALID_TOKEN,
        EngineError::InsufficientFund { .. } => STATUS_INSUFFICIENT_FUND,
        EngineError::TransactionNotFound(_) => STATUS_TRANSACTION_NOT_FOUND,
        EngineError::RefundTransactionNotFound(_) => STATUS_REFUND_NOT_FOUND,
        EngineError::InvalidAgent(_) => STATUS_INVALID_AGENT,
        EngineError::InvalidRequest(_) => STATUS_INVALID_REQUEST,
        EngineError::Wallet(_) => STATUS_WALLET_ERROR,
        EngineError::ThirdPartyApi(_) | EngineError::Store(_) => STATUS_API_ERROR,
    }
}

fn reject(err: &EngineError) -> Json<Value> {
    tracing::debug!(provider = "gs5", error = %err, "Callback rejected");
    Json(json!({ "status": code_for(err) }))
}

fn balance_ok(balance: Amount) -> Json<Value> {
    Json(json!({ "status": STATUS_OK, "balance": balance.to_major() }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub player_id: String,
    pub token: String,
}

pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthenticateRequest>,
) -> Json<Value> {
    match state
        .engines
        .gs5
        .authenticate(&req.player_id, &req.token)
        .await
    {
        Ok(player) => Json(json!({ "status": STATUS_OK, "currency": player.currency })),
        Err(e) => reject(&e),
    }
}

pub async fn balance(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthenticateRequest>,
) -> Json<Value> {
    match state.engines.gs5.balance(&req.player_id, &req.token).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    pub player_id: String,
    pub token: String,
    pub transaction_code: String,
    pub game_round: String,
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
    let transaction_code = match TransactionCode::try_from(req.transaction_code) {
        Ok(code) => code,
        Err(e) => return reject(&EngineError::from(e)),
    };

    let wager = WagerRequest {
        play_id: req.player_id,
        token: req.token,
        transaction_code,
        round_id: req.game_round,
        game_code: req.game_code,
        amount: req.amount,
        bet_time: parse_bet_time(req.bet_time.as_deref()),
    };
    match state.engines.gs5.wager(wager).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRequest {
    pub player_id: String,
    pub token: String,
    pub transaction_code: String,
    pub game_round: String,
    pub game_code: String,
    /// Absent for loss settlements.
    #[serde(default, deserialize_with = "deserialize_opt_amount")]
    pub win: Option<Amount>,
    #[serde(default)]
    pub settle_time: Option<String>,
}

pub async fn result(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResultRequest>,
) -> Json<Value> {
    let transaction_code = match TransactionCode::try_from(req.transaction_code) {
        Ok(code) => code,
        Err(e) => return reject(&EngineError::from(e)),
    };

    let settle = SettleRequest {
        play_id: req.player_id,
        token: req.token,
        transaction_code,
        round_id: req.game_round,
        game_code: req.game_code,
        win_amount: req.win,
        settle_time: parse_bet_time(req.settle_time.as_deref()),
    };
    match state.engines.gs5.settle(settle).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundCallback {
    pub player_id: String,
    pub token: String,
    pub transaction_code: String,
    pub game_round: String,
}

pub async fn refund(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefundCallback>,
) -> Json<Value> {
    let transaction_code = match TransactionCode::try_from(req.transaction_code) {
        Ok(code) => code,
        Err(e) => return reject(&EngineError::from(e)),
    };

    let refund = RefundRequest {
        play_id: req.player_id,
        token: req.token,
        transaction_code,
        round_id: req.game_round,
    };
    match state.engines.gs5.refund(refund).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub player_id: String,
    pub username: String,
    pub currency: String,
    pub game_code: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Operator-facing: creates the player on first launch, issues a session
/// token and asks the provider for the game URL. Errors use the standard
/// envelope, not the Gs5 callback codes.
pub async fn launch(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LaunchRequest>,
) -> Result<Json<Value>, EngineError> {
    let engine = &state.engines.gs5;
    let (session, creds) = engine
        .register_session(&req.player_id, &req.username, &req.currency, &req.game_code)
        .await?;
    let url = state
        .provider_api
        .launch_url(
            &creds,
            &req.player_id,
            &session.token,
            &req.game_code,
            req.lang.as_deref().unwrap_or("en"),
        )
        .await?;

    metrics::counter!("launches_total", "provider" => "gs5").increment(1);
    Ok(Json(json!({ "token": session.token, "url": url })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualRequest {
    pub player_id: String,
    pub token: String,
    pub transaction_code: String,
}

pub async fn visual(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VisualRequest>,
) -> Json<Value> {
    let engine = &state.engines.gs5;

    let outcome: Result<(Transaction, String), EngineError> = async {
        let player = engine.authenticate(&req.player_id, &req.token).await?;
        let code = TransactionCode::try_from(req.transaction_code)?;
        let txn = engine.bet_detail(&code).await?;
        let creds = engine.credentials_for(&player.currency)?;
        let url = state.provider_api.visual_url(&creds, code.as_str()).await?;
        Ok((txn, url))
    }
    .await;

    match outcome {
        Ok((txn, url)) => Json(json!({
            "status": STATUS_OK,
            "url": url,
            "gameRound": txn.round_id,
            "betAmount": txn.bet_amount.to_major(),
            "winAmount": txn.win_amount.to_major(),
        })),
        Err(e) => reject(&e),
    }
}
