//! Hg5 provider adapter.
//!
//! Hg5 reports each round's outcome in a single callback carrying both the
//! bet and the win, so every transaction maps to the engine's atomic
//! wager+payout operation. Free-game rounds arrive with a zero bet and a
//! `mainRoundCode` pointing at the paid round that granted them. Responses
//! wrap a numeric code and a `data` object.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{Amount, TransactionCode};

use crate::domain::CombinedRequest;
use crate::errors::EngineError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

use super::parse_bet_time;

pub const CODE_OK: i32 = 0;
pub const CODE_PLAYER_NOT_FOUND: i32 = 101;
pub const CODE_INVALID_TOKEN: i32 = 102;
pub const CODE_INSUFFICIENT_FUND: i32 = 103;
pub const CODE_TRANSACTION_NOT_FOUND: i32 = 104;
pub const CODE_INVALID_AGENT: i32 = 105;
pub const CODE_INVALID_REQUEST: i32 = 106;
pub const CODE_API_ERROR: i32 = 107;
pub const CODE_WALLET_ERROR: i32 = 108;

fn code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::PlayerNotFound(_) => CODE_PLAYER_NOT_FOUND,
        EngineError::InvalidToken(_) => CODE_INVALID_TOKEN,
        EngineError::InsufficientFund { .. } => CODE_INSUFFICIENT_FUND,
        EngineError::TransactionNotFound(_) | EngineError::RefundTransactionNotFound(_) => {
            CODE_TRANSACTION_NOT_FOUND
        }
        EngineError::InvalidAgent(_) => CODE_INVALID_AGENT,
        EngineError::InvalidRequest(_) => CODE_INVALID_REQUEST,
        EngineError::Wallet(_) => CODE_WALLET_ERROR,
        EngineError::ThirdPartyApi(_) | EngineError::Store(_) => CODE_API_ERROR,
    }
}

fn reject(err: &EngineError) -> Json<Value> {
    tracing::debug!(provider = "hg5", error = %err, "Callback rejected");
    Json(json!({ "code": code_for(err), "data": null }))
}

fn balance_ok(balance: Amount) -> Json<Value> {
    Json(json!({ "code": CODE_OK, "data": { "balance": balance.to_major() } }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub play_id: String,
    pub token: String,
}

pub async fn auth(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthRequest>,
) -> Json<Value> {
    match state.engines.hg5.authenticate(&req.play_id, &req.token).await {
        Ok(player) => Json(json!({
            "code": CODE_OK,
            "data": { "playId": player.play_id, "currency": player.currency },
        })),
        Err(e) => reject(&e),
    }
}

pub async fn balance(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthRequest>,
) -> Json<Value> {
    match state.engines.hg5.balance(&req.play_id, &req.token).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub play_id: String,
    pub token: String,
    pub transaction_code: String,
    pub game_round_code: String,
    pub game_code: String,
    pub bet: f64,
    pub win: f64,
    #[serde(default)]
    pub bet_time: Option<String>,
    /// Present on free-game settlements; names the paid round that
    /// granted the free spins.
    #[serde(default)]
    pub main_round_code: Option<String>,
}

impl TransactionRequest {
    fn normalize(self) -> Result<CombinedRequest, EngineError> {
        Ok(CombinedRequest {
            play_id: self.play_id,
            token: self.token,
            transaction_code: TransactionCode::try_from(self.transaction_code)?,
            round_id: self.game_round_code,
            game_code: self.game_code,
            bet_amount: Amount::from_major(self.bet)?,
            win_amount: Amount::from_major(self.win)?,
            bet_time: parse_bet_time(self.bet_time.as_deref()),
            main_round_id: self.main_round_code,
        })
    }
}

pub async fn transaction(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TransactionRequest>,
) -> Json<Value> {
    let combined = match req.normalize() {
        Ok(combined) => combined,
        Err(e) => return reject(&e),
    };
    match state.engines.hg5.wager_and_payout(combined).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

pub async fn freegame(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TransactionRequest>,
) -> Json<Value> {
    if req.main_round_code.is_none() {
        let err = EngineError::from(shared::ValidationError::MissingField("mainRoundCode"));
        return reject(&err);
    }
    let combined = match req.normalize() {
        Ok(combined) => combined,
        Err(e) => return reject(&e),
    };
    match state.engines.hg5.wager_and_payout(combined).await {
        Ok(balance) => balance_ok(balance),
        Err(e) => reject(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
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
    let engine = &state.engines.hg5;
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

    metrics::counter!("launches_total", "provider" => "hg5").increment(1);
    Ok(Json(json!({ "token": session.token, "url": url })))
}
