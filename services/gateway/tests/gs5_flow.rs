/// Integration tests for the Gs5 callback surface
mod common;

use common::TestContext;
use serde_json::{json, Value};

#[tokio::test]
async fn test_launch_bet_result_round_trip() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let bet: Value = ctx
        .server
        .post("/api/gs5/bet")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-100",
            "gameRound": "round-1",
            "gameCode": "slot-7",
            "amount": 100.0,
        }))
        .await
        .json();
    assert_eq!(bet["status"], 0);
    assert_eq!(bet["balance"], 900.0);

    let result: Value = ctx
        .server
        .post("/api/gs5/result")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-101",
            "gameRound": "round-1",
            "gameCode": "slot-7",
            "win": 250.0,
        }))
        .await
        .json();
    assert_eq!(result["status"], 0);
    assert_eq!(result["balance"], 1150.0);

    let balance: Value = ctx
        .server
        .post("/api/gs5/balance")
        .json(&json!({ "playerId": "player-1", "token": token }))
        .await
        .json();
    assert_eq!(balance["balance"], 1150.0);
}

#[tokio::test]
async fn test_duplicate_bet_returns_live_balance_without_second_posting() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let bet = json!({
        "playerId": "player-1",
        "token": token,
        "transactionCode": "tx-100",
        "gameRound": "round-1",
        "gameCode": "slot-7",
        "amount": 100.0,
    });

    let first: Value = ctx.server.post("/api/gs5/bet").json(&bet).await.json();
    assert_eq!(first["balance"], 900.0);

    let replay: Value = ctx.server.post("/api/gs5/bet").json(&bet).await.json();
    assert_eq!(replay["status"], 0);
    assert_eq!(replay["balance"], 900.0);
    assert_eq!(ctx.wallet.calls_named("wager:"), 1);
}

#[tokio::test]
async fn test_insufficient_funds_rejected_without_posting() {
    let ctx = TestContext::new(5_000);
    let token = ctx.launch("gs5", "player-1").await;

    let bet: Value = ctx
        .server
        .post("/api/gs5/bet")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-100",
            "gameRound": "round-1",
            "gameCode": "slot-7",
            "amount": 100.0,
        }))
        .await
        .json();
    assert_eq!(bet["status"], 3);
    assert_eq!(ctx.wallet.calls_named("wager:"), 0);
    assert_eq!(ctx.wallet.credit_minor(), 5_000);
}

#[tokio::test]
async fn test_wallet_rejection_persists_nothing_and_retry_succeeds() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let bet = json!({
        "playerId": "player-1",
        "token": token,
        "transactionCode": "tx-100",
        "gameRound": "round-1",
        "gameCode": "slot-7",
        "amount": 100.0,
    });

    ctx.wallet.fail_next(42);
    let rejected: Value = ctx.server.post("/api/gs5/bet").json(&bet).await.json();
    assert_eq!(rejected["status"], 9);

    // Not on file, so the retry posts to the ledger rather than replaying.
    let retry: Value = ctx.server.post("/api/gs5/bet").json(&bet).await.json();
    assert_eq!(retry["status"], 0);
    assert_eq!(retry["balance"], 900.0);
    assert_eq!(ctx.wallet.calls_named("wager:"), 2);
}

#[tokio::test]
async fn test_unknown_player_and_bad_token_codes() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let unknown: Value = ctx
        .server
        .post("/api/gs5/balance")
        .json(&json!({ "playerId": "ghost", "token": token }))
        .await
        .json();
    assert_eq!(unknown["status"], 1);

    let bad_token: Value = ctx
        .server
        .post("/api/gs5/balance")
        .json(&json!({ "playerId": "player-1", "token": "stale" }))
        .await
        .json();
    assert_eq!(bad_token["status"], 2);
}

#[tokio::test]
async fn test_result_without_wager_is_transaction_not_found() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let result: Value = ctx
        .server
        .post("/api/gs5/result")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-200",
            "gameRound": "never-wagered",
            "gameCode": "slot-7",
            "win": 10.0,
        }))
        .await
        .json();
    assert_eq!(result["status"], 4);
}

#[tokio::test]
async fn test_refund_reverses_unsettled_wager() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    ctx.server
        .post("/api/gs5/bet")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-100",
            "gameRound": "round-1",
            "gameCode": "slot-7",
            "amount": 100.0,
        }))
        .await;

    let refund: Value = ctx
        .server
        .post("/api/gs5/refund")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-100",
            "gameRound": "round-1",
        }))
        .await
        .json();
    assert_eq!(refund["status"], 0);
    assert_eq!(refund["balance"], 1000.0);
    assert_eq!(ctx.wallet.calls_named("cancel:"), 1);
}

#[tokio::test]
async fn test_refund_of_unknown_round_code() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let refund: Value = ctx
        .server
        .post("/api/gs5/refund")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-100",
            "gameRound": "never-wagered",
        }))
        .await
        .json();
    assert_eq!(refund["status"], 5);
}

#[tokio::test]
async fn test_malformed_body_is_http_400_with_validation_envelope() {
    let ctx = TestContext::new(100_000);

    let response = ctx
        .server
        .post("/api/gs5/bet")
        .json(&json!({ "playerId": "player-1" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["category"], "Validation");
    assert_eq!(body["error"]["code"], "VALIDATION_MISSING_FIELD");
}

#[tokio::test]
async fn test_negative_amount_is_validation_error() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let response = ctx
        .server
        .post("/api/gs5/bet")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-100",
            "gameRound": "round-1",
            "gameCode": "slot-7",
            "amount": -5.0,
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_INVALID_AMOUNT");
}
