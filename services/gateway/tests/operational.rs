/// Integration tests for the operational endpoints and launch error envelope
mod common;

use common::TestContext;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new(0);

    let health: Value = ctx.server.get("/health").await.json();
    assert_eq!(health["status"], "healthy");

    // Memory backend has no external component to probe.
    let detailed: Value = ctx.server.get("/health/detailed").await.json();
    assert_eq!(detailed["status"], "healthy");
    assert_eq!(detailed["components"]["store"], "healthy");
}

#[tokio::test]
async fn test_launch_returns_token_and_url() {
    let ctx = TestContext::new(0);

    let response = ctx
        .server
        .post("/api/gs5/launch")
        .json(&json!({
            "playerId": "player-1",
            "username": "player-1",
            "currency": "THB",
            "gameCode": "slot-7",
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(
        body["url"],
        "https://games.test/launch/player-1/slot-7"
    );
}

#[tokio::test]
async fn test_launch_with_unknown_currency_uses_error_envelope() {
    let ctx = TestContext::new(0);

    let response = ctx
        .server
        .post("/api/gs5/launch")
        .json(&json!({
            "playerId": "player-1",
            "username": "player-1",
            "currency": "EUR",
            "gameCode": "slot-7",
        }))
        .await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND_CREDENTIALS");
    assert_eq!(body["error"]["category"], "NOT_FOUND");
}

#[tokio::test]
async fn test_visual_returns_bet_detail() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    ctx.server
        .post("/api/gs5/bet")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-1",
            "gameRound": "round-1",
            "gameCode": "slot-7",
            "amount": 100.0,
        }))
        .await;

    let visual: Value = ctx
        .server
        .post("/api/gs5/visual")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-1",
        }))
        .await
        .json();
    assert_eq!(visual["status"], 0);
    assert_eq!(visual["url"], "https://games.test/visual/tx-1");
    assert_eq!(visual["gameRound"], "round-1");
    assert_eq!(visual["betAmount"], 100.0);
    assert_eq!(visual["winAmount"], 0.0);
}

#[tokio::test]
async fn test_visual_for_unknown_transaction() {
    let ctx = TestContext::new(100_000);
    let token = ctx.launch("gs5", "player-1").await;

    let visual: Value = ctx
        .server
        .post("/api/gs5/visual")
        .json(&json!({
            "playerId": "player-1",
            "token": token,
            "transactionCode": "tx-unknown",
        }))
        .await
        .json();
    assert_eq!(visual["status"], 4);
}
