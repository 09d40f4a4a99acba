use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use shared::Amount;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::errors::{EngineError, Result};
use crate::reports::BetReport;

use super::{WalletGateway, WalletReply};

/// HTTP client for the wallet ledger.
///
/// Each operation is one POST carrying the kiosk credentials; replies are
/// `{"status": <code>, "credit": <major units>}`. Transport failures and
/// malformed payloads surface as ThirdPartyApi, never as a wallet status.
pub struct HttpWalletGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    status: i64,
    #[serde(default)]
    credit: Option<f64>,
}

impl HttpWalletGateway {
    pub fn new(base_url: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<WalletReply> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::ThirdPartyApi(format!("wallet {} request: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(EngineError::ThirdPartyApi(format!(
                "wallet {} returned HTTP {}",
                path,
                response.status()
            )));
        }

        let wire: WireReply = response
            .json()
            .await
            .map_err(|e| EngineError::ThirdPartyApi(format!("wallet {} body: {}", path, e)))?;

        let credit = Amount::from_major(wire.credit.unwrap_or(0.0))
            .map_err(|e| EngineError::ThirdPartyApi(format!("wallet {} credit: {}", path, e)))?;

        tracing::debug!(path, status = wire.status, credit = %credit, "Wallet reply");

        Ok(WalletReply {
            status: wire.status,
            credit,
        })
    }
}

#[async_trait]
impl WalletGateway for HttpWalletGateway {
    async fn balance(&self, creds: &Credentials, play_id: &str) -> Result<WalletReply> {
        self.post(
            "balance",
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
            }),
        )
        .await
    }

    async fn wager(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        report: &BetReport,
    ) -> Result<WalletReply> {
        self.post(
            "wager",
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
                "currency": currency,
                "transaction_id": transaction_id,
                "amount": amount.to_major(),
                "report": report,
            }),
        )
        .await
    }

    async fn payout(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        report: &BetReport,
    ) -> Result<WalletReply> {
        self.post(
            "payout",
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
                "currency": currency,
                "transaction_id": transaction_id,
                "amount": amount.to_major(),
                "report": report,
            }),
        )
        .await
    }

    async fn wager_and_payout(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        wager_transaction_id: &str,
        wager_amount: Amount,
        payout_transaction_id: &str,
        payout_amount: Amount,
        report: &BetReport,
    ) -> Result<WalletReply> {
        self.post(
            "wager_and_payout",
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
                "currency": currency,
                "wager_transaction_id": wager_transaction_id,
                "wager_amount": wager_amount.to_major(),
                "payout_transaction_id": payout_transaction_id,
                "payout_amount": payout_amount.to_major(),
                "report": report,
            }),
        )
        .await
    }

    async fn cancel(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        bet_id: &str,
    ) -> Result<WalletReply> {
        self.post(
            "cancel",
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
                "currency": currency,
                "transaction_id": transaction_id,
                "amount": amount.to_major(),
                "bet_id": bet_id,
            }),
        )
        .await
    }

    async fn resettle(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        bet_id: &str,
        settled_transaction_id: Option<&str>,
        bet_time: DateTime<Utc>,
    ) -> Result<WalletReply> {
        self.post(
            "resettle",
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
                "currency": currency,
                "transaction_id": transaction_id,
                "amount": amount.to_major(),
                "bet_id": bet_id,
                "settled_transaction_id": settled_transaction_id,
                "bet_time": bet_time.to_rfc3339(),
            }),
        )
        .await
    }
}
