//! Wallet ledger seam.
//!
//! The wallet is the external service of record for balances. Every
//! operation returns a status code and, on success, the post-operation
//! credit; the engine compares the status against the success sentinel and
//! treats everything else as a WalletError.

mod http;

pub use http::HttpWalletGateway;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::Amount;

use crate::credentials::Credentials;
use crate::errors::Result;
use crate::reports::BetReport;

#[derive(Debug, Clone, Copy)]
pub struct WalletReply {
    pub status: i64,
    pub credit: Amount,
}

impl WalletReply {
    pub fn is_ok(&self) -> bool {
        self.status == shared::WALLET_STATUS_OK
    }
}

#[allow(clippy::too_many_arguments)]
#[async_trait]
pub trait WalletGateway: Send + Sync {
    async fn balance(&self, creds: &Credentials, play_id: &str) -> Result<WalletReply>;

    async fn wager(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        report: &BetReport,
    ) -> Result<WalletReply>;

    async fn payout(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        report: &BetReport,
    ) -> Result<WalletReply>;

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
    ) -> Result<WalletReply>;

    async fn cancel(
        &self,
        creds: &Credentials,
        play_id: &str,
        currency: &str,
        transaction_id: &str,
        amount: Amount,
        bet_id: &str,
    ) -> Result<WalletReply>;

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
    ) -> Result<WalletReply>;
}
