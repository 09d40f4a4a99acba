//! Transaction reconciliation engine.
//!
//! One parameterized state machine shared by every provider integration:
//!
//! ```text
//! START -> VALIDATED -> CHECKED_IDEMPOTENT -> (REPLAY_RETURN | FUNDS_CHECKED)
//!       -> LEDGER_CALLED -> (PERSISTED_SUCCESS | FAILED_NO_PERSIST)
//! ```
//!
//! The load-bearing invariant: a transaction row is written if and only if
//! the ledger call reported success, and an external id already on file
//! never triggers a second ledger call.

pub mod policy;


use chrono::Utc;
use rand::Rng;
use shared::{Amount, TransactionCode, ValidationError, MAX_AMOUNT_MINOR, MIN_WAGER_MINOR};
use std::sync::Arc;
use uuid::Uuid;

use crate::credentials::{CredentialResolver, Credentials};
use crate::domain::{
    CombinedRequest, Player, RefundRequest, Session, SettleRequest, Transaction, TransactionKind,
    WagerRequest,
};
use crate::errors::{EngineError, Result};
use crate::repository::{PlayerRepository, SessionRepository, TransactionRepository};
use crate::reports::ReportBuilder;
use crate::wallet::WalletGateway;

use policy::{LedgerShape, ProviderPolicy, RefundCall};

pub struct ReconciliationEngine {
    policy: ProviderPolicy,
    wallet: Arc<dyn WalletGateway>,
    credentials: Arc<dyn CredentialResolver>,
    players: Arc<dyn PlayerRepository>,
    sessions: Arc<dyn SessionRepository>,
    transactions: Arc<dyn TransactionRepository>,
    reports: ReportBuilder,
}

impl ReconciliationEngine {
    pub fn new(
        policy: ProviderPolicy,
        wallet: Arc<dyn WalletGateway>,
        credentials: Arc<dyn CredentialResolver>,
        players: Arc<dyn PlayerRepository>,
        sessions: Arc<dyn SessionRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            policy,
            wallet,
            credentials,
            players,
            sessions,
            transactions,
            reports: ReportBuilder::new(),
        }
    }

    pub fn provider(&self) -> &'static str {
        self.policy.provider
    }

    /// Resolve the player and verify the presented token against the active
    /// session. Read-only; every callback starts here.
    pub async fn authenticate(&self, play_id: &str, token: &str) -> Result<Player> {
        let player = self
            .players
            .get_by_play_id(play_id)
            .await?
            .ok_or_else(|| EngineError::PlayerNotFound(play_id.to_string()))?;

        match self.sessions.get(play_id).await? {
            Some(session) if !session.expired && session.token == token => Ok(player),
            _ => Err(EngineError::InvalidToken(play_id.to_string())),
        }
    }

    /// Current wallet credit for an authenticated player.
    pub async fn balance(&self, play_id: &str, token: &str) -> Result<Amount> {
        let player = self.authenticate(play_id, token).await?;
        let creds = self.credentials.by_currency(&player.currency)?;
        self.wallet_credit(&creds, play_id).await
    }

    /// Deduct a bet from the player balance, exactly once per external id.
    pub async fn wager(&self, req: WagerRequest) -> Result<Amount> {
        let player = self.authenticate(&req.play_id, &req.token).await?;

        // Zero-amount legs are legal only inside combined wager+payout calls;
        // a standalone wager below the minimum never reaches the ledger.
        if req.amount.as_minor() < MIN_WAGER_MINOR {
            return Err(EngineError::InvalidRequest(
                ValidationError::AmountOutOfRange {
                    minor: req.amount.as_minor(),
                    min: MIN_WAGER_MINOR,
                    max: MAX_AMOUNT_MINOR,
                },
            ));
        }

        let external_id = self.policy.wager_id(&req.transaction_code);

        if self
            .transactions
            .find_by_external_id(&external_id)
            .await?
            .is_some()
        {
            return self.replay(&player, &external_id).await;
        }

        let creds = self.credentials.by_currency(&player.currency)?;
        let credit = self.wallet_credit(&creds, &req.play_id).await?;
        if credit < req.amount {
            return Err(EngineError::InsufficientFund {
                required: req.amount,
                available: credit,
            });
        }

        let report = self
            .reports
            .build(&external_id, &req.round_id, &req.game_code, req.bet_time);
        let reply = self
            .wallet
            .wager(
                &creds,
                &req.play_id,
                &player.currency,
                &external_id,
                req.amount,
                &report,
            )
            .await?;
        if !reply.is_ok() {
            return Err(self.wallet_failure("wager", &external_id, reply.status));
        }

        let now = Utc::now();
        self.record(Transaction {
            external_id: external_id.clone(),
            round_id: req.round_id.clone(),
            kind: TransactionKind::Wager,
            play_id: req.play_id.clone(),
            bet_amount: req.amount,
            win_amount: Amount::ZERO,
            ref_id: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

        tracing::info!(
            provider = self.policy.provider,
            external_id = %external_id,
            amount = %req.amount,
            credit_after = %reply.credit,
            "Wager posted"
        );
        metrics::counter!("wagers_total", "provider" => self.policy.provider).increment(1);

        Ok(reply.credit)
    }

    /// Credit the win (possibly zero) for a previously wagered round.
    pub async fn settle(&self, req: SettleRequest) -> Result<Amount> {
        let player = self.authenticate(&req.play_id, &req.token).await?;
        let external_id = self.policy.payout_id(&req.transaction_code);

        if self
            .transactions
            .find_by_external_id(&external_id)
            .await?
            .is_some()
        {
            return self.replay(&player, &external_id).await;
        }

        // A round that was never wagered cannot settle.
        let wager = self
            .transactions
            .find_wager_by_round(&req.round_id)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound(req.round_id.clone()))?;

        let creds = self.credentials.by_currency(&player.currency)?;
        let win = req.win_amount.unwrap_or(Amount::ZERO);
        let report =
            self.reports
                .build(&external_id, &req.round_id, &req.game_code, req.settle_time);

        let reply = match self.policy.ledger_shape {
            LedgerShape::Split => {
                self.wallet
                    .payout(
                        &creds,
                        &req.play_id,
                        &player.currency,
                        &external_id,
                        win,
                        &report,
                    )
                    .await?
            }
            LedgerShape::Combined => {
                self.wallet
                    .wager_and_payout(
                        &creds,
                        &req.play_id,
                        &player.currency,
                        &wager.external_id,
                        Amount::ZERO,
                        &external_id,
                        win,
                        &report,
                    )
                    .await?
            }
        };
        if !reply.is_ok() {
            return Err(self.wallet_failure("settle", &external_id, reply.status));
        }

        self.record(Transaction {
            external_id: external_id.clone(),
            round_id: req.round_id.clone(),
            kind: TransactionKind::Settle,
            play_id: req.play_id.clone(),
            bet_amount: Amount::ZERO,
            win_amount: win,
            ref_id: Some(wager.external_id),
            created_at: Utc::now(),
            updated_at: req.settle_time,
        })
        .await?;

        tracing::info!(
            provider = self.policy.provider,
            external_id = %external_id,
            win = %win,
            credit_after = %reply.credit,
            "Settlement posted"
        );
        metrics::counter!("settles_total", "provider" => self.policy.provider).increment(1);

        Ok(reply.credit)
    }

    /// Reverse a wagered, unsettled round against the ledger.
    pub async fn refund(&self, req: RefundRequest) -> Result<Amount> {
        let player = self.authenticate(&req.play_id, &req.token).await?;

        // A bet that was never placed cannot be refunded.
        let wager = self
            .transactions
            .find_wager_by_round(&req.round_id)
            .await?
            .ok_or_else(|| EngineError::RefundTransactionNotFound(req.round_id.clone()))?;

        let external_id = self.policy.refund_id(&req.transaction_code);
        if self
            .transactions
            .find_by_external_id(&external_id)
            .await?
            .is_some()
        {
            return self.replay(&player, &external_id).await;
        }

        let creds = self.credentials.by_currency(&player.currency)?;
        let reply = match self.policy.refund_call {
            RefundCall::Cancel => {
                self.wallet
                    .cancel(
                        &creds,
                        &req.play_id,
                        &player.currency,
                        &external_id,
                        wager.bet_amount,
                        &wager.external_id,
                    )
                    .await?
            }
            RefundCall::Resettle => {
                self.wallet
                    .resettle(
                        &creds,
                        &req.play_id,
                        &player.currency,
                        &external_id,
                        wager.bet_amount,
                        &wager.external_id,
                        None,
                        wager.created_at,
                    )
                    .await?
            }
        };
        if !reply.is_ok() {
            return Err(self.wallet_failure("refund", &external_id, reply.status));
        }

        let now = Utc::now();
        self.record(Transaction {
            external_id: external_id.clone(),
            round_id: req.round_id.clone(),
            kind: TransactionKind::Refund,
            play_id: req.play_id.clone(),
            bet_amount: wager.bet_amount,
            win_amount: Amount::ZERO,
            ref_id: Some(wager.external_id),
            created_at: now,
            updated_at: now,
        })
        .await?;

        tracing::info!(
            provider = self.policy.provider,
            external_id = %external_id,
            refunded = %wager.bet_amount,
            credit_after = %reply.credit,
            "Refund posted"
        );
        metrics::counter!("refunds_total", "provider" => self.policy.provider).increment(1);

        Ok(reply.credit)
    }

    /// Atomic combined debit+credit leg, for providers whose protocol
    /// reports win/loss in a single callback. Either leg may be zero.
    pub async fn wager_and_payout(&self, req: CombinedRequest) -> Result<Amount> {
        let player = self.authenticate(&req.play_id, &req.token).await?;

        // A free-game settlement depends on its parent round being on file.
        let mut ref_id = None;
        if let Some(main_round_id) = &req.main_round_id {
            let main = self
                .transactions
                .find_wager_by_round(main_round_id)
                .await?
                .ok_or_else(|| EngineError::TransactionNotFound(main_round_id.clone()))?;
            ref_id = Some(main.external_id);
        }

        let external_id = self.policy.combined_id(&req.transaction_code);
        if self
            .transactions
            .find_by_external_id(&external_id)
            .await?
            .is_some()
        {
            return self.replay(&player, &external_id).await;
        }

        let creds = self.credentials.by_currency(&player.currency)?;
        if !req.bet_amount.is_zero() {
            let credit = self.wallet_credit(&creds, &req.play_id).await?;
            if credit < req.bet_amount {
                return Err(EngineError::InsufficientFund {
                    required: req.bet_amount,
                    available: credit,
                });
            }
        }

        let report = self
            .reports
            .build(&external_id, &req.round_id, &req.game_code, req.bet_time);
        let reply = self
            .wallet
            .wager_and_payout(
                &creds,
                &req.play_id,
                &player.currency,
                &external_id,
                req.bet_amount,
                &external_id,
                req.win_amount,
                &report,
            )
            .await?;
        if !reply.is_ok() {
            return Err(self.wallet_failure("wager_and_payout", &external_id, reply.status));
        }

        let now = Utc::now();
        self.record(Transaction {
            external_id: external_id.clone(),
            round_id: req.round_id.clone(),
            kind: TransactionKind::WagerPayout,
            play_id: req.play_id.clone(),
            bet_amount: req.bet_amount,
            win_amount: req.win_amount,
            ref_id,
            created_at: now,
            updated_at: now,
        })
        .await?;

        tracing::info!(
            provider = self.policy.provider,
            external_id = %external_id,
            bet = %req.bet_amount,
            win = %req.win_amount,
            credit_after = %reply.credit,
            "Combined wager+payout posted"
        );
        metrics::counter!("wager_payouts_total", "provider" => self.policy.provider).increment(1);

        Ok(reply.credit)
    }

    /// Recorded transaction for a provider transaction code, checked across
    /// the id prefixes this provider uses. Read-only (bet detail lookups).
    pub async fn bet_detail(&self, code: &TransactionCode) -> Result<Transaction> {
        for external_id in [
            self.policy.payout_id(code),
            self.policy.combined_id(code),
            self.policy.wager_id(code),
        ] {
            if let Some(txn) = self.transactions.find_by_external_id(&external_id).await? {
                return Ok(txn);
            }
        }
        Err(EngineError::TransactionNotFound(code.to_string()))
    }

    /// Create the player on first launch and issue a fresh session token.
    /// The previous session, if any, is superseded (latest token wins).
    pub async fn register_session(
        &self,
        play_id: &str,
        username: &str,
        currency: &str,
        game_code: &str,
    ) -> Result<(Session, Credentials)> {
        let creds = self.credentials.by_currency(currency)?;

        if self.players.get_by_play_id(play_id).await?.is_none() {
            self.players
                .create(&Player {
                    play_id: play_id.to_string(),
                    username: username.to_string(),
                    currency: currency.to_string(),
                    bet_limit: creds.bet_limit,
                    created_at: Utc::now(),
                })
                .await?;
            tracing::info!(provider = self.policy.provider, play_id, "Player registered");
        }

        let salt: u32 = rand::thread_rng().gen();
        let session = Session {
            play_id: play_id.to_string(),
            token: format!("{}{:08x}", Uuid::new_v4().simple(), salt),
            game_code: game_code.to_string(),
            expired: false,
            created_at: Utc::now(),
        };
        self.sessions.put(&session).await?;

        Ok((session, creds))
    }

    /// Invalidate the player's active session. The record stays on file.
    pub async fn logout(&self, play_id: &str, token: &str) -> Result<()> {
        self.authenticate(play_id, token).await?;
        self.sessions.invalidate(play_id).await?;
        tracing::info!(provider = self.policy.provider, play_id, "Session invalidated");
        Ok(())
    }

    /// Credentials for a currency (adapters need them for provider API calls).
    pub fn credentials_for(&self, currency: &str) -> Result<Credentials> {
        self.credentials.by_currency(currency)
    }

    /// Idempotent re-delivery: the ledger already applied this external id,
    /// so answer with the current balance from a fresh wallet query instead
    /// of a second posting or a stale stored figure.
    async fn replay(&self, player: &Player, external_id: &str) -> Result<Amount> {
        tracing::info!(
            provider = self.policy.provider,
            external_id,
            "Replay detected, returning live balance"
        );
        metrics::counter!("replays_total", "provider" => self.policy.provider).increment(1);

        let creds = self.credentials.by_currency(&player.currency)?;
        self.wallet_credit(&creds, &player.play_id).await
    }

    async fn wallet_credit(&self, creds: &Credentials, play_id: &str) -> Result<Amount> {
        let reply = self.wallet.balance(creds, play_id).await?;
        if !reply.is_ok() {
            return Err(EngineError::Wallet(reply.status));
        }
        Ok(reply.credit)
    }

    fn wallet_failure(&self, operation: &'static str, external_id: &str, status: i64) -> EngineError {
        tracing::warn!(
            provider = self.policy.provider,
            operation,
            external_id,
            status,
            "Wallet rejected operation, nothing persisted"
        );
        metrics::counter!(
            "wallet_errors_total",
            "provider" => self.policy.provider,
            "operation" => operation
        )
        .increment(1);
        EngineError::Wallet(status)
    }

    /// Persist after a confirmed ledger success. Losing the insert-if-absent
    /// race here means a concurrent duplicate got past the idempotency check;
    /// the ledger has already posted, so the caller still gets its balance.
    async fn record(&self, txn: Transaction) -> Result<()> {
        let created = self.transactions.create(&txn).await?;
        if !created {
            tracing::warn!(
                provider = self.policy.provider,
                external_id = %txn.external_id,
                "Transaction already on file after ledger success"
            );
            metrics::counter!("insert_races_total", "provider" => self.policy.provider)
                .increment(1);
        }
        Ok(())
    }
}
