use shared::constants::*;
use shared::TransactionCode;

/// How a provider's settlement maps onto the wallet ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerShape {
    /// Wager and settlement are separate wallet calls (`wager` / `payout`).
    Split,
    /// One atomic `wager_and_payout` call, legs zeroed as needed.
    Combined,
}

/// Which wallet reversal operation a provider's refund uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundCall {
    Cancel,
    Resettle,
}

/// Per-provider parameterization of the reconciliation engine.
///
/// The engine is one state machine; everything that differs between
/// providers (external-id prefixes, call shapes) lives here.
#[derive(Debug, Clone)]
pub struct ProviderPolicy {
    pub provider: &'static str,
    pub wager_prefix: &'static str,
    pub payout_prefix: &'static str,
    pub refund_prefix: &'static str,
    pub combined_prefix: &'static str,
    pub ledger_shape: LedgerShape,
    pub refund_call: RefundCall,
}

impl ProviderPolicy {
    pub fn gs5() -> Self {
        Self {
            provider: "gs5",
            wager_prefix: WAGER_PREFIX,
            payout_prefix: PAYOUT_PREFIX,
            refund_prefix: CANCEL_PREFIX,
            combined_prefix: WAGER_PAYOUT_PREFIX,
            ledger_shape: LedgerShape::Split,
            refund_call: RefundCall::Cancel,
        }
    }

    pub fn hg5() -> Self {
        Self {
            provider: "hg5",
            wager_prefix: WAGER_PREFIX,
            payout_prefix: PAYOUT_PREFIX,
            refund_prefix: CANCEL_PREFIX,
            combined_prefix: WAGER_PAYOUT_PREFIX,
            ledger_shape: LedgerShape::Combined,
            refund_call: RefundCall::Cancel,
        }
    }

    pub fn pla() -> Self {
        Self {
            provider: "pla",
            wager_prefix: WAGER_PREFIX,
            payout_prefix: PAYOUT_PREFIX,
            refund_prefix: RESETTLE_PREFIX,
            combined_prefix: WAGER_PAYOUT_PREFIX,
            ledger_shape: LedgerShape::Split,
            refund_call: RefundCall::Resettle,
        }
    }

    pub fn pca() -> Self {
        Self {
            provider: "pca",
            wager_prefix: WAGER_PREFIX,
            payout_prefix: PAYOUT_PREFIX,
            refund_prefix: CANCEL_PREFIX,
            combined_prefix: WAGER_PAYOUT_PREFIX,
            ledger_shape: LedgerShape::Split,
            refund_call: RefundCall::Cancel,
        }
    }

    pub fn wager_id(&self, code: &TransactionCode) -> String {
        format!("{}{}", self.wager_prefix, code)
    }

    pub fn payout_id(&self, code: &TransactionCode) -> String {
        format!("{}{}", self.payout_prefix, code)
    }

    pub fn refund_id(&self, code: &TransactionCode) -> String {
        format!("{}{}", self.refund_prefix, code)
    }

    pub fn combined_id(&self, code: &TransactionCode) -> String {
        format!("{}{}", self.combined_prefix, code)
    }
}
