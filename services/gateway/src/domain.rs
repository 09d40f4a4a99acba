use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Amount, TransactionCode};

/// Registered casino player for one provider integration.
///
/// Created on first game launch; immutable afterwards except for the
/// session token, which lives in its own record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub play_id: String,
    pub username: String,
    pub currency: String,
    pub bet_limit: Option<Amount>,
    pub created_at: DateTime<Utc>,
}

/// Active game-launch session. Latest token wins; callbacks must present
/// the active, matching token or be rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub play_id: String,
    pub token: String,
    pub game_code: String,
    pub expired: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Wager,
    Settle,
    Refund,
    WagerPayout,
}

/// One ledger-affecting event on file. Rows are never deleted (audit trail)
/// and never mutated after creation except for the settlement timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub external_id: String,
    pub round_id: String,
    pub kind: TransactionKind,
    pub play_id: String,
    pub bet_amount: Amount,
    pub win_amount: Amount,
    /// External id of the originating wager, for settle/refund rows.
    pub ref_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized debit request handed to the engine by a provider adapter.
#[derive(Debug, Clone)]
pub struct WagerRequest {
    pub play_id: String,
    pub token: String,
    pub transaction_code: TransactionCode,
    pub round_id: String,
    pub game_code: String,
    pub amount: Amount,
    pub bet_time: DateTime<Utc>,
}

/// Normalized settlement request. `win_amount` is None for loss
/// settlements that carry no pay block; the round is still marked settled.
#[derive(Debug, Clone)]
pub struct SettleRequest {
    pub play_id: String,
    pub token: String,
    pub transaction_code: TransactionCode,
    pub round_id: String,
    pub game_code: String,
    pub win_amount: Option<Amount>,
    pub settle_time: DateTime<Utc>,
}

/// Normalized refund request for a wagered, unsettled round.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub play_id: String,
    pub token: String,
    pub transaction_code: TransactionCode,
    pub round_id: String,
}

/// Normalized atomic wager+payout request. Either leg may be zero; a pure
/// win-only free-game round has a zero wager leg and carries the parent
/// round in `main_round_id`.
#[derive(Debug, Clone)]
pub struct CombinedRequest {
    pub play_id: String,
    pub token: String,
    pub transaction_code: TransactionCode,
    pub round_id: String,
    pub game_code: String,
    pub bet_amount: Amount,
    pub win_amount: Amount,
    pub bet_time: DateTime<Utc>,
    /// Parent round a free-game settlement depends on.
    pub main_round_id: Option<String>,
}

// Custom deserializer for Amount from wire-format decimal majors
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let major = f64::deserialize(deserializer)?;
    Amount::from_major(major)
        .map_err(|e| serde::de::Error::custom(format!("Invalid amount: {}", e)))
}

pub fn deserialize_opt_amount<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let major: Option<f64> = Option::deserialize(deserializer)?;
    major
        .map(|m| {
            Amount::from_major(m)
                .map_err(|e| serde::de::Error::custom(format!("Invalid amount: {}", e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deserialize_amount")]
        amount: Amount,
        #[serde(default, deserialize_with = "deserialize_opt_amount")]
        win: Option<Amount>,
    }

    #[test]
    fn test_amount_deserialization() {
        let probe: Probe = serde_json::from_str(r#"{"amount": 100.0, "win": 9.99}"#).unwrap();
        assert_eq!(probe.amount.as_minor(), 10_000);
        assert_eq!(probe.win.unwrap().as_minor(), 999);
    }

    #[test]
    fn test_missing_optional_amount() {
        let probe: Probe = serde_json::from_str(r#"{"amount": 1.0}"#).unwrap();
        assert!(probe.win.is_none());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"amount": -1.0}"#);
        assert!(result.is_err());
    }
}
