use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use shared::PLATFORM_UTC_OFFSET_SECS;

/// Audit report attached to every wallet mutation call.
///
/// The ledger requires bet times in the platform reference timezone, not in
/// whatever zone the provider stamped on the callback.
#[derive(Debug, Clone, Serialize)]
pub struct BetReport {
    pub transaction_id: String,
    pub round_id: String,
    pub game_code: String,
    pub bet_time: String,
}

pub struct ReportBuilder {
    offset: FixedOffset,
}

impl ReportBuilder {
    pub fn new() -> Self {
        let offset = FixedOffset::east_opt(PLATFORM_UTC_OFFSET_SECS)
            .expect("platform timezone offset in range");
        Self { offset }
    }

    pub fn build(
        &self,
        transaction_id: &str,
        round_id: &str,
        game_code: &str,
        bet_time: DateTime<Utc>,
    ) -> BetReport {
        let local = bet_time.with_timezone(&self.offset);
        BetReport {
            transaction_id: transaction_id.to_string(),
            round_id: round_id.to_string(),
            game_code: game_code.to_string(),
            bet_time: local.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bet_time_normalized_to_platform_zone() {
        let builder = ReportBuilder::new();
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 16, 30, 0).unwrap();

        let report = builder.build("wager-abc", "round-1", "slot-7", utc);

        // UTC 16:30 is 00:30 the next day at UTC+8
        assert_eq!(report.bet_time, "2024-03-02 00:30:00");
        assert_eq!(report.transaction_id, "wager-abc");
    }
}
