pub mod gs5;
pub mod health;
pub mod hg5;
pub mod metrics;
pub mod pca;
pub mod pla;

use chrono::{DateTime, Utc};

/// Bet timestamps arrive as optional RFC 3339 strings in provider payloads;
/// an absent or unparseable value falls back to the receive time.
pub(crate) fn parse_bet_time(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_bet_time_rfc3339() {
        let parsed = parse_bet_time(Some("2024-03-01T16:30:00+08:00"));
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_bet_time_fallback() {
        let before = Utc::now();
        let parsed = parse_bet_time(Some("not-a-date"));
        assert!(parsed >= before);
        assert!(parse_bet_time(None) >= before);
    }
}
