//! Key builders for the Redis store.
//!
//! Every key carries the provider namespace so the four integrations can
//! share one Redis database without id collisions.

pub fn player_key(ns: &str, play_id: &str) -> String {
    format!("{}:player:{}", ns, play_id)
}

pub fn session_key(ns: &str, play_id: &str) -> String {
    format!("{}:session:{}", ns, play_id)
}

pub fn transaction_key(ns: &str, external_id: &str) -> String {
    format!("{}:txn:{}", ns, external_id)
}

pub fn round_wager_key(ns: &str, round_id: &str) -> String {
    format!("{}:round:{}:wager", ns, round_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(player_key("gs5", "p1"), "gs5:player:p1");
        assert_eq!(transaction_key("hg5", "wagerPayout-9"), "hg5:txn:wagerPayout-9");
        assert_eq!(round_wager_key("pla", "r1"), "pla:round:r1:wager");
    }
}
