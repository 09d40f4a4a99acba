//! In-memory store backend.
//!
//! Selected with `STORE_BACKEND=memory`; also what the test suites run
//! against. Same contracts as the Redis backend, including the
//! insert-if-absent guarantee on the transaction log.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{Player, Session, Transaction, TransactionKind};

use super::{PlayerRepository, SessionRepository, StoreError, TransactionRepository};

#[derive(Default)]
struct Inner {
    players: HashMap<String, Player>,
    sessions: HashMap<String, Session>,
    transactions: HashMap<String, Transaction>,
    // round_id -> external_id of the round's wager (or combined) row
    wager_rounds: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; propagating the
        // inner state is still sound for these read/insert maps.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl PlayerRepository for MemoryStore {
    async fn get_by_play_id(&self, play_id: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.lock().players.get(play_id).cloned())
    }

    async fn create(&self, player: &Player) -> Result<(), StoreError> {
        self.lock()
            .players
            .entry(player.play_id.clone())
            .or_insert_with(|| player.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn get(&self, play_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.lock().sessions.get(play_id).cloned())
    }

    async fn put(&self, session: &Session) -> Result<(), StoreError> {
        self.lock()
            .sessions
            .insert(session.play_id.clone(), session.clone());
        Ok(())
    }

    async fn invalidate(&self, play_id: &str) -> Result<(), StoreError> {
        if let Some(session) = self.lock().sessions.get_mut(play_id) {
            session.expired = true;
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.lock().transactions.get(external_id).cloned())
    }

    async fn find_wager_by_round(
        &self,
        round_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .wager_rounds
            .get(round_id)
            .and_then(|ext_id| inner.transactions.get(ext_id))
            .cloned())
    }

    async fn create(&self, txn: &Transaction) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        if inner.transactions.contains_key(&txn.external_id) {
            return Ok(false);
        }
        if matches!(
            txn.kind,
            TransactionKind::Wager | TransactionKind::WagerPayout
        ) {
            inner
                .wager_rounds
                .entry(txn.round_id.clone())
                .or_insert_with(|| txn.external_id.clone());
        }
        inner
            .transactions
            .insert(txn.external_id.clone(), txn.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::Amount;

    fn txn(external_id: &str, round_id: &str, kind: TransactionKind) -> Transaction {
        Transaction {
            external_id: external_id.to_string(),
            round_id: round_id.to_string(),
            kind,
            play_id: "p1".to_string(),
            bet_amount: Amount::new_unchecked(100),
            win_amount: Amount::ZERO,
            ref_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_is_insert_if_absent() {
        let store = MemoryStore::new();
        let t = txn("wager-1", "r1", TransactionKind::Wager);

        assert!(TransactionRepository::create(&store, &t).await.unwrap());
        assert!(!TransactionRepository::create(&store, &t).await.unwrap());

        let found = store.find_by_external_id("wager-1").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_round_index_points_at_wager_row() {
        let store = MemoryStore::new();
        TransactionRepository::create(&store, &txn("wager-1", "r1", TransactionKind::Wager))
            .await
            .unwrap();
        TransactionRepository::create(&store, &txn("payout-1", "r1", TransactionKind::Settle))
            .await
            .unwrap();

        let wager = store.find_wager_by_round("r1").await.unwrap().unwrap();
        assert_eq!(wager.external_id, "wager-1");
    }

    #[tokio::test]
    async fn test_session_invalidation_keeps_record() {
        let store = MemoryStore::new();
        let session = Session {
            play_id: "p1".to_string(),
            token: "tok".to_string(),
            game_code: "g".to_string(),
            expired: false,
            created_at: Utc::now(),
        };
        store.put(&session).await.unwrap();
        store.invalidate("p1").await.unwrap();

        let loaded = store.get("p1").await.unwrap().unwrap();
        assert!(loaded.expired);
        assert_eq!(loaded.token, "tok");
    }
}
