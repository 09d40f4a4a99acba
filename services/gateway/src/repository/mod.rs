//! Keyed stores for players, sessions and the transaction log.
//!
//! The transaction log is the idempotency backbone: `create` has
//! insert-if-absent semantics, and two concurrent requests for the same
//! external id must not both observe a successful insert.

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;

use crate::domain::{Player, Session, Transaction};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn get_by_play_id(&self, play_id: &str) -> Result<Option<Player>, StoreError>;
    async fn create(&self, player: &Player) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Latest session for the player, expired or not.
    async fn get(&self, play_id: &str) -> Result<Option<Session>, StoreError>;
    /// Store a fresh session; overwrites any previous one (latest token wins).
    async fn put(&self, session: &Session) -> Result<(), StoreError>;
    /// Mark the player's session expired. The record stays on file.
    async fn invalidate(&self, play_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Transaction>, StoreError>;

    /// The wager row of a round, if one was recorded.
    async fn find_wager_by_round(&self, round_id: &str)
        -> Result<Option<Transaction>, StoreError>;

    /// Insert-if-absent. Returns false when the external id was already on
    /// file, in which case nothing is written.
    async fn create(&self, txn: &Transaction) -> Result<bool, StoreError>;
}
