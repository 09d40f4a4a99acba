//! Redis-backed store.
//!
//! One JSON document per record. The transaction insert goes through
//! `SET NX`, which is what makes the idempotency check race-safe: of two
//! concurrent duplicates, exactly one observes a successful insert.

mod keys;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{Player, Session, Transaction, TransactionKind};

use super::{PlayerRepository, SessionRepository, StoreError, TransactionRepository};
use keys::*;

pub struct RedisStore {
    redis: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    pub fn new(redis: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            redis,
            namespace: namespace.into(),
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = conn.get(key).await?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", key, e)))
        })
        .transpose()
    }

    fn encode<T: Serialize>(&self, key: &str, value: &T) -> Result<String, StoreError> {
        serde_json::to_string(value)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", key, e)))
    }
}

#[async_trait]
impl PlayerRepository for RedisStore {
    async fn get_by_play_id(&self, play_id: &str) -> Result<Option<Player>, StoreError> {
        self.load(&player_key(&self.namespace, play_id)).await
    }

    async fn create(&self, player: &Player) -> Result<(), StoreError> {
        let key = player_key(&self.namespace, &player.play_id);
        let json = self.encode(&key, player)?;
        let mut conn = self.redis.clone();
        // Players are immutable; first write wins, a concurrent duplicate
        // launch is harmless.
        let _: bool = conn.set_nx(&key, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for RedisStore {
    async fn get(&self, play_id: &str) -> Result<Option<Session>, StoreError> {
        self.load(&session_key(&self.namespace, play_id)).await
    }

    async fn put(&self, session: &Session) -> Result<(), StoreError> {
        let key = session_key(&self.namespace, &session.play_id);
        let json = self.encode(&key, session)?;
        let mut conn = self.redis.clone();
        let _: () = conn.set(&key, json).await?;
        Ok(())
    }

    async fn invalidate(&self, play_id: &str) -> Result<(), StoreError> {
        let key = session_key(&self.namespace, play_id);
        let Some(mut session) = self.load::<Session>(&key).await? else {
            return Ok(());
        };
        session.expired = true;
        let json = self.encode(&key, &session)?;
        let mut conn = self.redis.clone();
        let _: () = conn.set(&key, json).await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for RedisStore {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        self.load(&transaction_key(&self.namespace, external_id))
            .await
    }

    async fn find_wager_by_round(
        &self,
        round_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut conn = self.redis.clone();
        let ext_id: Option<String> = conn
            .get(round_wager_key(&self.namespace, round_id))
            .await?;
        match ext_id {
            Some(ext_id) => self.find_by_external_id(&ext_id).await,
            None => Ok(None),
        }
    }

    async fn create(&self, txn: &Transaction) -> Result<bool, StoreError> {
        let key = transaction_key(&self.namespace, &txn.external_id);
        let json = self.encode(&key, txn)?;
        let mut conn = self.redis.clone();

        let created: bool = conn.set_nx(&key, json).await?;
        if !created {
            return Ok(false);
        }

        if matches!(
            txn.kind,
            TransactionKind::Wager | TransactionKind::WagerPayout
        ) {
            let _: bool = conn
                .set_nx(
                    round_wager_key(&self.namespace, &txn.round_id),
                    txn.external_id.clone(),
                )
                .await?;
        }

        Ok(true)
    }
}
