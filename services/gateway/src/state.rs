use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::config::StoreBackend;
use crate::credentials::{Credentials, StaticCredentialResolver};
use crate::engine::policy::ProviderPolicy;
use crate::engine::ReconciliationEngine;
use crate::provider_api::ProviderApi;
use crate::repository::{PlayerRepository, SessionRepository, TransactionRepository};
use crate::wallet::WalletGateway;

/// Store handles for one provider namespace.
#[derive(Clone)]
pub struct ProviderStores {
    pub players: Arc<dyn PlayerRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
}

/// One engine instance per provider integration, all sharing the wallet
/// client but each carrying its own policy, credentials and namespace.
pub struct Engines {
    pub gs5: Arc<ReconciliationEngine>,
    pub hg5: Arc<ReconciliationEngine>,
    pub pla: Arc<ReconciliationEngine>,
    pub pca: Arc<ReconciliationEngine>,
}

pub fn build_engine(
    policy: ProviderPolicy,
    wallet: Arc<dyn WalletGateway>,
    credentials: Vec<Credentials>,
    stores: ProviderStores,
) -> Arc<ReconciliationEngine> {
    Arc::new(ReconciliationEngine::new(
        policy,
        wallet,
        Arc::new(StaticCredentialResolver::new(credentials)),
        stores.players,
        stores.sessions,
        stores.transactions,
    ))
}

#[derive(Clone)]
pub struct AppState {
    pub engines: Arc<Engines>,
    pub provider_api: Arc<dyn ProviderApi>,
    pub store_backend: StoreBackend,
    pub redis: Option<ConnectionManager>,
}

impl AppState {
    pub fn new(
        engines: Engines,
        provider_api: Arc<dyn ProviderApi>,
        store_backend: StoreBackend,
        redis: Option<ConnectionManager>,
    ) -> Self {
        Self {
            engines: Arc::new(engines),
            provider_api,
            store_backend,
            redis,
        }
    }
}
