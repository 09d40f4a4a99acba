/// Common test utilities and fixtures for integration tests
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use shared::Amount;
use std::sync::{Arc, Mutex};

use gateway::credentials::Credentials;
use gateway::engine::policy::ProviderPolicy;
use gateway::errors::Result;
use gateway::provider_api::ProviderApi;
use gateway::reports::BetReport;
use gateway::repository::MemoryStore;
use gateway::state::{build_engine, AppState, Engines, ProviderStores};
use gateway::wallet::{WalletGateway, WalletReply};

/// Scripted ledger double shared by every engine in the fixture. Tracks a
/// single balance, logs every mutating call, and can be told to reject the
/// next mutation with a given status code.
pub struct TestWallet {
    credit: Mutex<i64>,
    fail_next: Mutex<Option<i64>>,
    calls: Mutex<Vec<String>>,
}

impl TestWallet {
    pub fn new(credit_minor: i64) -> Self {
        Self {
            credit: Mutex::new(credit_minor),
            fail_next: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_next(&self, status: i64) {
        *self.fail_next.lock().unwrap() = Some(status);
    }

    pub fn credit_minor(&self) -> i64 {
        *self.credit.lock().unwrap()
    }

    pub fn calls_named(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(op))
            .count()
    }

    fn mutate(&self, op: String, delta_minor: i64) -> WalletReply {
        self.calls.lock().unwrap().push(op);
        if let Some(status) = self.fail_next.lock().unwrap().take() {
            return WalletReply {
                status,
                credit: Amount::ZERO,
            };
        }
        let mut credit = self.credit.lock().unwrap();
        *credit += delta_minor;
        WalletReply {
            status: shared::WALLET_STATUS_OK,
            credit: Amount::new_unchecked(*credit),
        }
    }
}

#[async_trait]
impl WalletGateway for TestWallet {
    async fn balance(&self, _creds: &Credentials, _play_id: &str) -> Result<WalletReply> {
        Ok(WalletReply {
            status: shared::WALLET_STATUS_OK,
            credit: Amount::new_unchecked(*self.credit.lock().unwrap()),
        })
    }

    async fn wager(
        &self,
        _creds: &Credentials,
        _play_id: &str,
        _currency: &str,
        transaction_id: &str,
        amount: Amount,
        _report: &BetReport,
    ) -> Result<WalletReply> {
        Ok(self.mutate(format!("wager:{}", transaction_id), -amount.as_minor()))
    }

    async fn payout(
        &self,
        _creds: &Credentials,
        _play_id: &str,
        _currency: &str,
        transaction_id: &str,
        amount: Amount,
        _report: &BetReport,
    ) -> Result<WalletReply> {
        Ok(self.mutate(format!("payout:{}", transaction_id), amount.as_minor()))
    }

    async fn wager_and_payout(
        &self,
        _creds: &Credentials,
        _play_id: &str,
        _currency: &str,
        _wager_transaction_id: &str,
        wager_amount: Amount,
        payout_transaction_id: &str,
        payout_amount: Amount,
        _report: &BetReport,
    ) -> Result<WalletReply> {
        Ok(self.mutate(
            format!("wager_and_payout:{}", payout_transaction_id),
            payout_amount.as_minor() - wager_amount.as_minor(),
        ))
    }

    async fn cancel(
        &self,
        _creds: &Credentials,
        _play_id: &str,
        _currency: &str,
        transaction_id: &str,
        amount: Amount,
        _bet_id: &str,
    ) -> Result<WalletReply> {
        Ok(self.mutate(format!("cancel:{}", transaction_id), amount.as_minor()))
    }

    async fn resettle(
        &self,
        _creds: &Credentials,
        _play_id: &str,
        _currency: &str,
        transaction_id: &str,
        amount: Amount,
        _bet_id: &str,
        _settled_transaction_id: Option<&str>,
        _bet_time: DateTime<Utc>,
    ) -> Result<WalletReply> {
        Ok(self.mutate(format!("resettle:{}", transaction_id), amount.as_minor()))
    }
}

/// Provider platform double returning deterministic URLs.
struct StubProviderApi;

#[async_trait]
impl ProviderApi for StubProviderApi {
    async fn launch_url(
        &self,
        _creds: &Credentials,
        play_id: &str,
        _token: &str,
        game_code: &str,
        _lang: &str,
    ) -> Result<String> {
        Ok(format!("https://games.test/launch/{}/{}", play_id, game_code))
    }

    async fn visual_url(&self, _creds: &Credentials, transaction_code: &str) -> Result<String> {
        Ok(format!("https://games.test/visual/{}", transaction_code))
    }
}

fn test_credentials() -> Vec<Credentials> {
    vec![Credentials {
        currency: "THB".to_string(),
        kiosk: "kiosk-1".to_string(),
        api_key: "test-key".to_string(),
        api_url: "https://provider.test".to_string(),
        bet_limit: None,
    }]
}

/// Full-stack fixture: in-memory stores, scripted wallet, stub provider
/// API, real router.
pub struct TestContext {
    pub server: TestServer,
    pub wallet: Arc<TestWallet>,
}

impl TestContext {
    pub fn new(credit_minor: i64) -> Self {
        let wallet = Arc::new(TestWallet::new(credit_minor));

        let stores = || {
            let store = Arc::new(MemoryStore::new());
            ProviderStores {
                players: store.clone(),
                sessions: store.clone(),
                transactions: store,
            }
        };

        let engines = Engines {
            gs5: build_engine(
                ProviderPolicy::gs5(),
                wallet.clone(),
                test_credentials(),
                stores(),
            ),
            hg5: build_engine(
                ProviderPolicy::hg5(),
                wallet.clone(),
                test_credentials(),
                stores(),
            ),
            pla: build_engine(
                ProviderPolicy::pla(),
                wallet.clone(),
                test_credentials(),
                stores(),
            ),
            pca: build_engine(
                ProviderPolicy::pca(),
                wallet.clone(),
                test_credentials(),
                stores(),
            ),
        };

        let state = AppState::new(
            engines,
            Arc::new(StubProviderApi),
            gateway::config::StoreBackend::Memory,
            None,
        );

        let server = TestServer::new(gateway::build_router(state)).expect("test server");
        Self { server, wallet }
    }

    /// Launch a game for the player on a provider surface and return the
    /// session token the later callbacks must present.
    pub async fn launch(&self, provider: &str, play_id: &str) -> String {
        let (path, payload) = match provider {
            "gs5" => (
                "/api/gs5/launch".to_string(),
                json!({
                    "playerId": play_id,
                    "username": play_id,
                    "currency": "THB",
                    "gameCode": "slot-7",
                }),
            ),
            "hg5" => (
                "/api/hg5/launch".to_string(),
                json!({
                    "playId": play_id,
                    "username": play_id,
                    "currency": "THB",
                    "gameCode": "slot-7",
                }),
            ),
            "pca" => (
                "/api/pca/login".to_string(),
                json!({
                    "play_id": play_id,
                    "username": play_id,
                    "currency": "THB",
                    "game_code": "slot-7",
                }),
            ),
            _ => (
                format!("/api/{}/launch", provider),
                json!({
                    "play_id": play_id,
                    "username": play_id,
                    "currency": "THB",
                    "game_code": "slot-7",
                }),
            ),
        };
        let body: Value = self.server.post(&path).json(&payload).await.json();
        body["token"]
            .as_str()
            .unwrap_or_else(|| panic!("no token in launch reply: {}", body))
            .to_string()
    }
}
