use serde::Deserialize;
use std::env;

use crate::credentials::Credentials;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_port: u16,
    pub metrics_port: u16,
    pub store: StoreConfig,
    pub wallet: WalletConfig,
    pub provider_api_timeout_ms: u64,
    pub credentials: ProviderCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub redis_url: String,
}

#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Credential bundles per provider, keyed by currency inside each list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderCredentials {
    #[serde(default)]
    pub gs5: Vec<Credentials>,
    #[serde(default)]
    pub hg5: Vec<Credentials>,
    #[serde(default)]
    pub pla: Vec<Credentials>,
    #[serde(default)]
    pub pca: Vec<Credentials>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "redis".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            _ => StoreBackend::Redis,
        };

        let credentials = match env::var("CREDENTIALS_FILE") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)?;
                serde_json::from_str(&raw)?
            }
            Err(_) => ProviderCredentials::default(),
        };

        Ok(Config {
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()?,
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()?,
            store: StoreConfig {
                backend,
                redis_url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            wallet: WalletConfig {
                base_url: env::var("WALLET_BASE_URL")
                    .expect("WALLET_BASE_URL must be set"),
                timeout_ms: env::var("WALLET_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()?,
            },
            provider_api_timeout_ms: env::var("PROVIDER_API_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            credentials,
        })
    }
}
