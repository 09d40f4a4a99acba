use serde::{Deserialize, Serialize};
use shared::Amount;
use std::collections::HashMap;

use crate::errors::{EngineError, Result};

/// Currency-scoped provider configuration bundle.
///
/// Resolved once per request and treated as opaque by the engine; only the
/// wallet client and the provider API client look inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub currency: String,
    pub kiosk: String,
    pub api_key: String,
    pub api_url: String,
    #[serde(default)]
    pub bet_limit: Option<Amount>,
}

/// Maps a currency code to provider credentials.
pub trait CredentialResolver: Send + Sync {
    fn by_currency(&self, currency: &str) -> Result<Credentials>;
}

/// Config-backed resolver holding the credential bundles for one provider.
pub struct StaticCredentialResolver {
    entries: HashMap<String, Credentials>,
}

impl StaticCredentialResolver {
    pub fn new(entries: Vec<Credentials>) -> Self {
        let entries = entries
            .into_iter()
            .map(|c| (c.currency.clone(), c))
            .collect();
        Self { entries }
    }
}

impl CredentialResolver for StaticCredentialResolver {
    fn by_currency(&self, currency: &str) -> Result<Credentials> {
        self.entries
            .get(currency)
            .cloned()
            .ok_or_else(|| EngineError::InvalidAgent(currency.to_string()))
    }
}
