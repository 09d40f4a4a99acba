//! Outbound client for provider platform APIs (launch URLs, bet visuals).
//!
//! Thin wrapper; the interesting logic lives in the engine. Malformed or
//! failed upstream responses surface as ThirdPartyApi.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::errors::{EngineError, Result};

#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Ask the provider for a game-launch URL bound to the session token.
    async fn launch_url(
        &self,
        creds: &Credentials,
        play_id: &str,
        token: &str,
        game_code: &str,
        lang: &str,
    ) -> Result<String>;

    /// Ask the provider for the visual/detail URL of a settled bet.
    async fn visual_url(&self, creds: &Credentials, transaction_code: &str) -> Result<String>;
}

pub struct HttpProviderApi {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UrlReply {
    url: String,
}

impl HttpProviderApi {
    pub fn new(timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { client })
    }

    async fn post_for_url(&self, url: &str, body: serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::ThirdPartyApi(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(EngineError::ThirdPartyApi(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let reply: UrlReply = response
            .json()
            .await
            .map_err(|e| EngineError::ThirdPartyApi(format!("{} body: {}", url, e)))?;

        Ok(reply.url)
    }
}

#[async_trait]
impl ProviderApi for HttpProviderApi {
    async fn launch_url(
        &self,
        creds: &Credentials,
        play_id: &str,
        token: &str,
        game_code: &str,
        lang: &str,
    ) -> Result<String> {
        let url = format!("{}/launch", creds.api_url.trim_end_matches('/'));
        self.post_for_url(
            &url,
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "play_id": play_id,
                "token": token,
                "game_code": game_code,
                "lang": lang,
            }),
        )
        .await
    }

    async fn visual_url(&self, creds: &Credentials, transaction_code: &str) -> Result<String> {
        let url = format!("{}/visual", creds.api_url.trim_end_matches('/'));
        self.post_for_url(
            &url,
            json!({
                "kiosk": creds.kiosk,
                "api_key": creds.api_key,
                "transaction_code": transaction_code,
            }),
        )
        .await
    }
}
