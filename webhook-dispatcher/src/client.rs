use crate::error::{Result, WebhookError};
use async_trait::async_trait;
use std::time::Duration;

/// Injected delivery transport, same shape as `auth-identity::SmsGateway` —
/// lets the retry/backoff logic be tested without a live network call.
#[async_trait]
pub trait HttpDeliverer: Send + Sync {
    async fn post(&self, url: &str, body: Vec<u8>, signature: &str, timeout: Duration) -> Result<u16>;
}

pub struct ReqwestDeliverer {
    client: reqwest::Client,
}

impl ReqwestDeliverer {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for ReqwestDeliverer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpDeliverer for ReqwestDeliverer {
    async fn post(&self, url: &str, body: Vec<u8>, signature: &str, timeout: Duration) -> Result<u16> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Form-Signature", signature)
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| WebhookError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}
