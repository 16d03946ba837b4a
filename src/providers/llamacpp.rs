use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::{short_error, QueryError};
use crate::providers::CompletionProvider;
use crate::types::{CompletionRequest, RawResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 60_000,
        }
    }
}

/// llama.cpp `llama-server` native completion endpoint.
#[derive(Debug, Clone)]
pub struct LlamaCppProvider {
    client: Client,
    base_url: String,
    request_timeout_ms: u64,
}

impl LlamaCppProvider {
    pub fn new(http: HttpConfig) -> anyhow::Result<Self> {
        let mut builder =
            Client::builder().connect_timeout(Duration::from_millis(http.connect_timeout_ms));
        if http.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(http.request_timeout_ms));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: http.base_url.trim_end_matches('/').to_string(),
            request_timeout_ms: http.request_timeout_ms,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> anyhow::Error {
        if e.is_timeout() {
            QueryError::Timeout {
                timeout_ms: self.request_timeout_ms,
            }
            .into()
        } else {
            QueryError::Transport {
                message: short_error(&e.to_string()),
            }
            .into()
        }
    }
}

#[async_trait]
impl CompletionProvider for LlamaCppProvider {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<RawResponse> {
        let url = format!("{}/completion", self.base_url);
        info!(%url, n_predict = ?req.n_predict, "sending completion request");
        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let status = resp.status();
        debug!(status = status.as_u16(), "completion response");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QueryError::HttpStatus {
                status: status.as_u16(),
                body: short_error(&body),
            }
            .into());
        }
        let payload: Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                QueryError::InvalidPayload {
                    message: short_error(&e.to_string()),
                }
                .into()
            }
        })?;
        let raw = RawResponse::from_payload(payload)?;
        debug!(content_chars = raw.content.chars().count(), "completion payload");
        Ok(raw)
    }

    async fn health(&self) -> anyhow::Result<()> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QueryError::HttpStatus {
                status: status.as_u16(),
                body: short_error(&body),
            }
            .into());
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        self.base_url.clone()
    }
}
