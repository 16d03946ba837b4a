use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::QueryError;
use crate::providers::CompletionProvider;
use crate::types::{CompletionRequest, RawResponse};

const MOCK_ENDPOINT: &str = "mock://llama-server";

#[derive(Debug, Clone)]
enum MockReply {
    Payload(Value),
    ContentOnly(String),
    Fail(QueryError),
}

/// Canned server for tests. Records every request it receives.
#[derive(Debug)]
pub struct MockProvider {
    reply: MockReply,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Replies with a full server payload, so server-reported counts apply.
    pub fn with_payload(payload: Value) -> Self {
        Self::new(MockReply::Payload(payload))
    }

    /// Replies with content and no payload, so counts are estimated.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new(MockReply::ContentOnly(content.into()))
    }

    pub fn failing(err: QueryError) -> Self {
        Self::new(MockReply::Fail(err))
    }

    fn new(reply: MockReply) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<RawResponse> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(req);
        }
        match &self.reply {
            MockReply::Payload(payload) => RawResponse::from_payload(payload.clone()),
            MockReply::ContentOnly(content) => Ok(RawResponse::from_content(content.clone())),
            MockReply::Fail(err) => Err(err.clone().into()),
        }
    }

    async fn health(&self) -> anyhow::Result<()> {
        match &self.reply {
            MockReply::Fail(err) => Err(err.clone().into()),
            _ => Ok(()),
        }
    }

    fn endpoint(&self) -> String {
        MOCK_ENDPOINT.to_string()
    }
}
