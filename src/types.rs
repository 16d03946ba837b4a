use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::QueryError;

/// Body of `POST /completion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub stream: bool,
    pub stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_predict: Option<u32>,
}

/// What came back from the server, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub content: String,
    pub server_payload: Option<Value>,
}

impl RawResponse {
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            server_payload: None,
        }
    }

    /// A missing `content` field reads as empty; a non-string one is rejected.
    pub fn from_payload(payload: Value) -> anyhow::Result<Self> {
        let content = match payload.get("content") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(QueryError::InvalidPayload {
                    message: format!("`content` must be a string, got {other}"),
                }
                .into())
            }
        };
        Ok(Self {
            content,
            server_payload: Some(payload),
        })
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
