use std::fmt;

/// Failures that end a query. Carried inside `anyhow::Error` and recovered
/// with `downcast_ref` where the caller needs to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    Transport { message: String },
    Timeout { timeout_ms: u64 },
    HttpStatus { status: u16, body: String },
    InvalidPayload { message: String },
    EmptyContent,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "request to llama-server failed: {message}"),
            Self::Timeout { timeout_ms } => {
                write!(f, "llama-server did not answer within {}s", timeout_ms / 1000)
            }
            Self::HttpStatus { status, body } => {
                write!(f, "llama-server returned HTTP {status}: {body}")
            }
            Self::InvalidPayload { message } => {
                write!(f, "llama-server returned an unreadable payload: {message}")
            }
            Self::EmptyContent => write!(f, "Received empty response from server."),
        }
    }
}

impl std::error::Error for QueryError {}

pub(crate) fn short_error(s: &str) -> String {
    s.chars().take(200).collect()
}
