use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::style::{StyleRole, Styler};

/// Text-to-token estimate used when the server reports no counts.
pub trait TokenEstimator {
    fn estimate(&self, text: &str) -> usize;
}

/// Approximation: roughly 1.3 tokens per whitespace-separated word. Never exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordHeuristicEstimator;

impl TokenEstimator for WordHeuristicEstimator {
    fn estimate(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        (words as f64 * 1.3).floor() as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountingError {
    InvalidPayload { message: String },
    ExpectedJsonObject,
}

impl fmt::Display for AccountingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayload { message } => write!(f, "invalid usage fields: {message}"),
            Self::ExpectedJsonObject => write!(f, "server payload is not a JSON object"),
        }
    }
}

impl std::error::Error for AccountingError {}

#[derive(Debug, Clone, Default, Deserialize)]
struct UsageFields {
    #[serde(default)]
    tokens_evaluated: Option<u64>,
    #[serde(default)]
    tokens_predicted: Option<u64>,
    #[serde(default)]
    timings: Option<TimingFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TimingFields {
    #[serde(default)]
    prompt_ms: Option<f64>,
    #[serde(default)]
    predicted_ms: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    Server,
    Estimated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccounting {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub thinking_tokens: u64,
    pub answer_tokens: u64,
    pub total_tokens: u64,
    pub prompt_seconds: f64,
    pub generation_seconds: f64,
    pub tokens_per_second: f64,
    pub source: CountSource,
}

/// What the accountant needs to know about one rendered response.
#[derive(Debug, Clone, Copy)]
pub struct UsageInputs<'a> {
    pub payload: Option<&'a Value>,
    pub prompt: &'a str,
    pub thinking_text: &'a str,
    pub answer_text: &'a str,
    pub has_thinking: bool,
    pub thinking_shown: bool,
}

pub fn compute_accounting(
    inputs: UsageInputs<'_>,
    estimator: &dyn TokenEstimator,
) -> Result<TokenAccounting, AccountingError> {
    match inputs.payload {
        Some(payload) => from_server_payload(payload, &inputs),
        None => Ok(estimate_from_text(&inputs, estimator)),
    }
}

fn from_server_payload(
    payload: &Value,
    inputs: &UsageInputs<'_>,
) -> Result<TokenAccounting, AccountingError> {
    if !payload.is_object() {
        return Err(AccountingError::ExpectedJsonObject);
    }
    let usage: UsageFields =
        serde_json::from_value(payload.clone()).map_err(|e| AccountingError::InvalidPayload {
            message: e.to_string(),
        })?;
    let prompt_tokens = usage.tokens_evaluated.unwrap_or(0);
    let completion_tokens = usage.tokens_predicted.unwrap_or(0);

    let (thinking_tokens, answer_tokens) = if inputs.has_thinking && inputs.thinking_shown {
        let thinking_len = inputs.thinking_text.chars().count() as f64;
        let answer_len = inputs.answer_text.chars().count() as f64;
        let ratio = thinking_len / (thinking_len + answer_len + 1.0);
        let thinking = (completion_tokens as f64 * ratio).floor() as u64;
        (thinking, completion_tokens - thinking)
    } else {
        (0, completion_tokens)
    };

    let timings = usage.timings.unwrap_or_default();
    let prompt_seconds = timings.prompt_ms.unwrap_or(0.0) / 1000.0;
    let generation_seconds = timings.predicted_ms.unwrap_or(0.0) / 1000.0;
    let tokens_per_second = if generation_seconds > 0.0 {
        completion_tokens as f64 / generation_seconds
    } else {
        0.0
    };

    Ok(TokenAccounting {
        prompt_tokens,
        completion_tokens,
        thinking_tokens,
        answer_tokens,
        total_tokens: prompt_tokens.saturating_add(completion_tokens),
        prompt_seconds,
        generation_seconds,
        tokens_per_second,
        source: CountSource::Server,
    })
}

fn estimate_from_text(inputs: &UsageInputs<'_>, estimator: &dyn TokenEstimator) -> TokenAccounting {
    let prompt_tokens = estimator.estimate(inputs.prompt) as u64;
    let thinking_tokens = if inputs.has_thinking {
        estimator.estimate(inputs.thinking_text) as u64
    } else {
        0
    };
    let answer_tokens = estimator.estimate(inputs.answer_text) as u64;
    TokenAccounting {
        prompt_tokens,
        completion_tokens: thinking_tokens.saturating_add(answer_tokens),
        thinking_tokens,
        answer_tokens,
        total_tokens: prompt_tokens
            .saturating_add(thinking_tokens)
            .saturating_add(answer_tokens),
        prompt_seconds: 0.0,
        generation_seconds: 0.0,
        tokens_per_second: 0.0,
        source: CountSource::Estimated,
    }
}

impl TokenAccounting {
    pub fn report_lines(&self, show_thinking_line: bool, styler: &dyn Styler) -> Vec<String> {
        let bold = |v: String| styler.paint(StyleRole::Emphasis, &v);
        let mut lines = vec![styler.paint(StyleRole::Heading, "══════ Token Counts ══════")];
        lines.push(format!("Prompt tokens: {}", bold(self.prompt_tokens.to_string())));
        if show_thinking_line {
            lines.push(format!(
                "Thinking tokens: {}",
                bold(self.thinking_tokens.to_string())
            ));
        }
        lines.push(format!("Answer tokens: {}", bold(self.answer_tokens.to_string())));
        lines.push(format!("Total tokens: {}", bold(self.total_tokens.to_string())));
        if self.generation_seconds > 0.0 {
            lines.push(format!(
                "Generation time: {} seconds",
                bold(format!("{:.2}", self.generation_seconds))
            ));
            lines.push(format!(
                "Tokens per second: {}",
                bold(format!("{:.2}", self.tokens_per_second))
            ));
        }
        lines
    }
}

pub fn accounting_failure_line(err: &AccountingError, styler: &dyn Styler) -> String {
    styler.paint(
        StyleRole::Warning,
        &format!("[Note: Token counting failed: {err}]"),
    )
}
