use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli_args::Cli;
use crate::markers::default_stop_sequences;
use crate::pipeline::{RenderOptions, DEFAULT_WIDTH};
use crate::providers::llamacpp::{HttpConfig, DEFAULT_BASE_URL};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Thinking needs room; smaller requested limits are raised to this.
pub const THINKING_TOKEN_FLOOR: u32 = 512;

/// Defaults read from `--config`. Command-line values take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub width: Option<usize>,
    pub temperature: Option<f64>,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
    pub system: Option<String>,
}

pub fn load_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    match serde_json::from_slice::<ConfigFile>(&bytes) {
        Ok(c) => Ok(c),
        Err(_) => serde_yaml::from_slice::<ConfigFile>(&bytes)
            .with_context(|| format!("invalid config file {}", path.display())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_tokens: Option<u32>,
    pub stop: Vec<String>,
    pub http: HttpConfig,
    pub render: RenderOptions,
    pub use_color: bool,
    pub raw: bool,
    pub json: bool,
}

pub fn resolve_config(cli: &Cli, file: Option<ConfigFile>) -> QueryConfig {
    let file = file.unwrap_or_default();
    let max_tokens = cli.tokens.map(|n| {
        if cli.think && n < THINKING_TOKEN_FLOOR {
            THINKING_TOKEN_FLOOR
        } else {
            n
        }
    });
    let timeout_secs = cli
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    QueryConfig {
        prompt: cli.prompt_text(),
        system: cli.system.clone().or(file.system),
        temperature: cli
            .temperature
            .or(file.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        top_k: cli.top_k.or(file.top_k).unwrap_or(DEFAULT_TOP_K),
        top_p: cli.top_p.or(file.top_p).unwrap_or(DEFAULT_TOP_P),
        max_tokens,
        stop: default_stop_sequences(),
        http: HttpConfig {
            base_url: cli
                .url
                .clone()
                .or(file.url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout_ms: timeout_secs.saturating_mul(1000),
            ..HttpConfig::default()
        },
        render: RenderOptions {
            width: cli.width.or(file.width).unwrap_or(DEFAULT_WIDTH).max(1),
            show_thinking: cli.think,
            show_counts: cli.counts,
            clean: cli.clean,
            token_limit: max_tokens.map(|n| n as usize),
        },
        use_color: !cli.no_color,
        raw: cli.raw,
        json: cli.json,
    }
}
