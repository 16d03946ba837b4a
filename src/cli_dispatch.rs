use tracing::info;

use crate::accounting::WordHeuristicEstimator;
use crate::cli_args::Cli;
use crate::config::{load_config_file, resolve_config, QueryConfig};
use crate::errors::QueryError;
use crate::markers::{build_chat_prompt, strip_chat_markers};
use crate::pipeline::render_document;
use crate::providers::llamacpp::LlamaCppProvider;
use crate::providers::CompletionProvider;
use crate::spinner::with_spinner;
use crate::style::styler_for;
use crate::types::CompletionRequest;

pub fn build_request(cfg: &QueryConfig) -> CompletionRequest {
    CompletionRequest {
        prompt: build_chat_prompt(
            &cfg.prompt,
            cfg.system.as_deref(),
            cfg.render.show_thinking,
        ),
        temperature: cfg.temperature,
        top_k: cfg.top_k,
        top_p: cfg.top_p,
        stream: false,
        stop: cfg.stop.clone(),
        n_predict: cfg.max_tokens,
    }
}

/// One query against `provider`, returning exactly what goes to stdout.
pub async fn execute_query(
    provider: &dyn CompletionProvider,
    cfg: &QueryConfig,
) -> anyhow::Result<String> {
    let req = build_request(cfg);
    let raw = with_spinner("Waiting for llama-server...", provider.complete(req)).await?;
    if raw.is_blank() {
        return Err(QueryError::EmptyContent.into());
    }
    if cfg.json {
        let payload = raw
            .server_payload
            .clone()
            .unwrap_or_else(|| serde_json::json!({ "content": raw.content }));
        return Ok(serde_json::to_string_pretty(&payload)?);
    }
    if cfg.raw {
        return Ok(strip_chat_markers(&raw.content));
    }
    let styler = styler_for(cfg.use_color);
    let doc = render_document(
        &raw,
        &cfg.prompt,
        &cfg.render,
        styler.as_ref(),
        &WordHeuristicEstimator,
    );
    Ok(doc.render())
}

pub async fn check_server(provider: &dyn CompletionProvider) -> anyhow::Result<String> {
    provider.health().await?;
    Ok(format!("OK: llama-server reachable at {}", provider.endpoint()))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let file = match &cli.config {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };
    let cfg = resolve_config(&cli, file);
    info!(url = %cfg.http.base_url, "resolved configuration");
    let provider = LlamaCppProvider::new(cfg.http.clone())?;
    let output = if cli.check {
        check_server(&provider).await?
    } else {
        execute_query(&provider, &cfg).await?
    };
    println!("{output}");
    Ok(())
}
