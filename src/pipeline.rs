use std::fmt;

use tracing::{debug, warn};

use crate::accounting::{accounting_failure_line, compute_accounting, TokenEstimator, UsageInputs};
use crate::code_blocks::format_code_blocks;
use crate::markers::strip_chat_markers;
use crate::repetition::{remove_repetition, trim_prompt_echo, MIN_PARAGRAPH_LEN};
use crate::style::Styler;
use crate::thinking::{extract_thinking, ThinkingExtraction, ThinkingMode};
use crate::truncation::{append_truncation_note, looks_truncated};
use crate::types::RawResponse;
use crate::wrap::wrap_text;

pub const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: usize,
    pub show_thinking: bool,
    pub show_counts: bool,
    /// Prompt-echo trimming and paragraph dedup before layout.
    pub clean: bool,
    pub token_limit: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            show_thinking: false,
            show_counts: false,
            clean: false,
            token_limit: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedDocument {
    pub lines: Vec<String>,
}

impl FormattedDocument {
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for FormattedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Raw model output in, terminal document out. Never fails: accounting
/// problems degrade to a note at the end of the document.
pub fn render_document(
    raw: &RawResponse,
    prompt: &str,
    opts: &RenderOptions,
    styler: &dyn Styler,
    estimator: &dyn TokenEstimator,
) -> FormattedDocument {
    let stripped = strip_chat_markers(&raw.content);
    let mode = if opts.show_thinking {
        ThinkingMode::Show
    } else {
        ThinkingMode::Hide
    };
    let extraction = extract_thinking(&stripped, mode, opts.width, styler);
    debug!(
        segments = extraction.segments.len(),
        shown = opts.show_thinking,
        "thinking extraction"
    );

    let truncated = looks_truncated(&extraction.text, opts.token_limit);
    let mut body = if opts.clean {
        clean_body(&extraction, prompt, opts, styler)
    } else {
        extraction.text.clone()
    };
    if truncated {
        debug!("response looks truncated");
        body = append_truncation_note(&body, styler);
    }
    let wrapped = wrap_text(&format_code_blocks(&body, styler), opts.width);
    let mut lines = collapse_blank_runs(&wrapped);

    if opts.show_counts {
        let thinking_text = extraction.joined_thinking();
        let inputs = UsageInputs {
            payload: raw.server_payload.as_ref(),
            prompt,
            thinking_text: &thinking_text,
            answer_text: extraction.answer_text.trim(),
            has_thinking: extraction.has_segments(),
            thinking_shown: opts.show_thinking,
        };
        let show_thinking_line = extraction.has_segments() && opts.show_thinking;
        lines.push(String::new());
        match compute_accounting(inputs, estimator) {
            Ok(acc) => lines.extend(acc.report_lines(show_thinking_line, styler)),
            Err(e) => {
                warn!(error = %e, "token accounting failed");
                lines.push(accounting_failure_line(&e, styler));
            }
        }
    }

    FormattedDocument { lines }
}

/// Echo trimming and dedup see only the answer text, never panel lines. Shown
/// panels are placed ahead of the cleaned answer.
fn clean_body(
    extraction: &ThinkingExtraction,
    prompt: &str,
    opts: &RenderOptions,
    styler: &dyn Styler,
) -> String {
    let answer = remove_repetition(
        &trim_prompt_echo(&extraction.answer_text, prompt),
        MIN_PARAGRAPH_LEN,
        styler,
    );
    if !opts.show_thinking {
        return answer;
    }
    let mut parts = extraction.panels(opts.width, styler);
    parts.push(answer);
    parts.join("\n")
}

/// Splits into lines, keeps at most one blank line in a row, and drops blank
/// lines at either end.
fn collapse_blank_runs(text: &str) -> Vec<String> {
    let mut out = Vec::<String>::new();
    for line in text.split('\n') {
        let blank = line.trim().is_empty();
        if blank && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(if blank { String::new() } else { line.to_string() });
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}
