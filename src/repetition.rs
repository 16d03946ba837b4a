//! Cleanup for models that loop: repeated paragraphs and echoed prompts.

use std::collections::HashSet;

use tracing::debug;

use crate::style::{StyleRole, Styler};

/// Paragraphs shorter than this (trimmed, in chars) are never deduplicated.
pub const MIN_PARAGRAPH_LEN: usize = 20;
/// Below this kept/original ratio, in tenths, the reader is told content was
/// dropped.
pub const RETENTION_THRESHOLD_TENTHS: usize = 7;
pub const REPETITION_NOTE: &str = "(Note: Repetitive content was removed from the response)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    pub paragraphs: Vec<String>,
    pub original_count: usize,
    pub kept_count: usize,
}

impl DedupOutcome {
    /// `kept < 0.7 * original`, compared in integers.
    pub fn needs_advisory(&self) -> bool {
        self.kept_count.saturating_mul(10)
            < self.original_count.saturating_mul(RETENTION_THRESHOLD_TENTHS)
    }
}

/// Maximal runs of non-blank lines, in document order.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::<&str>::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

pub fn dedupe_paragraphs(paragraphs: &[String], min_len: usize) -> DedupOutcome {
    let mut seen = HashSet::<&str>::new();
    let mut kept = Vec::with_capacity(paragraphs.len());
    for p in paragraphs {
        if p.trim().chars().count() < min_len {
            kept.push(p.clone());
            continue;
        }
        if seen.insert(p.as_str()) {
            kept.push(p.clone());
        }
    }
    DedupOutcome {
        original_count: paragraphs.len(),
        kept_count: kept.len(),
        paragraphs: kept,
    }
}

/// Paragraph dedup over a whole document, appending the advisory note when
/// too much was dropped.
pub fn remove_repetition(text: &str, min_len: usize, styler: &dyn Styler) -> String {
    let outcome = dedupe_paragraphs(&split_paragraphs(text), min_len);
    debug!(
        original = outcome.original_count,
        kept = outcome.kept_count,
        "paragraph dedup"
    );
    let mut paragraphs = outcome.paragraphs.clone();
    if outcome.needs_advisory() {
        paragraphs.push(styler.paint(StyleRole::Muted, REPETITION_NOTE));
    }
    paragraphs.join("\n\n")
}

/// Cuts the response at the first verbatim echo of the prompt.
pub fn trim_prompt_echo(text: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return text.to_string();
    }
    match text.find(prompt) {
        Some(idx) => text[..idx].trim().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        dedupe_paragraphs, remove_repetition, split_paragraphs, trim_prompt_echo,
        MIN_PARAGRAPH_LEN, REPETITION_NOTE,
    };
    use crate::style::PlainStyler;

    fn paras(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_on_blank_lines() {
        assert_eq!(
            split_paragraphs("a\nb\n\n\n  \nc\n"),
            vec!["a\nb".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn unique_paragraphs_are_untouched() {
        let input = paras(&[
            "The first paragraph is long enough.",
            "The second paragraph is long enough.",
            "ok",
        ]);
        let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
        assert_eq!(out.paragraphs, input);
        assert!(!out.needs_advisory());
    }

    #[test]
    fn short_paragraphs_survive_repetition() {
        let input = paras(&["short one", "short one", "short one"]);
        let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
        assert_eq!(out.paragraphs, input);
    }

    #[test]
    fn two_of_three_kept_falls_below_threshold() {
        let out = remove_repetition(
            "A paragraph.\n\nA paragraph.\n\nB paragraph.",
            5,
            &PlainStyler,
        );
        assert_eq!(out, format!("A paragraph.\n\nB paragraph.\n\n{REPETITION_NOTE}"));
    }

    #[test]
    fn nine_of_thirteen_kept_adds_note() {
        let mut input = (0..9)
            .map(|i| format!("Distinct paragraph number {i} with padding."))
            .collect::<Vec<_>>();
        input.extend(input[..4].to_vec());
        let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
        assert_eq!((out.kept_count, out.original_count), (9, 13));
        assert!(out.needs_advisory());
    }

    #[test]
    fn exactly_seventy_percent_kept_has_no_note() {
        let mut input = (0..7)
            .map(|i| format!("Distinct paragraph number {i} with padding."))
            .collect::<Vec<_>>();
        input.extend(input[..3].to_vec());
        let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
        assert_eq!((out.kept_count, out.original_count), (7, 10));
        assert!(!out.needs_advisory());
    }

    #[test]
    fn heavy_repetition_adds_single_note() {
        let p = "This sentence keeps coming back again.";
        let text = [p, p, p, p, "Tail."].join("\n\n");
        let out = remove_repetition(&text, MIN_PARAGRAPH_LEN, &PlainStyler);
        assert_eq!(out, format!("{p}\n\nTail.\n\n{REPETITION_NOTE}"));
        assert_eq!(out.matches(REPETITION_NOTE).count(), 1);
    }

    #[test]
    fn prompt_echo_is_cut() {
        assert_eq!(
            trim_prompt_echo("Paris.\n\nWhat is the capital of France?", "What is the capital of France?"),
            "Paris."
        );
        assert_eq!(trim_prompt_echo("No echo here", "prompt"), "No echo here");
        assert_eq!(trim_prompt_echo("anything", ""), "anything");
    }
}
