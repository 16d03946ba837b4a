//! Reasoning segments delimited by `<think>` / `</think>`.
//!
//! Matching is non-greedy and non-nesting: the first closing tag after an
//! opening tag ends the segment, whatever appears in between. An opening tag
//! with no closing tag is dropped and the text after it stays in the answer.

use std::ops::Range;

use unicode_width::UnicodeWidthStr;

use crate::style::{StyleRole, Styler};
use crate::wrap::greedy_options;

pub const OPEN_TAG: &str = "<think>";
pub const CLOSE_TAG: &str = "</think>";
pub const PANEL_TITLE: &str = "THINKING PROCESS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingSegment {
    pub text: String,
    /// Byte range of the whole tagged region, tags included, in the scanned text.
    pub original_span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingMode {
    Show,
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingExtraction {
    /// Text to keep rendering, panels substituted in `Show` mode.
    pub text: String,
    /// Text with every segment removed, regardless of mode.
    pub answer_text: String,
    pub segments: Vec<ThinkingSegment>,
}

impl ThinkingExtraction {
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn joined_thinking(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One rendered panel per segment, in order.
    pub fn panels(&self, width: usize, styler: &dyn Styler) -> Vec<String> {
        self.segments
            .iter()
            .map(|s| render_thinking_panel(&strip_tags(&s.text), width, styler))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(Range<usize>),
    Segment(usize),
}

#[derive(Clone, Copy)]
enum ScanState {
    Outside,
    InThinkingBlock { open_at: usize, body_start: usize },
}

fn scan(input: &str) -> (Vec<Piece>, Vec<ThinkingSegment>) {
    let mut pieces = Vec::new();
    let mut segments = Vec::new();
    let mut state = ScanState::Outside;
    let mut i = 0usize;
    loop {
        match state {
            ScanState::Outside => {
                let Some(rel) = input[i..].find(OPEN_TAG) else {
                    pieces.push(Piece::Text(i..input.len()));
                    break;
                };
                let open_at = i + rel;
                pieces.push(Piece::Text(i..open_at));
                i = open_at + OPEN_TAG.len();
                state = ScanState::InThinkingBlock {
                    open_at,
                    body_start: i,
                };
            }
            ScanState::InThinkingBlock {
                open_at,
                body_start,
            } => {
                let Some(rel) = input[i..].find(CLOSE_TAG) else {
                    pieces.push(Piece::Text(body_start..input.len()));
                    break;
                };
                let close_at = i + rel;
                let end = close_at + CLOSE_TAG.len();
                pieces.push(Piece::Segment(segments.len()));
                segments.push(ThinkingSegment {
                    text: input[body_start..close_at].to_string(),
                    original_span: open_at..end,
                });
                i = end;
                state = ScanState::Outside;
            }
        }
    }
    (pieces, segments)
}

fn strip_tags(s: &str) -> String {
    s.replace(OPEN_TAG, "").replace(CLOSE_TAG, "")
}

/// Finds every thinking segment, left to right.
pub fn find_thinking_segments(input: &str) -> Vec<ThinkingSegment> {
    scan(input).1
}

pub fn extract_thinking(
    input: &str,
    mode: ThinkingMode,
    width: usize,
    styler: &dyn Styler,
) -> ThinkingExtraction {
    let (pieces, segments) = scan(input);
    let mut text = String::with_capacity(input.len());
    let mut answer_text = String::with_capacity(input.len());
    for piece in &pieces {
        match piece {
            Piece::Text(range) => {
                let visible = strip_tags(&input[range.clone()]);
                text.push_str(&visible);
                answer_text.push_str(&visible);
            }
            Piece::Segment(idx) => {
                if mode == ThinkingMode::Show {
                    let body = strip_tags(&segments[*idx].text);
                    text.push_str(&render_thinking_panel(&body, width, styler));
                }
            }
        }
    }
    ThinkingExtraction {
        text,
        answer_text,
        segments,
    }
}

/// Boxed panel exactly `width` columns wide with the segment wrapped inside.
pub fn render_thinking_panel(body: &str, width: usize, styler: &dyn Styler) -> String {
    let inner = width.saturating_sub(2).max(PANEL_TITLE.len() + 2);
    let content_width = inner - 2;
    let frame = |s: &str| styler.paint(StyleRole::ThinkingFrame, s);

    let mut lines = Vec::new();
    lines.push(styler.paint(
        StyleRole::Emphasis,
        &frame(&format!("┌{}┐", "─".repeat(inner))),
    ));
    let title_pad = " ".repeat(inner - PANEL_TITLE.len() - 1);
    lines.push(format!(
        "{}{}{}",
        frame("│"),
        styler.paint(StyleRole::Emphasis, &format!(" {PANEL_TITLE}{title_pad}")),
        frame("│")
    ));
    for line in body.trim().lines() {
        if line.trim().is_empty() {
            lines.push(frame(&format!("│{}│", " ".repeat(inner))));
            continue;
        }
        for wrapped in textwrap::wrap(line, greedy_options(content_width)) {
            let padding = " ".repeat(content_width.saturating_sub(wrapped.width()));
            lines.push(format!(
                "{} {} {}",
                frame("│"),
                styler.paint(StyleRole::ThinkingText, &format!("{wrapped}{padding}")),
                frame("│")
            ));
        }
    }
    lines.push(frame(&format!("└{}┘", "─".repeat(inner))));
    lines.join("\n")
}
