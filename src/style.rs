use std::borrow::Cow;

use crossterm::style::{Color, Stylize};

/// Semantic roles the renderers ask for. A `Styler` decides what each looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRole {
    Border,
    Emphasis,
    Muted,
    Warning,
    Heading,
    CodeFrame,
    CodeText,
    ThinkingFrame,
    ThinkingText,
}

pub trait Styler {
    fn paint(&self, role: StyleRole, text: &str) -> String;
}

/// Identity styling, used for `--no-color` and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyler;

impl Styler for PlainStyler {
    fn paint(&self, _role: StyleRole, text: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiStyler;

impl Styler for AnsiStyler {
    fn paint(&self, role: StyleRole, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        match role {
            StyleRole::Border => text.with(Color::Green).to_string(),
            StyleRole::Emphasis => text.bold().to_string(),
            StyleRole::Muted => text.dim().to_string(),
            StyleRole::Warning => text.with(Color::Yellow).to_string(),
            StyleRole::Heading => text.with(Color::Cyan).to_string(),
            StyleRole::CodeFrame => text.with(Color::Yellow).to_string(),
            StyleRole::CodeText => text.with(Color::Cyan).to_string(),
            StyleRole::ThinkingFrame => text.with(Color::AnsiValue(240)).to_string(),
            StyleRole::ThinkingText => text.with(Color::AnsiValue(246)).to_string(),
        }
    }
}

pub fn styler_for(use_color: bool) -> Box<dyn Styler> {
    if use_color {
        Box::new(AnsiStyler)
    } else {
        Box::new(PlainStyler)
    }
}

/// Drops CSI escape sequences (`ESC [ ... final`) so prefixes can be matched on
/// what the terminal will actually show.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\u{1b}') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            out.push(ch);
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();
        for c in chars.by_ref() {
            if ('\u{40}'..='\u{7e}').contains(&c) {
                break;
            }
        }
    }
    Cow::Owned(out)
}
