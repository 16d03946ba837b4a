use crate::style::{StyleRole, Styler};

pub const TRUNCATION_INDICATORS: [&str; 5] = ["...", "…", "to be continued", "cont", "continues"];
pub const TRUNCATION_NOTE: &str = "[Note: Response may be truncated]";

/// Characters of headroom below the token ceiling that still count as "hit the limit".
const LIMIT_MARGIN: usize = 20;

/// Best-effort guess that generation stopped early. False positives are expected.
pub fn looks_truncated(text: &str, token_limit: Option<usize>) -> bool {
    let tail = text.trim_end();
    if TRUNCATION_INDICATORS.iter().any(|ind| tail.ends_with(ind)) {
        return true;
    }
    match token_limit {
        Some(limit) => text.chars().count() >= limit.saturating_sub(LIMIT_MARGIN),
        None => false,
    }
}

pub fn append_truncation_note(text: &str, styler: &dyn Styler) -> String {
    format!(
        "{text}\n\n{}",
        styler.paint(StyleRole::Warning, TRUNCATION_NOTE)
    )
}
