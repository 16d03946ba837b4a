use crate::style::{StyleRole, Styler};

pub const FENCE: &str = "```";
pub const CODE_GUTTER: &str = "│ ";

const CODE_HEADER: &str = "┌─ Code";
const CODE_FOOTER: &str = "└─────────";
const CODE_EDGE: &str = "│";

pub fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

fn fence_language(line: &str) -> Option<&str> {
    let lang = line.trim().strip_prefix(FENCE)?.trim();
    (!lang.is_empty()).then_some(lang)
}

/// Replaces fenced blocks with a framed, distinctly styled rendering. Prose
/// passes through for the wrapper. An unterminated fence frames the rest of
/// the text.
pub fn format_code_blocks(text: &str, styler: &dyn Styler) -> String {
    let frame = |s: &str| styler.paint(StyleRole::CodeFrame, s);
    let mut in_code = false;
    let mut out = Vec::new();
    for line in text.split('\n') {
        if is_fence_line(line) {
            in_code = !in_code;
            if in_code {
                let header = match fence_language(line) {
                    Some(lang) => format!("{CODE_HEADER} ({lang}) "),
                    None => format!("{CODE_HEADER} "),
                };
                out.push(frame(&header));
                out.push(frame(CODE_EDGE));
            } else {
                out.push(frame(CODE_EDGE));
                out.push(frame(CODE_FOOTER));
            }
        } else if in_code {
            out.push(format!(
                "{}{}",
                frame(CODE_GUTTER),
                styler.paint(StyleRole::CodeText, line)
            ));
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::format_code_blocks;
    use crate::style::PlainStyler;

    #[test]
    fn frames_fenced_block_with_language() {
        let out = format_code_blocks("Before\n```rust\nfn main() {}\n```\nAfter", &PlainStyler);
        assert_eq!(
            out,
            "Before\n┌─ Code (rust) \n│\n│ fn main() {}\n│\n└─────────\nAfter"
        );
    }

    #[test]
    fn bare_fence_has_plain_header() {
        let out = format_code_blocks("```\nx\n```", &PlainStyler);
        assert!(out.starts_with("┌─ Code \n│\n│ x"));
    }

    #[test]
    fn unterminated_fence_stays_open() {
        let out = format_code_blocks("```py\nprint(1)\n\nprint(2)", &PlainStyler);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec!["┌─ Code (py) ", "│", "│ print(1)", "│ ", "│ print(2)"]);
    }

    #[test]
    fn prose_passes_through() {
        assert_eq!(format_code_blocks("just text\n\nmore", &PlainStyler), "just text\n\nmore");
    }
}
