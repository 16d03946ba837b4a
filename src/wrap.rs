use crate::code_blocks::is_fence_line;
use crate::style::strip_ansi;

/// Leading glyphs of framed output (code frames, thinking panel). Lines that
/// start with one of these are already laid out and must not be re-wrapped.
const FRAMED_PREFIXES: [char; 3] = ['│', '┌', '└'];

/// Greedy first-fit options; textwrap's default is optimal-fit.
pub fn greedy_options<'a>(width: usize) -> textwrap::Options<'a> {
    textwrap::Options::new(width.max(1)).wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
}

fn is_framed(line: &str) -> bool {
    strip_ansi(line)
        .chars()
        .next()
        .is_some_and(|c| FRAMED_PREFIXES.contains(&c))
}

/// Greedy word-wrap of prose to `width` columns. Fenced code and framed lines
/// pass through byte-for-byte. Blank lines collapse to a single empty line.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut in_code = false;
    let mut out = Vec::<String>::new();
    for line in text.split('\n') {
        if is_fence_line(line) {
            in_code = !in_code;
            out.push(line.to_string());
        } else if in_code || is_framed(line) {
            out.push(line.to_string());
        } else if line.trim().is_empty() {
            out.push(String::new());
        } else {
            let parts = textwrap::wrap(line, greedy_options(width));
            if parts.is_empty() {
                out.push(String::new());
            } else {
                out.extend(parts.into_iter().map(|p| p.into_owned()));
            }
        }
    }
    out.join("\n")
}
