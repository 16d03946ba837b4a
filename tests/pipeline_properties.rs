use llama_query::accounting::WordHeuristicEstimator;
use llama_query::code_blocks::format_code_blocks;
use llama_query::pipeline::{render_document, RenderOptions};
use llama_query::repetition::{dedupe_paragraphs, MIN_PARAGRAPH_LEN};
use llama_query::style::{strip_ansi, AnsiStyler, PlainStyler};
use llama_query::thinking::{extract_thinking, ThinkingMode};
use llama_query::types::RawResponse;
use llama_query::wrap::wrap_text;

fn paras(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn dedup_is_identity_without_duplicates() {
    let cases = [
        paras(&[]),
        paras(&["only one paragraph that is long"]),
        paras(&["tiny", "A reasonably long first paragraph.", "tiny", "Another long paragraph here."]),
    ];
    for input in cases {
        let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
        assert_eq!(out.paragraphs, input);
        assert!(!out.needs_advisory());
    }
}

#[test]
fn short_paragraphs_always_kept() {
    let input = paras(&[
        "A long paragraph that will repeat.",
        "short",
        "A long paragraph that will repeat.",
        "short",
        "exactly nineteen ch",
        "exactly nineteen ch",
    ]);
    let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
    assert_eq!(
        out.paragraphs,
        paras(&[
            "A long paragraph that will repeat.",
            "short",
            "short",
            "exactly nineteen ch",
            "exactly nineteen ch",
        ])
    );
}

#[test]
fn advisory_tracks_retention_ratio() {
    let long = "This paragraph is definitely long enough.";
    let out = dedupe_paragraphs(&paras(&[long, long, long, long]), MIN_PARAGRAPH_LEN);
    assert_eq!(out.kept_count, 1);
    assert!(out.needs_advisory());

    let unique = (0..9)
        .map(|i| format!("Unique paragraph number {i} with padding."))
        .collect::<Vec<_>>();
    let mut input = unique.clone();
    input.push(unique[0].clone());
    let out = dedupe_paragraphs(&input, MIN_PARAGRAPH_LEN);
    assert_eq!(out.kept_count, 9);
    assert!(!out.needs_advisory());
}

#[test]
fn fenced_code_survives_wrapping_at_any_width() {
    let code = [
        "fn main() {",
        "    let numbers: Vec<u64> = (1..=10).map(|n| n * n).collect();",
        "",
        "    println!(\"{numbers:?}\");",
        "}",
    ];
    let text = format!("Here is the program:\n```rust\n{}\n```\nThat is all.", code.join("\n"));
    for styled in [
        format_code_blocks(&text, &PlainStyler),
        format_code_blocks(&text, &AnsiStyler),
    ] {
        for width in [1, 3, 10, 40, 120] {
            let wrapped = wrap_text(&styled, width);
            let visible = wrapped
                .lines()
                .map(|l| strip_ansi(l).into_owned())
                .collect::<Vec<_>>();
            for line in code {
                let expected = format!("│ {line}");
                assert!(visible.contains(&expected), "width {width}: missing {expected:?}");
            }
        }
    }
}

#[test]
fn hide_and_show_modes_treat_interior_text_differently() {
    let input = "<think>weigh both designs carefully</think>Use the second design.";
    let hidden = extract_thinking(input, ThinkingMode::Hide, 60, &PlainStyler);
    assert_eq!(hidden.text, "Use the second design.");
    assert!(!hidden.text.contains("weigh"));

    let shown = extract_thinking(input, ThinkingMode::Show, 60, &PlainStyler);
    assert!(shown.text.contains("weigh both designs carefully"));
    assert!(!shown.text.contains("<think>"));
    assert!(!shown.text.contains("</think>"));
    assert_eq!(shown.segments, hidden.segments);
}

#[test]
fn truncation_note_only_for_cut_off_answers() {
    let opts = RenderOptions::default();
    let cut = render_document(
        &RawResponse::from_content("The list goes on..."),
        "q",
        &opts,
        &PlainStyler,
        &WordHeuristicEstimator,
    );
    assert!(cut.render().ends_with("[Note: Response may be truncated]"));

    let whole = render_document(
        &RawResponse::from_content("This is a complete sentence."),
        "q",
        &opts,
        &PlainStyler,
        &WordHeuristicEstimator,
    );
    assert_eq!(whole.render(), "This is a complete sentence.");
}
