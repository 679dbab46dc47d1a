use litdoc::ansi::{BoxMaker, with_codes};
use litdoc::format::{MarkdownFormatter, NoopFormatter, TextFormatter};

fn fmt(text: &str) -> String {
    MarkdownFormatter::new().format(text)
}

#[test]
fn noop_is_identity() {
    let text = "# Title\n\nSome **bold** prose.\n";
    assert_eq!(NoopFormatter::new().format(text), text);
}

#[test]
fn plain_prose_passes_through() {
    assert_eq!(fmt("nothing special here\n"), "nothing special here\n");
}

#[test]
fn bold_keeps_its_markers() {
    assert_eq!(
        fmt("some **bold** text"),
        format!("some {} text", with_codes("**bold**", &[1]))
    );
}

#[test]
fn italic_keeps_its_markers() {
    assert_eq!(
        fmt("an *italic* word"),
        format!("an {} word", with_codes("*italic*", &[3]))
    );
}

#[test]
fn bold_wins_over_italic() {
    let out = fmt("**both stars**");
    assert_eq!(out, with_codes("**both stars**", &[1]));
}

#[test]
fn highlight_underline_strike() {
    assert_eq!(
        fmt("a ==marked== word"),
        format!("a {} word", with_codes("==marked==", &[7]))
    );
    assert_eq!(
        fmt("an _underlined_ word"),
        format!("an {} word", with_codes("_underlined_", &[4]))
    );
    assert_eq!(
        fmt("a ~~struck~~ word"),
        format!("a {} word", with_codes("~~struck~~", &[9]))
    );
}

#[test]
fn atx_header_is_bold() {
    assert_eq!(fmt("# Title"), with_codes("# Title", &[1]));
    assert_eq!(fmt("### Sub"), with_codes("### Sub", &[1]));
}

#[test]
fn setext_header_is_bold() {
    assert_eq!(fmt("Title\n====="), with_codes("Title\n=====", &[1]));
}

#[test]
fn code_span_gets_padding_and_background() {
    assert_eq!(
        fmt("call `f(x)` here"),
        format!("call {} here", with_codes(" f(x) ", &[48, 5, 234]))
    );
}

#[test]
fn styling_never_reaches_inside_code_spans() {
    let out = fmt("use `**not bold**` markers");
    assert_eq!(
        out,
        format!("use {} markers", with_codes(" **not bold** ", &[48, 5, 234]))
    );
}

#[test]
fn underscore_inside_identifier_is_not_underline() {
    assert_eq!(fmt("snake_case_name"), "snake_case_name");
}

#[test]
fn formatting_plain_prose_is_idempotent() {
    let text = "just ordinary prose, nothing to style\n";
    let once = fmt(text);
    assert_eq!(fmt(&once), once);
}

#[test]
fn with_codes_wraps_in_sgr() {
    assert_eq!(with_codes("hi", &[1]), "\x1b[1mhi\x1b[0m");
    assert_eq!(with_codes("hi", &[38, 5, 223]), "\x1b[38;5;223mhi\x1b[0m");
}

#[test]
fn box_surrounds_content() {
    let mut maker = BoxMaker::new();
    maker.write("ab\ncdef\n");
    let rendered = maker.render();
    assert_eq!(
        rendered,
        "┌──────┐\n\
         │      │\n\
         │ ab   │\n\
         │ cdef │\n\
         │      │\n\
         └──────┘\n"
    );
}

#[test]
fn empty_box_still_renders() {
    let maker = BoxMaker::new();
    let rendered = maker.render();
    assert_eq!(rendered, "┌──┐\n│  │\n│  │\n│  │\n└──┘\n");
}
