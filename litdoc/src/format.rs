//! Text formatters applied to prose chunks before display.
//!
//! Formatters are pure text-to-text transforms. Code chunks never pass
//! through a formatter; the session engine echoes those itself.

use regex::{Captures, Regex};

use crate::ansi::with_codes;

/// A pure function from raw prose text to styled text.
pub trait TextFormatter {
    fn format(&self, text: &str) -> String;
}

/// Identity formatter: prose is displayed exactly as written.
#[derive(Debug, Default)]
pub struct NoopFormatter;

impl NoopFormatter {
    pub fn new() -> Self {
        NoopFormatter
    }
}

impl TextFormatter for NoopFormatter {
    fn format(&self, text: &str) -> String {
        text.to_string()
    }
}

// Placeholder markers used between the substitution and resolve passes.
const OPEN: char = '\u{2}';
const CLOSE: char = '\u{3}';
const M_BOLD: char = '\u{1}';
const M_ITALIC: char = '\u{4}';
const M_HIGHLIGHT: char = '\u{5}';
const M_UNDERLINE: char = '\u{6}';
const M_STRIKE: char = '\u{7}';
const M_CODE: char = '\u{1c}';

/// Renders a subset of Markdown with ANSI escape codes so prose looks
/// reasonable in a terminal.
///
/// Works in three passes: inline code spans are extracted to placeholders
/// first (styling rules must never match inside them), an ordered list of
/// (pattern, marker) rules rewrites prose into marker form, and a final
/// resolve pass turns markers into SGR sequences and reinjects the stashed
/// code spans. Unmatched text passes through unchanged.
pub struct MarkdownFormatter {
    code: Regex,
    bold: Regex,
    italic: Regex,
    highlight: Regex,
    underline: Regex,
    strike: Regex,
    header_atx: Regex,
    header_setext: Regex,
    resolve: Regex,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        MarkdownFormatter::new()
    }
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        // The regex crate has no lookbehind; each rule captures the
        // preceding character instead and carries it through.
        MarkdownFormatter {
            code: Regex::new(r"`(?P<text>[^`\n]+?)`").expect("static pattern"),
            bold: Regex::new(r"(?m)(?P<pre>^|[^\\])\*\*(?P<text>[^ *].*?[^ \\])\*\*")
                .expect("static pattern"),
            italic: Regex::new(r"(?m)(?P<pre>^|[^\\*])\*(?P<text>[^ *].*?[^ \\*])\*")
                .expect("static pattern"),
            highlight: Regex::new(r"(?m)(?P<pre>^|[^\\])==(?P<text>[^ =].*?[^ \\])==")
                .expect("static pattern"),
            underline: Regex::new(r"(?m)(?P<pre>^|[^\\\w])_(?P<text>[^ ].*?[^ \\])_")
                .expect("static pattern"),
            strike: Regex::new(r"(?m)(?P<pre>^|[^\\])~~(?P<text>[^ ].*?[^ \\])~~")
                .expect("static pattern"),
            header_atx: Regex::new(r"(?m)^#{1,6} .+$").expect("static pattern"),
            header_setext: Regex::new(r"(?m)^(?P<text>.+)\n(?P<under>=+|-{2,})$")
                .expect("static pattern"),
            resolve: Regex::new(
                "\u{2}(?P<code>[\u{1}\u{4}-\u{7}\u{1c}])(?P<text>[^\u{3}]*)\u{3}",
            )
            .expect("static pattern"),
        }
    }

    fn mark(pre: &str, marker: char, text: &str) -> String {
        format!("{pre}{OPEN}{marker}{text}{CLOSE}")
    }
}

impl TextFormatter for MarkdownFormatter {
    fn format(&self, text: &str) -> String {
        // Pass 1: stash code spans so later rules cannot match inside them.
        let mut code_spans: Vec<String> = Vec::new();
        let s = self.code.replace_all(text, |caps: &Captures| {
            code_spans.push(caps["text"].to_string());
            format!("{OPEN}{M_CODE}{}{CLOSE}", code_spans.len() - 1)
        });

        // Pass 2: ordered substitution. Bold must run before italic so a
        // double asterisk is never consumed as two emphasis markers.
        let s = self.bold.replace_all(&s, |c: &Captures| {
            Self::mark(&c["pre"], M_BOLD, &c["text"])
        });
        let s = self.italic.replace_all(&s, |c: &Captures| {
            Self::mark(&c["pre"], M_ITALIC, &c["text"])
        });
        let s = self.highlight.replace_all(&s, |c: &Captures| {
            Self::mark(&c["pre"], M_HIGHLIGHT, &c["text"])
        });
        let s = self.underline.replace_all(&s, |c: &Captures| {
            Self::mark(&c["pre"], M_UNDERLINE, &c["text"])
        });
        let s = self.strike.replace_all(&s, |c: &Captures| {
            Self::mark(&c["pre"], M_STRIKE, &c["text"])
        });

        // Headers style the whole line directly.
        let s = self
            .header_atx
            .replace_all(&s, |c: &Captures| with_codes(&c[0], &[1]));
        let s = self.header_setext.replace_all(&s, |c: &Captures| {
            with_codes(&format!("{}\n{}", &c["text"], &c["under"]), &[1])
        });

        // Pass 3: resolve markers to SGR, reinjecting stashed code spans.
        self.resolve
            .replace_all(&s, |c: &Captures| {
                let marker = c["code"].chars().next().expect("marker present");
                if marker == M_CODE {
                    let idx: usize = c["text"].parse().unwrap_or(0);
                    let inner = code_spans.get(idx).map(String::as_str).unwrap_or("");
                    with_codes(&format!(" {inner} "), &[48, 5, 234])
                } else {
                    let (chars, codes): (&str, &[u16]) = match marker {
                        M_BOLD => ("**", &[1]),
                        M_ITALIC => ("*", &[3]),
                        M_HIGHLIGHT => ("==", &[7]),
                        M_UNDERLINE => ("_", &[4]),
                        _ => ("~~", &[9]),
                    };
                    with_codes(&format!("{chars}{}{chars}", &c["text"]), codes)
                }
            })
            .into_owned()
    }
}
