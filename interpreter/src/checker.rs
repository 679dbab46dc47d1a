//! Comparison of captured output against a chunk's expectation.

use similar::TextDiff;

/// The literal that matches any run of output in an expectation.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Default)]
pub struct OutputChecker;

impl OutputChecker {
    pub fn new() -> Self {
        OutputChecker
    }

    /// True when `got` satisfies the expectation `want`.
    ///
    /// Tried in order: exact match, whitespace-normalized match, then
    /// glob-style matching where `...` in `want` spans anything.
    pub fn check(&self, want: &str, got: &str) -> bool {
        if want == got {
            return true;
        }
        if normalize(want) == normalize(got) {
            return true;
        }
        if want.contains(ELLIPSIS) {
            return ellipsis_match(want, got);
        }
        false
    }

    /// Unified diff of expectation vs. capture, for mismatch reports.
    pub fn diff(&self, want: &str, got: &str) -> String {
        TextDiff::from_lines(want, got)
            .unified_diff()
            .context_radius(3)
            .header("expected", "actual")
            .to_string()
    }
}

fn normalize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn ellipsis_match(want: &str, got: &str) -> bool {
    let parts: Vec<&str> = want.split(ELLIPSIS).collect();
    let mut rest = got;

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            // Leading literal anchors the start.
            match rest.strip_prefix(part) {
                Some(after) => rest = after,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            // Trailing literal anchors the end. Expectations carry a
            // trailing newline that the final `...` should absorb.
            let part = part.strip_suffix('\n').unwrap_or(part);
            if part.is_empty() {
                continue;
            }
            let rest_trimmed = rest.strip_suffix('\n').unwrap_or(rest);
            match rest_trimmed.strip_suffix(part) {
                Some(_) => return true,
                None => return false,
            }
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}
