//! ANSI escape helpers shared by the formatter and the replay reports.

const CSI: &str = "\x1b[";
const RESET: &str = "\x1b[0m";

/// Wrap `text` in an SGR sequence built from `codes`, resetting afterwards.
pub fn with_codes(text: &str, codes: &[u16]) -> String {
    let joined = codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(";");
    format!("{CSI}{joined}m{text}{RESET}")
}

/// Collects text and renders it inside a box drawn with Unicode box
/// characters. Used for the "output different from expected" and
/// "unexpected exception" replay reports.
pub struct BoxMaker {
    lines: Vec<String>,
    padding: usize,
}

impl Default for BoxMaker {
    fn default() -> Self {
        BoxMaker::new()
    }
}

impl BoxMaker {
    pub fn new() -> Self {
        BoxMaker {
            lines: vec![String::new()],
            padding: 1,
        }
    }

    /// Append content; embedded newlines start new box lines.
    pub fn write(&mut self, contents: &str) {
        let mut parts = contents.split('\n');
        if let Some(first) = parts.next() {
            self.lines
                .last_mut()
                .expect("box always holds one line")
                .push_str(first);
        }
        for part in parts {
            self.lines.push(part.to_string());
        }
    }

    /// Render the collected content with a border.
    pub fn render(&self) -> String {
        let mut lines: &[String] = &self.lines;
        // Suppress a final extraneous newline.
        if lines.last().is_some_and(|l| l.is_empty()) && lines.len() > 1 {
            lines = &lines[..lines.len() - 1];
        }

        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = inner + self.padding * 2;

        let mut out = String::new();
        out.push('┌');
        out.push_str(&"─".repeat(width));
        out.push_str("┐\n");

        let blank = String::new();
        let padded = std::iter::once(&blank)
            .chain(lines.iter())
            .chain(std::iter::once(&blank));
        for line in padded {
            out.push('│');
            out.push_str(&" ".repeat(self.padding));
            out.push_str(line);
            out.push_str(&" ".repeat(inner - line.chars().count() + self.padding));
            out.push_str("│\n");
        }

        out.push('└');
        out.push_str(&"─".repeat(width));
        out.push_str("┘\n");
        out
    }
}
