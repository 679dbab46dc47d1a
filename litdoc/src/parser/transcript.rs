use crate::chunk::{Chunk, CodeChunk};
use crate::parser::{ChunkParser, ParseError};

/// Primary prompt marker, 4 characters.
pub const PS1: &str = ">>> ";
/// Continuation prompt marker, 4 characters.
pub const PS2: &str = "... ";
/// A following-output line starting with this marker begins capture of the
/// sample's expected error instead of its expected output.
pub const ERROR_HEADER: &str = "error:";

/// Recognizes embedded interactive-session transcripts.
///
/// A run of prompt lines (`>>> ` openers, `... ` continuations, and further
/// `>>> ` lines with no output between them) forms one code sample; raw
/// lines that follow at the same indentation become its expected output,
/// switching to expected-error capture at the first `error:` line. A blank
/// line or a dedent closes the sample. Everything else is prose.
#[derive(Debug, Default)]
pub struct TranscriptParser;

impl TranscriptParser {
    pub fn new() -> Self {
        TranscriptParser
    }
}

impl ChunkParser for TranscriptParser {
    fn parse(&self, source: &str, name: &str) -> Result<Vec<Chunk>, Vec<ParseError>> {
        Walker::new(source, name).run()
    }
}

/// What the collector is currently accumulating within one sample.
enum Phase {
    Source,
    Output,
    Error,
}

struct Walker<'a> {
    lines: Vec<&'a str>,
    /// Byte offset of each line's start.
    starts: Vec<usize>,
    /// Whether the final line was terminated by a newline in the document.
    final_newline: bool,
    errors: Vec<ParseError>,
}

impl<'a> Walker<'a> {
    fn new(source: &'a str, _name: &str) -> Self {
        let final_newline = source.ends_with('\n');
        let mut lines: Vec<&str> = source.split('\n').collect();
        if final_newline {
            lines.pop();
        }
        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            starts.push(offset);
            offset += line.len() + 1;
        }
        Walker {
            lines,
            starts,
            final_newline,
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Chunk>, Vec<ParseError>> {
        let mut chunks = Vec::new();
        let mut text = String::new();
        let mut i = 0;

        while i < self.lines.len() {
            let line = self.lines[i];
            if is_sample_start(line) {
                if !text.is_empty() {
                    chunks.push(Chunk::Text(std::mem::take(&mut text)));
                }
                let chunk = self.collect_sample(&mut i);
                chunks.push(Chunk::Code(chunk));
            } else {
                text.push_str(line);
                if i + 1 < self.lines.len() || self.final_newline {
                    text.push('\n');
                }
                i += 1;
            }
        }

        if !text.is_empty() || chunks.is_empty() {
            chunks.push(Chunk::Text(text));
        }

        if self.errors.is_empty() {
            Ok(chunks)
        } else {
            Err(self.errors)
        }
    }

    /// Collect one code sample starting at `*i` (which holds a `>>> ` line).
    /// Advances `*i` past the sample.
    fn collect_sample(&mut self, i: &mut usize) -> CodeChunk {
        let first = self.lines[*i];
        let indent = leading_spaces(first);
        let start_line = *i + 1;

        let mut src: Vec<&str> = Vec::new();
        let mut want: Vec<&str> = Vec::new();
        let mut exc: Vec<&str> = Vec::new();
        let mut phase = Phase::Source;

        while *i < self.lines.len() {
            let line = self.lines[*i];

            if let Some(kind) = prompt_kind(line) {
                // A prompt after output lines starts a fresh sample.
                if !matches!(phase, Phase::Source) {
                    break;
                }
                let line_indent = leading_spaces(line);
                if line_indent != indent {
                    self.errors.push(
                        ParseError::error(
                            format!(
                                "line {}: inconsistent leading whitespace before prompt",
                                *i + 1
                            ),
                            self.line_span(*i),
                            0,
                        )
                        .with_note(format!(
                            "the sample opened on line {start_line} is indented by {indent} spaces"
                        )),
                    );
                }
                match self.strip_prompt(line, line_indent, kind, *i) {
                    Some(rest) => src.push(rest),
                    None => {} // malformed prompt, error already recorded
                }
                *i += 1;
                continue;
            }

            if line.trim().is_empty() {
                break;
            }
            if leading_spaces(line) < indent {
                break;
            }

            let content = &line[indent..];
            match phase {
                Phase::Source | Phase::Output if content.starts_with(ERROR_HEADER) => {
                    phase = Phase::Error;
                    exc.push(content);
                }
                Phase::Source | Phase::Output => {
                    phase = Phase::Output;
                    want.push(content);
                }
                Phase::Error => exc.push(content),
            }
            *i += 1;
        }

        let mut chunk = CodeChunk::new(join_lines(&src), start_line, indent);
        if !want.is_empty() {
            chunk.expected_output = Some(join_lines(&want));
        }
        if !exc.is_empty() {
            chunk.expected_error = Some(join_lines(&exc));
        }
        chunk
    }

    /// Strip a prompt marker from a line, diagnosing a missing space after
    /// the marker when source text follows directly.
    fn strip_prompt(&mut self, line: &'a str, indent: usize, kind: Prompt, idx: usize) -> Option<&'a str> {
        let rest = &line[indent..];
        let marker = marker(kind);
        let after = &rest[marker.len()..];
        if after.is_empty() {
            Some("")
        } else if let Some(stripped) = after.strip_prefix(' ') {
            Some(stripped)
        } else {
            self.errors.push(ParseError::error(
                format!("line {}: missing space after '{}' prompt", idx + 1, marker),
                self.line_span(idx),
                0,
            ));
            None
        }
    }

    fn line_span(&self, idx: usize) -> std::ops::Range<usize> {
        let start = self.starts[idx];
        start..start + self.lines[idx].len()
    }
}

#[derive(Clone, Copy)]
enum Prompt {
    Primary,
    Continuation,
}

fn is_sample_start(line: &str) -> bool {
    line.trim_start().starts_with(marker(Prompt::Primary))
}

fn prompt_kind(line: &str) -> Option<Prompt> {
    let trimmed = line.trim_start();
    if trimmed.starts_with(marker(Prompt::Primary)) {
        Some(Prompt::Primary)
    } else if trimmed.starts_with(marker(Prompt::Continuation)) {
        Some(Prompt::Continuation)
    } else {
        None
    }
}

/// The prompt without its trailing space: a bare marker line is a valid
/// empty source line, so matching ignores the space.
fn marker(kind: Prompt) -> &'static str {
    match kind {
        Prompt::Primary => PS1.trim_end_matches(' '),
        Prompt::Continuation => PS2.trim_end_matches(' '),
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn join_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
