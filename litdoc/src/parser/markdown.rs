use crate::chunk::{Chunk, CodeChunk};
use crate::parser::{ChunkParser, ParseError};

/// Fence tag marking an executable block. Untagged fences are executable
/// too; any other tag passes through as opaque text.
pub const FENCE_TAG: &str = "litr";

const FENCE: &str = "```";
const INDENT_UNIT: &str = "    ";

/// Recognizes fenced and 4-space-indented code blocks.
///
/// Code chunks from this strategy carry no expectation syntax: output is
/// displayed during replay but never asserted. A dedent back to column zero
/// inside a fenced block forces a chunk boundary, so one fence can hold a
/// multi-step session replayed piece by piece.
#[derive(Debug, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        MarkdownParser
    }
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Text,
    Blank,
    FencedCode,
    FencedOther,
    IndentedCode,
}

impl ChunkParser for MarkdownParser {
    fn parse(&self, source: &str, _name: &str) -> Result<Vec<Chunk>, Vec<ParseError>> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut acc: Vec<&str> = Vec::new();
        let mut state = State::Text;
        let mut block_start = 0usize;
        let mut last_indent = 0usize;

        let mut lines: Vec<&str> = source.split('\n').collect();
        if source.ends_with('\n') {
            lines.pop();
        }

        for (idx, &line) in lines.iter().enumerate() {
            let lineno = idx + 1;
            match state {
                State::Text | State::Blank => {
                    if line == FENCE || line == [FENCE, FENCE_TAG].concat() {
                        flush_text(&mut chunks, &mut acc, true);
                        state = State::FencedCode;
                        last_indent = 0;
                        block_start = lineno + 1;
                    } else if line.starts_with(FENCE) {
                        acc.push(line);
                        state = State::FencedOther;
                    } else if line.is_empty() {
                        acc.push(line);
                        state = State::Blank;
                    } else if state == State::Blank && line.starts_with(INDENT_UNIT) {
                        flush_text(&mut chunks, &mut acc, true);
                        state = State::IndentedCode;
                        block_start = lineno;
                        acc.push(&line[INDENT_UNIT.len()..]);
                    } else {
                        acc.push(line);
                        state = State::Text;
                    }
                }
                State::FencedCode => {
                    if line == FENCE {
                        flush_code(&mut chunks, &mut acc, block_start, 0);
                        state = State::Text;
                    } else if !line.is_empty() {
                        // Interior blanks are dropped so replay never feeds
                        // spurious empty statements.
                        let indent = leading_spaces(line);
                        // A closing delimiter returning to column zero is
                        // still part of the statement above it.
                        let closes = matches!(line.as_bytes()[0], b'}' | b')' | b']');
                        if indent == 0 && last_indent > 0 && !closes {
                            // Dedent to column zero: one fence, several
                            // independently replayed chunks.
                            flush_code(&mut chunks, &mut acc, block_start, 0);
                            block_start = lineno;
                        }
                        acc.push(line);
                        last_indent = indent;
                    }
                }
                State::FencedOther => {
                    acc.push(line);
                    if line == FENCE {
                        state = State::Text;
                    }
                }
                State::IndentedCode => {
                    if let Some(rest) = line.strip_prefix(INDENT_UNIT) {
                        acc.push(rest);
                    } else if line.is_empty() {
                        flush_code(&mut chunks, &mut acc, block_start, INDENT_UNIT.len());
                        acc.push(line);
                        state = State::Blank;
                    } else {
                        flush_code(&mut chunks, &mut acc, block_start, INDENT_UNIT.len());
                        acc.push(line);
                        state = State::Text;
                    }
                }
            }
        }

        // End of document flushes whatever region is open.
        match state {
            State::FencedCode => flush_code(&mut chunks, &mut acc, block_start, 0),
            State::IndentedCode => {
                flush_code(&mut chunks, &mut acc, block_start, INDENT_UNIT.len())
            }
            _ => flush_text(&mut chunks, &mut acc, false),
        }

        if chunks.is_empty() {
            chunks.push(Chunk::Text(String::new()));
        }

        Ok(chunks)
    }
}

fn flush_text(chunks: &mut Vec<Chunk>, acc: &mut Vec<&str>, trailing_newline: bool) {
    if acc.is_empty() {
        return;
    }
    let mut text = acc.join("\n");
    if trailing_newline {
        text.push('\n');
    }
    acc.clear();
    chunks.push(Chunk::Text(text));
}

fn flush_code(chunks: &mut Vec<Chunk>, acc: &mut Vec<&str>, start_line: usize, indent: usize) {
    if acc.is_empty() {
        return;
    }
    let mut source = acc.join("\n");
    source.push('\n');
    acc.clear();
    chunks.push(Chunk::Code(CodeChunk::new(source, start_line, indent)));
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}
