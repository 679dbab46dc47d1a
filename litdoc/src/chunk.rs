/// One parsed unit of a literate document: either prose or an executable
/// code sample. Chunks are produced once per document and never mutated;
/// replay state lives in the session engine, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// Raw prose, passed through the text formatter before display.
    Text(String),
    /// A code sample with optional expectations.
    Code(CodeChunk),
}

impl Chunk {
    /// Capability check callers branch on during replay.
    pub fn as_code(&self) -> Option<&CodeChunk> {
        match self {
            Chunk::Code(code) => Some(code),
            Chunk::Text(_) => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Chunk::Code(_))
    }
}

/// An executable code sample extracted from a document.
///
/// `source` always ends with a newline, so splitting on `'\n'` yields the
/// sample's lines followed by one empty element — the replay loop relies on
/// that shape when feeding lines to the statement accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeChunk {
    /// Literal code text, one or more lines, trailing newline included.
    pub source: String,
    /// Expected stdout. `None` means no assertion is made.
    pub expected_output: Option<String>,
    /// Expected error text (starting with the `error:` summary line).
    /// `None` means no error is expected.
    pub expected_error: Option<String>,
    /// 1-based line in the source document where the sample starts.
    pub line: usize,
    /// Indentation width the sample carried in the document.
    pub indent: usize,
}

impl CodeChunk {
    pub fn new(source: impl Into<String>, line: usize, indent: usize) -> Self {
        CodeChunk {
            source: source.into(),
            expected_output: None,
            expected_error: None,
            line,
            indent,
        }
    }
}
