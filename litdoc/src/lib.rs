pub mod ansi;
pub mod chunk;
pub mod format;
pub mod parser;

pub use chunk::{Chunk, CodeChunk};
pub use format::{MarkdownFormatter, NoopFormatter, TextFormatter};
pub use parser::{ChunkParser, MarkdownParser, ParseError, TranscriptParser};
