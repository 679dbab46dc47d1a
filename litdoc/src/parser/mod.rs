pub mod error;
mod markdown;
mod transcript;

pub use error::ParseError;
pub use markdown::MarkdownParser;
pub use transcript::TranscriptParser;

use crate::chunk::Chunk;

/// A parser strategy: segments a raw document into the ordered chunk
/// sequence. Strategies are interchangeable and selected by configuration;
/// `name` is used only for diagnostic labeling.
pub trait ChunkParser {
    fn parse(&self, source: &str, name: &str) -> Result<Vec<Chunk>, Vec<ParseError>>;
}
