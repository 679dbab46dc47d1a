//! Name-to-factory tables for the pluggable pieces: parsers, text
//! formatters, and environment drivers.

use interpreter::{EnvDriver, MathDriver};
use litdoc::format::{MarkdownFormatter, NoopFormatter, TextFormatter};
use litdoc::parser::{ChunkParser, MarkdownParser, TranscriptParser};

pub const PARSER_NAMES: &[&str] = &["transcript", "markdown"];
pub const FORMATTER_NAMES: &[&str] = &["markdown", "none"];
pub const DRIVER_NAMES: &[&str] = &["math"];

pub fn make_parser(name: &str) -> Option<Box<dyn ChunkParser>> {
    match name {
        "transcript" => Some(Box::new(TranscriptParser::new())),
        "markdown" => Some(Box::new(MarkdownParser::new())),
        _ => None,
    }
}

pub fn make_formatter(name: &str) -> Option<Box<dyn TextFormatter>> {
    match name {
        "markdown" => Some(Box::new(MarkdownFormatter::new())),
        "none" => Some(Box::new(NoopFormatter)),
        _ => None,
    }
}

pub fn make_driver(name: &str) -> Option<Box<dyn EnvDriver>> {
    match name {
        "math" => Some(Box::new(MathDriver)),
        _ => None,
    }
}

/// Formatter implied by the file name, used when none is requested.
pub fn formatter_for_path(path: &str) -> Option<&'static str> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".md") || lower.ends_with(".markdown") {
        Some("markdown")
    } else {
        None
    }
}
