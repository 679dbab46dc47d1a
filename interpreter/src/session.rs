//! Literate session engine.
//!
//! Drives a parsed document: prose is shown (optionally styled), code
//! chunks are replayed through the interpreter, and their captured
//! output is compared against the document's recorded expectations.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use litdoc::ansi::{self, BoxMaker};
use litdoc::chunk::{Chunk, CodeChunk};
use litdoc::format::{NoopFormatter, TextFormatter};
use litdoc::parser::{ChunkParser, ParseError};

use crate::checker::OutputChecker;
use crate::driver::EnvDriver;
use crate::interp::Interpreter;
use crate::source_map::{SourceRegistry, synthetic_id};

pub const PS1: &str = ">>> ";
pub const PS2: &str = "... ";

/// Consecutive blank lines that end a nested interactive console.
const REPL_EXIT_BLANKS: usize = 2;

/// ANSI color for echoed code lines.
const CODE_COLOR: &[u16] = &[38, 5, 223];

/// Line input for the pacing pauses and interactive consoles.
pub trait LineReader {
    /// Read one line, without its trailing newline. `None` is end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads from stdin, echoing the prompt to stderr so captured stdout
/// stays clean.
#[derive(Debug, Default)]
pub struct StdinLineReader;

impl LineReader for StdinLineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        eprint!("{}", prompt);
        io::Write::flush(&mut io::stderr())?;
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Replays a fixed script of lines; end of script is end of input.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: std::collections::VecDeque<String>,
}

impl ScriptedReader {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ScriptedReader {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[derive(Debug)]
pub enum SessionError {
    Parse(Vec<ParseError>),
    Io(io::Error),
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        SessionError::Io(error)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Parse(errors) => {
                write!(f, "document failed to parse ({} error(s))", errors.len())
            }
            SessionError::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for SessionError {}

/// What happened over one document replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub code_chunks: usize,
    pub output_mismatches: usize,
    pub error_mismatches: usize,
    pub unexpected_errors: usize,
}

impl ReplayStats {
    /// True when every chunk behaved exactly as the document recorded.
    pub fn is_clean(&self) -> bool {
        self.output_mismatches == 0 && self.error_mismatches == 0 && self.unexpected_errors == 0
    }
}

pub struct LiterateSession {
    pub interp: Interpreter,
    parser: Box<dyn ChunkParser>,
    formatter: Box<dyn TextFormatter>,
    reader: Box<dyn LineReader>,
    driver: Option<Box<dyn EnvDriver>>,
    use_ansi: bool,
    checker: OutputChecker,
    sources: Rc<RefCell<SourceRegistry>>,
    pause: bool,
    interactive: bool,
    name: String,
}

impl LiterateSession {
    pub fn new(parser: Box<dyn ChunkParser>, reader: Box<dyn LineReader>) -> Self {
        LiterateSession {
            interp: Interpreter::new(),
            parser,
            formatter: Box::new(NoopFormatter),
            reader,
            driver: None,
            use_ansi: true,
            checker: OutputChecker::new(),
            sources: Rc::new(RefCell::new(SourceRegistry::new())),
            pause: true,
            interactive: true,
            name: String::new(),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn TextFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_ansi(mut self, use_ansi: bool) -> Self {
        self.use_ansi = use_ansi;
        self
    }

    pub fn with_driver(mut self, driver: Box<dyn EnvDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Replay `document` under the given pacing mode.
    ///
    /// With `pause`, the session stops before each text block; with
    /// `interactive` too, each stop is a full nested console. Parse
    /// errors abort before anything runs.
    pub fn interact(
        &mut self,
        document: &str,
        name: &str,
        pause: bool,
        interactive: bool,
        output: &mut dyn Write,
    ) -> Result<ReplayStats, SessionError> {
        let chunks = self
            .parser
            .parse(document, name)
            .map_err(SessionError::Parse)?;

        self.name = name.to_string();
        self.pause = pause;
        self.interactive = interactive;
        self.interp.install_sources(Rc::clone(&self.sources));

        if let Some(driver) = &mut self.driver {
            self.interp.env.extend(driver.setup());
        }

        self.write_banner(output)?;
        let result = self.run_chunks(&chunks, output);

        // Cleanup happens on every path, including early exits.
        self.interp.remove_sources();
        self.sources.borrow_mut().clear();
        if let Some(driver) = &mut self.driver {
            driver.teardown();
        }
        result
    }

    fn write_banner(&mut self, output: &mut dyn Write) -> io::Result<()> {
        let driver_text = match &self.driver {
            Some(driver) => format!(" with {} driver", driver.name()),
            None => String::new(),
        };
        writeln!(output, "Literate session{}: {}", driver_text, self.name)?;
        writeln!(
            output,
            "litr {} on {}",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        )?;
        if let Some(driver) = &self.driver {
            writeln!(output, "{}", driver.banner())?;
        }
        if self.pause && !self.interactive {
            writeln!(output, "Press enter to continue after a code block")?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn run_chunks(
        &mut self,
        chunks: &[Chunk],
        output: &mut dyn Write,
    ) -> Result<ReplayStats, SessionError> {
        let mut stats = ReplayStats::default();
        let mut code_index = 0usize;
        let mut first = true;

        for chunk in chunks {
            match chunk {
                Chunk::Text(text) => {
                    // Only the empty-document placeholder is skipped; a
                    // whitespace-only separator still pauses and prints.
                    if text.is_empty() {
                        continue;
                    }
                    if !first && self.pause {
                        if self.interactive {
                            if self.console(output, true)? {
                                return Ok(stats);
                            }
                        } else if self.reader.read_line(PS1)?.is_none() {
                            return Ok(stats);
                        }
                    }
                    write!(output, "{}", self.formatter.format(text))?;
                }
                Chunk::Code(code) => {
                    self.replay(code, code_index, &mut stats, output)?;
                    code_index += 1;
                    stats.code_chunks += 1;
                }
            }
            first = false;
        }

        let complete = format!(
            "\n{} complete! Continuing to interactive console...\n\n",
            self.name
        );
        if self.use_ansi {
            write!(output, "{}", ansi::with_codes(&complete, &[1]))?;
        } else {
            write!(output, "{}", complete)?;
        }
        self.console(output, false)?;
        Ok(stats)
    }

    /// Free-form console over the live environment. Returns true on EOF,
    /// which ends the whole session. With `blank_exit`, two blank lines
    /// in a row also end the console (the mid-document pause behavior);
    /// without it, blank lines are ignored and only end-of-input leaves
    /// (the trailing console).
    fn console(&mut self, output: &mut dyn Write, blank_exit: bool) -> Result<bool, SessionError> {
        self.interp.end_chunk();
        let mut blanks = 0usize;
        loop {
            let prompt = if self.interp.more() { PS2 } else { PS1 };
            let Some(line) = self.reader.read_line(prompt)? else {
                self.interp.reset_buffer();
                return Ok(true);
            };
            if line.trim().is_empty() && !self.interp.more() {
                if blank_exit {
                    blanks += 1;
                    if blanks >= REPL_EXIT_BLANKS {
                        self.interp.reset_buffer();
                        return Ok(false);
                    }
                }
                continue;
            }
            blanks = 0;
            match self.interp.push(&line, output) {
                Ok(_) => {}
                Err(error) => {
                    write!(output, "{}", self.interp.format_trace(&error))?;
                }
            }
        }
    }

    fn replay(
        &mut self,
        chunk: &CodeChunk,
        index: usize,
        stats: &mut ReplayStats,
        output: &mut dyn Write,
    ) -> Result<(), SessionError> {
        let id = synthetic_id(&self.name, index);
        self.sources.borrow_mut().register(&id, &chunk.source);
        self.interp.begin_chunk(&id);

        let mut captured: Vec<u8> = Vec::new();
        let mut last_err = None;

        // Source always ends with a newline, so the final split element
        // is empty and the loop feeds every real line.
        let lines: Vec<&str> = chunk.source.split('\n').collect();
        let indent = " ".repeat(chunk.indent);
        for line in &lines[..lines.len().saturating_sub(1)] {
            let prompt = if self.interp.more() { PS2 } else { PS1 };
            let echoed = if self.use_ansi {
                ansi::with_codes(line, CODE_COLOR)
            } else {
                (*line).to_string()
            };
            writeln!(output, "{}{}{}", indent, prompt, echoed)?;

            last_err = match self.interp.push(line, &mut captured) {
                Ok(_) => None,
                Err(error) => Some(error),
            };
        }
        if self.interp.more() {
            // Unterminated multi-line statement: force it to run.
            last_err = match self.interp.push("", &mut captured) {
                Ok(_) => None,
                Err(error) => Some(error),
            };
        }

        let res = String::from_utf8_lossy(&captured).into_owned();
        let has_expectation = chunk.expected_output.is_some() || chunk.expected_error.is_some();

        if has_expectation {
            match (&last_err, &chunk.expected_error) {
                (None, expected_error) => {
                    let want = chunk.expected_output.as_deref().unwrap_or("");
                    if chunk.expected_output.is_none() && expected_error.is_some() {
                        // Recorded an error that never happened.
                        let mut body = String::from("The exception:\n");
                        body.push_str(expected_error.as_deref().unwrap_or(""));
                        body.push_str("\nnever occurred. Output was:\n");
                        body.push_str(&res);
                        self.boxed(output, "Warning, expected an exception:", &body)?;
                        stats.error_mismatches += 1;
                    } else if self.checker.check(want, &res) {
                        write!(output, "{}", res)?;
                    } else {
                        let body = self.checker.diff(want, &res);
                        self.boxed(output, "Warning, output different from expected:", &body)?;
                        stats.output_mismatches += 1;
                    }
                }
                (Some(error), None) => {
                    let body = self.interp.format_trace(error);
                    self.boxed(output, "Warning, unexpected exception:", &body)?;
                    stats.unexpected_errors += 1;
                }
                (Some(error), Some(expected)) => {
                    let summary = error.summary();
                    if self.checker.check(expected, &summary) {
                        // The document anticipated this failure; show
                        // only what ran before it.
                        write!(output, "{}", res)?;
                    } else {
                        let body = self.checker.diff(expected, &summary);
                        self.boxed(output, "Warning, exception different from expected:", &body)?;
                        stats.error_mismatches += 1;
                    }
                }
            }
        } else {
            match &last_err {
                Some(error) => {
                    let body = self.interp.format_trace(error);
                    self.boxed(output, "Warning, unexpected exception:", &body)?;
                    stats.unexpected_errors += 1;
                }
                None => write!(output, "{}", res)?,
            }
        }

        // Pacing cue: in non-interactive paced mode the prompt line
        // marks where the reader would press enter.
        if self.pause && !self.interactive {
            writeln!(output, "{}{}", indent, PS1)?;
        }
        Ok(())
    }

    fn boxed(&self, output: &mut dyn Write, title: &str, body: &str) -> io::Result<()> {
        writeln!(output)?;
        if self.use_ansi {
            let mut maker = BoxMaker::new();
            maker.write(title);
            maker.write("\n");
            maker.write(&"=".repeat(title.len()));
            maker.write("\n\n");
            maker.write(body);
            write!(output, "{}", maker.render())?;
        } else {
            writeln!(output, "{}", title)?;
            writeln!(output, "{}", "=".repeat(title.len()))?;
            write!(output, "{}", body)?;
            if !body.ends_with('\n') {
                writeln!(output)?;
            }
        }
        writeln!(output)?;
        Ok(())
    }
}
