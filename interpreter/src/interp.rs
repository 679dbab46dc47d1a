//! Line-at-a-time interpreter.
//!
//! Lines are fed one by one; a statement only runs once its delimiters
//! balance. This is what lets a document or console feed multi-line
//! constructs naturally.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::LangError;
use crate::eval::exec_block;
use crate::lexer::open_delimiters;
use crate::parser::parse;
use crate::source_map::SourceRegistry;

pub struct Interpreter {
    pub env: Environment,
    buffer: Vec<String>,
    /// Lines fed since the current chunk began.
    lines_pushed: usize,
    /// Line (0-based, chunk-relative) the buffered statement started on.
    buffer_start: usize,
    /// Synthetic id of the chunk being replayed, if any.
    context: Option<String>,
    sources: Option<Rc<RefCell<SourceRegistry>>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Environment::new(),
            buffer: Vec::new(),
            lines_pushed: 0,
            buffer_start: 0,
            context: None,
            sources: None,
        }
    }

    /// Feed one line. Returns `Ok(true)` when more input is needed to
    /// complete the statement, `Ok(false)` when the buffered source ran.
    pub fn push(&mut self, line: &str, output: &mut dyn Write) -> Result<bool, LangError> {
        if self.buffer.is_empty() {
            self.buffer_start = self.lines_pushed;
        }
        self.buffer.push(line.to_string());
        self.lines_pushed += 1;

        let source = self.buffer.join("\n");
        match open_delimiters(&source) {
            Ok(open) if open > 0 => return Ok(true),
            Ok(_) => {}
            Err(error) => {
                let start = self.buffer_start;
                self.buffer.clear();
                return Err(LangError::from(error).offset_line(start));
            }
        }

        let start = self.buffer_start;
        self.buffer.clear();
        self.run_source(&source, output)
            .map_err(|e| e.offset_line(start))?;
        Ok(false)
    }

    fn run_source(&mut self, source: &str, output: &mut dyn Write) -> Result<(), LangError> {
        let stmts = parse(source)?;
        exec_block(&stmts, &mut self.env, output, true)
    }

    /// True while a partially-fed statement is buffered.
    pub fn more(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Discard a partially-fed statement.
    pub fn reset_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Mark the start of a replayed chunk; subsequent errors trace to `id`.
    pub fn begin_chunk(&mut self, id: &str) {
        self.buffer.clear();
        self.lines_pushed = 0;
        self.buffer_start = 0;
        self.context = Some(id.to_string());
    }

    /// Leave chunk context (interactive input has no synthetic id).
    pub fn end_chunk(&mut self) {
        self.buffer.clear();
        self.lines_pushed = 0;
        self.buffer_start = 0;
        self.context = None;
    }

    pub fn install_sources(&mut self, sources: Rc<RefCell<SourceRegistry>>) {
        self.sources = Some(sources);
    }

    pub fn remove_sources(&mut self) {
        self.sources = None;
    }

    /// Render `error` as a short trace: the summary line, then where it
    /// happened and the quoted source line when the registry has it.
    pub fn format_trace(&self, error: &LangError) -> String {
        let mut text = error.summary();
        let Some(line) = error.line else {
            if let Some(ctx) = &self.context {
                text.push_str(&format!("  at {}\n", ctx));
            }
            return text;
        };
        match &self.context {
            Some(ctx) => {
                text.push_str(&format!("  at {}, line {}\n", ctx, line));
                if let Some(sources) = &self.sources
                    && let Some(source) = sources.borrow().resolve_line(ctx, line)
                {
                    text.push_str(&format!("    {}\n", source));
                }
            }
            None => {
                text.push_str(&format!("  at <input>, line {}\n", line));
            }
        }
        text
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
