//! rustyline-backed line input with history.

use std::io;
use std::path::PathBuf;

use interpreter::LineReader;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub struct RustylineReader {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl RustylineReader {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(to_io)?;
        let mut reader = RustylineReader {
            editor,
            history_path: std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".litr_history")),
        };
        if let Some(path) = reader.history_path.clone() {
            // A missing history file is fine on first run.
            let _ = reader.editor.load_history(&path);
        }
        Ok(reader)
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(&line);
                }
                Ok(Some(line))
            }
            // Ctrl-C cancels the line, not the session.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(error) => Err(to_io(error)),
        }
    }
}

impl Drop for RustylineReader {
    fn drop(&mut self) {
        if let Some(path) = &self.history_path {
            let _ = self.editor.save_history(path);
        }
    }
}

fn to_io(error: ReadlineError) -> io::Error {
    io::Error::other(error.to_string())
}
