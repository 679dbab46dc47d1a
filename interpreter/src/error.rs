use std::fmt;

/// Errors raised while executing litr statements.
#[derive(Debug)]
pub enum RuntimeError {
    TypeError { expected: &'static str, got: &'static str },
    UndefinedVariable(String),
    UnknownFunction(String),
    WrongArgCount { name: String, expected: usize, got: usize },
    DivisionByZero,
    IndexOutOfBounds { index: i64, len: usize },
    IoError(String),
    Custom(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TypeError { expected, got } => {
                write!(f, "type error: expected {}, got {}", expected, got)
            }
            RuntimeError::UndefinedVariable(name) => write!(f, "undefined variable: {}", name),
            RuntimeError::UnknownFunction(name) => write!(f, "unknown function: {}", name),
            RuntimeError::WrongArgCount { name, expected, got } => {
                write!(f, "{} takes {} argument(s), got {}", name, expected, got)
            }
            RuntimeError::DivisionByZero => write!(f, "division by zero"),
            RuntimeError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
            RuntimeError::IoError(msg) => write!(f, "I/O error: {}", msg),
            RuntimeError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(error: std::io::Error) -> Self {
        RuntimeError::IoError(error.to_string())
    }
}

/// Errors raised while lexing or parsing litr source.
#[derive(Debug)]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line within the lexed source.
    pub line: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        SyntaxError {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error: {}", self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Any failure of a fed statement, carrying the line it happened on.
///
/// The one-line `summary` is what expected-error assertions compare
/// against; the session engine renders the full trace separately.
#[derive(Debug)]
pub struct LangError {
    pub message: String,
    /// 1-based line relative to the chunk (or input) being fed.
    pub line: Option<usize>,
}

impl LangError {
    /// The comparison key: `error: <message>` plus a newline.
    pub fn summary(&self) -> String {
        format!("error: {}\n", self.message)
    }

    pub(crate) fn runtime(error: RuntimeError, line: usize) -> Self {
        LangError {
            message: error.to_string(),
            line: Some(line),
        }
    }

    pub(crate) fn offset_line(mut self, offset: usize) -> Self {
        self.line = self.line.map(|l| l + offset);
        self
    }
}

impl From<RuntimeError> for LangError {
    fn from(error: RuntimeError) -> Self {
        LangError {
            message: error.to_string(),
            line: None,
        }
    }
}

impl From<SyntaxError> for LangError {
    fn from(error: SyntaxError) -> Self {
        LangError {
            line: Some(error.line),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LangError {}
