pub mod ast;
pub mod checker;
pub mod driver;
pub mod environment;
pub mod error;
pub mod eval;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod source_map;
pub mod value;

pub use checker::OutputChecker;
pub use driver::{EnvDriver, MathDriver};
pub use environment::Environment;
pub use error::{LangError, RuntimeError, SyntaxError};
pub use interp::Interpreter;
pub use session::{
    LineReader, LiterateSession, ReplayStats, ScriptedReader, SessionError, StdinLineReader,
};
pub use source_map::{SourceRegistry, synthetic_id};
pub use value::Value;
