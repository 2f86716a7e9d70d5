//! Error handling for the UNPIVOT parser and planner

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Line/column anchor of a token in the SQL text (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Grammar violation raised by the tokenizer or parser.
///
/// `position` points at the first token that did not fit the grammar and
/// `message` states what was expected there.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Syntax error at {position}: {message}")]
pub struct SyntaxError {
    pub position: Position,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum PrismError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrismError {
    /// The syntax error carried by this error, if it is one
    pub fn as_syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            PrismError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type PrismResult<T> = std::result::Result<T, PrismError>;

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_err {
    ($msg:expr) => {
        $crate::common::error::PrismError::Internal($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::PrismError::Internal(format!($fmt, $($arg)*))
    };
}
