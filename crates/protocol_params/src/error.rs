//! Error types for protocol text parsing

use thiserror::Error;

/// Result type alias for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `line` is 1-based
    #[error("syntax error at line {line}: {reason}")]
    SyntaxError { line: usize, reason: String },

    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),
}

impl ParseError {
    pub fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::SyntaxError {
            line,
            reason: reason.into(),
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedDialect(reason.into())
    }

    /// Stable name of the error kind, used by the CLI on stderr
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::SyntaxError { .. } => "SyntaxError",
            ParseError::UnsupportedDialect(_) => "UnsupportedDialect",
        }
    }
}
