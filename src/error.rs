//! Error hierarchy for **loxparse**.
//!
//! Two families live here:
//!
//! * [`ParseError`]: a *diagnostic*.  The parser accumulates these in order and
//!   hands them back next to the (possibly partial) tree.  Only the `Syntax`
//!   variant aborts the declaration being parsed; `Limit` and `Target` are
//!   advisory and parsing carries on.
//! * [`StreamError`]: the token stream handed over by the lexer broke its
//!   contract (bad JSON, missing or misplaced `EOF`).
//!
//! The module **does not** print diagnostics itself

use log::info;
use thiserror::Error;

use crate::token::Token;

/// A single parser diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Structural grammar violation.  Aborts the current declaration and
    /// triggers synchronization.
    #[error("Error near {near} at line {line}: {message}")]
    Syntax {
        /// Rendered location (`'lexeme'` or `end of input`).
        near: String,

        /// 1‑based line of the offending token.
        line: usize,

        /// Human‑readable description.
        message: String,
    },

    /// Parameter or argument count above the ceiling.  Advisory.
    #[error("Error near {near} at line {line}: {message}")]
    Limit {
        near: String,
        line: usize,
        message: String,
    },

    /// Left side of `=` is not a plain variable.  Advisory.
    #[error("Error near {near} at line {line}: {message}")]
    Target {
        near: String,
        line: usize,
        message: String,
    },
}

fn near(token: &Token) -> String {
    if token.is_eof() {
        "end of input".to_string()
    } else {
        format!("'{}'", token.lexeme)
    }
}

impl ParseError {
    /// Helper constructor for fatal grammar errors.
    pub fn syntax<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Syntax error: line={}, msg={}", token.line, message);

        ParseError::Syntax {
            near: near(token),
            line: token.line,
            message,
        }
    }

    /// Helper constructor for arity ceiling violations.
    pub fn limit<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Limit error: line={}, msg={}", token.line, message);

        ParseError::Limit {
            near: near(token),
            line: token.line,
            message,
        }
    }

    /// Helper constructor for illegal assignment targets.
    pub fn target<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Target error: line={}, msg={}", token.line, message);

        ParseError::Target {
            near: near(token),
            line: token.line,
            message,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::Limit { line, .. }
            | ParseError::Target { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::Syntax { message, .. }
            | ParseError::Limit { message, .. }
            | ParseError::Target { message, .. } => message,
        }
    }

    /// `true` only for errors that abort the enclosing declaration.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }
}

/// The token stream violates the lexer → parser contract.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StreamError {
    /// The payload is not a JSON array of tokens, or reading it failed.
    #[error("malformed token stream: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token stream is empty")]
    Empty,

    /// Last token is not the `EOF` sentinel.
    #[error("token stream must end with EOF (last token at line {line})")]
    MissingEof { line: usize },

    /// An `EOF` shows up before the final position.
    #[error("unexpected EOF at index {index} (line {line}) before end of token stream")]
    EarlyEof { index: usize, line: usize },
}

/// Crate‑wide `Result` alias used for fatal propagation inside the parser.
pub type Result<T> = std::result::Result<T, ParseError>;
