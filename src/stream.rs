//! Loading and checking the token stream produced by the lexer.
//!
//! The wire format is a JSON array of [`Token`]s, kinds externally tagged:
//!
//! ```json
//! [
//!   { "token_type": "PRINT", "lexeme": "print", "line": 1 },
//!   { "token_type": { "NUMBER": 1.0 }, "lexeme": "1", "line": 1 },
//!   { "token_type": "SEMICOLON", "lexeme": ";", "line": 1 },
//!   { "token_type": "EOF", "lexeme": "", "line": 1 }
//! ]
//! ```

use std::io::Read;

use log::{debug, info};

use crate::error::StreamError;
use crate::token::Token;

/// Decode a token stream from `reader` and check it.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Token>, StreamError> {
    let tokens: Vec<Token> = serde_json::from_reader(reader)?;

    info!("Decoded {} tokens", tokens.len());

    validate(&tokens)?;

    Ok(tokens)
}

/// Decode a token stream held in memory and check it.
pub fn from_slice(bytes: &[u8]) -> Result<Vec<Token>, StreamError> {
    let tokens: Vec<Token> = serde_json::from_slice(bytes)?;

    info!("Decoded {} tokens from {} bytes", tokens.len(), bytes.len());

    validate(&tokens)?;

    Ok(tokens)
}

/// A stream is well formed when it ends with exactly one `EOF` and carries
/// no other `EOF` before it.
pub fn validate(tokens: &[Token]) -> Result<(), StreamError> {
    let (last, rest) = tokens.split_last().ok_or(StreamError::Empty)?;

    if !last.is_eof() {
        debug!("Stream rejected: last token is {:?}", last.token_type);

        return Err(StreamError::MissingEof { line: last.line });
    }

    if let Some(index) = rest.iter().position(Token::is_eof) {
        debug!("Stream rejected: EOF at index {}", index);

        return Err(StreamError::EarlyEof {
            index,
            line: rest[index].line,
        });
    }

    Ok(())
}
