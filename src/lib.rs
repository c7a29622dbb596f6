pub mod ast;
pub mod error;
pub mod parser;
pub mod stream;
pub mod token;

pub use error::{ParseError, StreamError};
pub use parser::{Parser, Program};
