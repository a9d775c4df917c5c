use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("error[{line}:{col}]: {msg}")]
    Error {
        msg: String,
        line: usize,
        col: usize,
    },
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Errors recovered from without aborting the parse.
    errors: Vec<ParseError>,
}

mod blocks;
mod core;
mod decls;
mod functions;
mod header;
mod types;
