pub mod analyzer;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod scope;
pub mod source;
