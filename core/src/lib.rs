use thiserror::Error;

pub mod ast;
pub mod debug;
pub mod parser;
pub mod printers;
pub mod scanner;
pub mod token;
pub mod types;

pub use crate::ast::Expr;
pub use crate::parser::{parse, ParseError};
pub use crate::scanner::{scan, ScanError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn line(&self) -> u32 {
        match self {
            Self::Scan(err) => err.line(),
            Self::Parse(err) => err.line(),
        }
    }
}

/// Scans and parses `source` as a single expression.
pub fn parse_source(source: &str) -> Result<Expr> {
    let tokens = scan(source)?;
    Ok(parse(tokens)?)
}
