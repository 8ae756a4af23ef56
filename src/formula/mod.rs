//! # Formula Language
//!
//! Lexer and parser for paraconsistent modal formulas, producing a clean AST.
//! Pure functions — no model, no twist structure, no state: a formula parsed
//! once can be evaluated against any number of models.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Formula;

use crate::Result;

/// Parse a formula string into an AST.
pub fn parse(text: &str) -> Result<Formula> {
    let tokens = lexer::tokenize(text)?;
    parser::parse_formula(&tokens)
}
