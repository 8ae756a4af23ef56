//! Formula lexer — tokenizes formula text.
//!
//! Modal operators carry their action label as a single token (`[]_a`,
//! `<>_a`), so the parser never has to re-assemble them. `<->` is
//! disambiguated from `<>_a` here.

use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Identifier or action-label text; operator glyph otherwise.
    pub text: String,
}

/// Source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Constants and atoms
    One, Zero, Ident,

    // Connectives
    Not,             // ~
    And,             // &
    Or,              // |
    TwistImplies,    // =>
    MaterialImplies, // ->
    Iff,             // <->

    // Modalities (text = action label)
    BoxAction,     // []_a
    DiamondAction, // <>_a

    // Punctuation
    LParen, RParen,

    Eof,
}

/// Tokenize a formula string.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }

            '(' => { chars.next(); tokens.push(punct(TokenKind::LParen, pos, "(")); }
            ')' => { chars.next(); tokens.push(punct(TokenKind::RParen, pos, ")")); }
            '~' => { chars.next(); tokens.push(punct(TokenKind::Not, pos, "~")); }
            '&' => { chars.next(); tokens.push(punct(TokenKind::And, pos, "&")); }
            '|' => { chars.next(); tokens.push(punct(TokenKind::Or, pos, "|")); }

            '=' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '>'))) {
                    chars.next();
                    tokens.push(punct(TokenKind::TwistImplies, pos, "=>"));
                } else {
                    return Err(error(pos, "=", "expected '>' after '='"));
                }
            }

            '-' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '>'))) {
                    chars.next();
                    tokens.push(punct(TokenKind::MaterialImplies, pos, "->"));
                } else {
                    return Err(error(pos, "-", "expected '>' after '-'"));
                }
            }

            // '<' begins either '<->' or a diamond '<>_a'
            '<' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '-')) => {
                        chars.next();
                        if matches!(chars.peek(), Some(&(_, '>'))) {
                            chars.next();
                            tokens.push(punct(TokenKind::Iff, pos, "<->"));
                        } else {
                            return Err(error(pos, "<-", "expected '>' after '<-'"));
                        }
                    }
                    Some(&(_, '>')) => {
                        chars.next();
                        let action = modal_action(&mut chars, pos, "diamond operator '<>'")?;
                        let end = pos + 3 + action.len();
                        tokens.push(Token {
                            kind: TokenKind::DiamondAction,
                            span: Span { start: pos, end },
                            text: action,
                        });
                    }
                    _ => return Err(error(pos, "<", "expected '>' or '-' after '<'")),
                }
            }

            '[' => {
                chars.next();
                if !matches!(chars.peek(), Some(&(_, ']'))) {
                    return Err(error(pos, "[", "expected ']' after '['"));
                }
                chars.next();
                let action = modal_action(&mut chars, pos, "box operator '[]'")?;
                let end = pos + 3 + action.len();
                tokens.push(Token {
                    kind: TokenKind::BoxAction,
                    span: Span { start: pos, end },
                    text: action,
                });
            }

            c if c.is_alphanumeric() || c == '_' => {
                let start = pos;
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let kind = constant_or_ident(&ident, start)?;
                tokens.push(Token {
                    kind,
                    span: Span { start, end: start + ident.len() },
                    text: ident,
                });
            }

            other => {
                return Err(error(pos, &other.to_string(), format!("unknown token '{other}'")));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });

    Ok(tokens)
}

/// Read the `_action` suffix of a modal operator.
fn modal_action(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
    operator: &str,
) -> Result<String> {
    if !matches!(chars.peek(), Some(&(_, '_'))) {
        return Err(error(start, operator, format!("{operator} requires an action label")));
    }
    chars.next();
    let mut action = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            action.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if action.is_empty() {
        return Err(error(start, operator, format!("{operator} requires an action label")));
    }
    Ok(action)
}

fn constant_or_ident(ident: &str, start: usize) -> Result<TokenKind> {
    if ident == "1" || ident.eq_ignore_ascii_case("top") {
        return Ok(TokenKind::One);
    }
    if ident == "0" || ident.eq_ignore_ascii_case("bot") {
        return Ok(TokenKind::Zero);
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(error(start, ident, format!("unknown token '{ident}'")));
    }
    Ok(TokenKind::Ident)
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token {
        kind,
        span: Span { start: pos, end: pos + text.len() },
        text: text.to_string(),
    }
}

fn error(position: usize, token: &str, message: impl Into<String>) -> Error {
    Error::Parse {
        position,
        token: token.to_string(),
        message: message.into(),
    }
}

// ============================================================================
// Tests
// ============================================================================
