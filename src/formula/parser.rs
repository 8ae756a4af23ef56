//! Recursive descent formula parser.
//!
//! Precedence, loosest to tightest: `<->`, `->`, `=>`, `|`, `&`, then the
//! prefix operators `~` / `[]_a` / `<>_a` (which nest freely), then atoms,
//! constants and parentheses. All binary connectives are left-associative.

use crate::{Error, Result};
use super::ast::Formula;
use super::lexer::{Token, TokenKind};

/// Parser state — wraps a token slice with cursor.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: String) -> Error {
        let tok = self.peek();
        Error::Parse {
            position: tok.span.start,
            token: tok.text.clone(),
            message,
        }
    }
}

/// Parse a complete formula from tokens; trailing input is an error.
pub fn parse_formula(tokens: &[Token]) -> Result<Formula> {
    let mut p = Parser::new(tokens);
    let formula = parse_iff(&mut p)?;
    if !p.at(TokenKind::Eof) {
        return Err(p.error(format!(
            "unexpected '{}' after a complete formula",
            p.peek().text
        )));
    }
    Ok(formula)
}

// ============================================================================
// Precedence chain
// ============================================================================

fn parse_iff(p: &mut Parser) -> Result<Formula> {
    let mut left = parse_material_implies(p)?;
    while p.eat(TokenKind::Iff) {
        let right = parse_material_implies(p)?;
        left = Formula::Iff(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_material_implies(p: &mut Parser) -> Result<Formula> {
    let mut left = parse_twist_implies(p)?;
    while p.eat(TokenKind::MaterialImplies) {
        let right = parse_twist_implies(p)?;
        left = Formula::MaterialImplies(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_twist_implies(p: &mut Parser) -> Result<Formula> {
    let mut left = parse_or(p)?;
    while p.eat(TokenKind::TwistImplies) {
        let right = parse_or(p)?;
        left = Formula::Implies(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_or(p: &mut Parser) -> Result<Formula> {
    let mut left = parse_and(p)?;
    while p.eat(TokenKind::Or) {
        let right = parse_and(p)?;
        left = Formula::Or(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and(p: &mut Parser) -> Result<Formula> {
    let mut left = parse_unary(p)?;
    while p.eat(TokenKind::And) {
        let right = parse_unary(p)?;
        left = Formula::And(Box::new(left), Box::new(right));
    }
    Ok(left)
}

/// Prefix operators and primaries. `~`, `[]_a` and `<>_a` all recurse here,
/// so `~[]_a ~p` nests without parentheses.
fn parse_unary(p: &mut Parser) -> Result<Formula> {
    match p.peek_kind() {
        TokenKind::Not => {
            p.advance();
            Ok(Formula::Not(Box::new(parse_unary(p)?)))
        }
        TokenKind::BoxAction => {
            let action = p.advance().text.clone();
            Ok(Formula::Box { action, body: Box::new(parse_unary(p)?) })
        }
        TokenKind::DiamondAction => {
            let action = p.advance().text.clone();
            Ok(Formula::Diamond { action, body: Box::new(parse_unary(p)?) })
        }
        TokenKind::LParen => {
            p.advance();
            let inner = parse_iff(p)?;
            p.expect(TokenKind::RParen, "')'")?;
            Ok(inner)
        }
        TokenKind::One => {
            p.advance();
            Ok(Formula::Top)
        }
        TokenKind::Zero => {
            p.advance();
            Ok(Formula::Bottom)
        }
        TokenKind::Ident => {
            let name = p.advance().text.clone();
            Ok(Formula::Atom(name))
        }
        TokenKind::Eof => Err(p.error("unexpected end of formula: missing operand".into())),
        _ => Err(p.error(format!("unexpected '{}'", p.peek().text))),
    }
}

// ============================================================================
// Tests
// ============================================================================
