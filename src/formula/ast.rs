//! Formula AST.
//!
//! Pure data — no behavior beyond printing and atom collection, no model or
//! algebra references. Evaluation semantics live in [`crate::eval`].

use std::collections::BTreeSet;
use std::fmt;

/// A parsed formula.
///
/// `Display` pretty-prints with minimal parentheses; the output re-parses to
/// a structurally identical AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// The constant `1` — absolute true.
    Top,
    /// The constant `0` — absolute false.
    Bottom,
    /// An atomic proposition.
    Atom(String),
    /// `~φ`
    Not(Box<Formula>),
    /// `φ & ψ` — weak meet.
    And(Box<Formula>, Box<Formula>),
    /// `φ | ψ` — weak join.
    Or(Box<Formula>, Box<Formula>),
    /// `φ => ψ` — residuated implication.
    Implies(Box<Formula>, Box<Formula>),
    /// `φ -> ψ` — material implication, `~φ | ψ`.
    MaterialImplies(Box<Formula>, Box<Formula>),
    /// `φ <-> ψ` — material equivalence.
    Iff(Box<Formula>, Box<Formula>),
    /// `<>_a φ`
    Diamond { action: String, body: Box<Formula> },
    /// `[]_a φ`
    Box { action: String, body: Box<Formula> },
}

impl Formula {
    /// The atomic propositions the formula references (constants excluded).
    /// Callers can use this to pre-check valuations before evaluating.
    pub fn atoms(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms(&self, out: &mut BTreeSet<String>) {
        match self {
            Formula::Top | Formula::Bottom => {}
            Formula::Atom(name) => {
                out.insert(name.clone());
            }
            Formula::Not(body) => body.collect_atoms(out),
            Formula::And(l, r)
            | Formula::Or(l, r)
            | Formula::Implies(l, r)
            | Formula::MaterialImplies(l, r)
            | Formula::Iff(l, r) => {
                l.collect_atoms(out);
                r.collect_atoms(out);
            }
            Formula::Diamond { body, .. } | Formula::Box { body, .. } => {
                body.collect_atoms(out)
            }
        }
    }

    /// Binding strength, for minimal-parenthesis printing. Higher binds
    /// tighter.
    fn precedence(&self) -> u8 {
        match self {
            Formula::Iff(..) => 1,
            Formula::MaterialImplies(..) => 2,
            Formula::Implies(..) => 3,
            Formula::Or(..) => 4,
            Formula::And(..) => 5,
            Formula::Not(..) | Formula::Diamond { .. } | Formula::Box { .. } => 6,
            Formula::Top | Formula::Bottom | Formula::Atom(..) => 7,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < min {
            write!(f, "(")?;
        }
        match self {
            Formula::Top => write!(f, "1")?,
            Formula::Bottom => write!(f, "0")?,
            Formula::Atom(name) => write!(f, "{name}")?,
            Formula::Not(body) => {
                write!(f, "~")?;
                body.fmt_prec(f, 6)?;
            }
            Formula::Diamond { action, body } => {
                write!(f, "<>_{action} ")?;
                body.fmt_prec(f, 6)?;
            }
            Formula::Box { action, body } => {
                write!(f, "[]_{action} ")?;
                body.fmt_prec(f, 6)?;
            }
            Formula::And(l, r) => Self::fmt_binary(f, l, "&", r, prec)?,
            Formula::Or(l, r) => Self::fmt_binary(f, l, "|", r, prec)?,
            Formula::Implies(l, r) => Self::fmt_binary(f, l, "=>", r, prec)?,
            Formula::MaterialImplies(l, r) => Self::fmt_binary(f, l, "->", r, prec)?,
            Formula::Iff(l, r) => Self::fmt_binary(f, l, "<->", r, prec)?,
        }
        if prec < min {
            write!(f, ")")?;
        }
        Ok(())
    }

    /// Left-associative binary connective: the left operand may share the
    /// level, the right operand must bind strictly tighter.
    fn fmt_binary(
        f: &mut fmt::Formatter<'_>,
        l: &Formula,
        op: &str,
        r: &Formula,
        prec: u8,
    ) -> fmt::Result {
        l.fmt_prec(f, prec)?;
        write!(f, " {op} ")?;
        r.fmt_prec(f, prec + 1)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

// ============================================================================
// Tests
// ============================================================================
