//! # plts-rs — Paraconsistent Labelled Transition Systems
//!
//! An algebraic semantics engine for paraconsistent modal logic over twist
//! structures.
//!
//! ## Design Principles
//!
//! 1. **Validate once, share freely**: `Lattice`, `ResiduatedLattice` and
//!    `TwistStructure` are checked exhaustively at construction and immutable
//!    afterwards — share them across models with `Arc`, no locking
//! 2. **Clean DTOs**: `TwistPair`, `World` and the `export` shapes cross all
//!    boundaries
//! 3. **Parser owns nothing**: formula text → `Formula` is a pure function
//! 4. **Models are explicit**: no ambient workspace — every evaluation names
//!    its model and world
//!
//! ## Quick Start
//!
//! ```rust
//! use plts_rs::{Lattice, ResiduatedLattice, TwistStructure, Plts, Validity, Valuation};
//! use std::sync::Arc;
//!
//! # fn example() -> plts_rs::Result<()> {
//! // The two-element Boolean base: 0 ≤ 1, tensor = meet
//! let lattice = Lattice::build(["0", "1"], [("0", "1")])?;
//! let rl = ResiduatedLattice::extend(lattice, [
//!     ("0", "0", "0"), ("0", "1", "0"),
//!     ("1", "0", "0"), ("1", "1", "1"),
//! ])?;
//! let twist = Arc::new(TwistStructure::generate(Arc::new(rl)));
//!
//! // A two-world model: w1 --go--> w2, where p holds at w2
//! let mut model = Plts::new(Arc::clone(&twist));
//! let tt = twist.absolute_true();
//! model.add_world("w1", Valuation::new())?;
//! model.add_world("w2", [("p", tt)])?;
//! model.add_relation("w1", "w2", "go", tt)?;
//!
//! match model.check("<>_go p")? {
//!     Validity::Valid => println!("valid in every world"),
//!     Validity::Invalid(ces) => println!("{} counter-examples", ces.len()),
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Input → Output |
//! |-------|--------|----------------|
//! | Lattice engine | `algebra::lattice` | elements + order pairs → meet/join tables |
//! | Residuation | `algebra::residuated` | tensor table → residuum, adjunction-checked |
//! | Twist structure | `algebra::twist` | residuated lattice → pair algebra A² |
//! | Model | `plts` | worlds + weighted labelled relations |
//! | Parser | `formula` | text → `Formula` AST |
//! | Evaluator | `eval` | AST × model × world → `TwistPair` |
//! | Validity | `eval` | AST × model → `Valid` / counter-examples |

// ============================================================================
// Modules
// ============================================================================

pub mod algebra;
pub mod plts;
pub mod formula;
pub mod eval;
pub mod export;

// ============================================================================
// Re-exports: Algebras
// ============================================================================

pub use algebra::{
    Lattice, ResiduatedLattice, TwistStructure,
    ElemId, TwistPair,
};

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use plts::{Plts, World, Valuation};

// ============================================================================
// Re-exports: Formulas and evaluation
// ============================================================================

pub use formula::{parse, Formula};
pub use eval::{evaluate, check_validity, Validity, CounterExample};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid lattice: {message}")]
    InvalidLattice { message: String },

    #[error("not residuated: {message}")]
    NotResiduated { message: String },

    #[error("duplicate world '{id}'")]
    DuplicateWorld { id: String },

    #[error("unknown world '{id}'")]
    UnknownWorld { id: String },

    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    #[error("syntax error at position {position}: {message}")]
    Parse {
        position: usize,
        token: String,
        message: String,
    },

    #[error("atom '{atom}' has no value at world '{world}'")]
    UndefinedAtom { atom: String, world: String },

    #[error("action '{action}' is not declared in the model")]
    UndefinedAction { action: String },
}

pub type Result<T> = std::result::Result<T, Error>;
