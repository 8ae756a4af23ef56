//! # Finite Algebraic Structures
//!
//! The three-stage algebra chain behind every model:
//! `Lattice` → `ResiduatedLattice` → `TwistStructure`.
//!
//! Each stage validates exhaustively at construction and is immutable
//! afterwards. Design rule: NO model types, NO formula types here — this
//! module is pure order theory over finite carriers.

pub mod lattice;
pub mod residuated;
pub mod twist;

pub use lattice::{Lattice, ElemId};
pub use residuated::ResiduatedLattice;
pub use twist::{TwistStructure, TwistPair};
