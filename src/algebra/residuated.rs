//! Residuated lattice engine — a monoidal tensor over a lattice, with the
//! residuum derived and the adjunction law checked exhaustively.

use crate::{Error, Result};
use super::lattice::{ElemId, Lattice};

/// A residuated lattice: a [`Lattice`] plus a commutative monoidal tensor
/// `⊗` with the lattice top as identity, and the derived residuum `→`
/// satisfying `a⊗b ≤ c ⟺ a ≤ b→c`.
///
/// Built once via [`ResiduatedLattice::extend`]; immutable afterwards.
pub struct ResiduatedLattice {
    lattice: Lattice,
    tensor: Vec<ElemId>,
    residuum: Vec<ElemId>,
}

impl ResiduatedLattice {
    /// Extend a lattice with a tensor given as `(a, b, result)` name triples.
    ///
    /// Validates that the table is total, commutative, associative, and has
    /// the lattice top as identity; derives the residuum as the maximum `a`
    /// with `a⊗b ≤ c` for every `(b, c)`; finally re-checks the adjunction
    /// law over all triples. Any failure is [`Error::NotResiduated`], except
    /// unknown element names which are [`Error::TypeMismatch`].
    pub fn extend<T, A, B, C>(lattice: Lattice, tensor_triples: T) -> Result<Self>
    where
        T: IntoIterator<Item = (A, B, C)>,
        A: AsRef<str>,
        B: AsRef<str>,
        C: AsRef<str>,
    {
        let n = lattice.len();

        let mut table: Vec<Option<ElemId>> = vec![None; n * n];
        for (a, b, r) in tensor_triples {
            let ia = lattice.resolve(a.as_ref())?;
            let ib = lattice.resolve(b.as_ref())?;
            let ir = lattice.resolve(r.as_ref())?;
            let slot = &mut table[ia.0 as usize * n + ib.0 as usize];
            if let Some(prev) = *slot {
                if prev != ir {
                    return Err(not_residuated(format!(
                        "conflicting tensor entries for ('{}', '{}')",
                        lattice.name(ia),
                        lattice.name(ib)
                    )));
                }
            }
            *slot = Some(ir);
        }

        let mut tensor = Vec::with_capacity(n * n);
        for a in 0..n {
            for b in 0..n {
                tensor.push(table[a * n + b].ok_or_else(|| {
                    not_residuated(format!(
                        "tensor table is incomplete: missing ('{}', '{}')",
                        lattice.name(ElemId(a as u16)),
                        lattice.name(ElemId(b as u16))
                    ))
                })?);
            }
        }

        // Commutativity.
        for a in 0..n {
            for b in (a + 1)..n {
                if tensor[a * n + b] != tensor[b * n + a] {
                    return Err(not_residuated(format!(
                        "tensor is not commutative at ('{}', '{}')",
                        lattice.name(ElemId(a as u16)),
                        lattice.name(ElemId(b as u16))
                    )));
                }
            }
        }

        // Identity: top ⊗ a = a.
        let top = lattice.top();
        for a in lattice.elems() {
            if tensor[top.0 as usize * n + a.0 as usize] != a {
                return Err(not_residuated(format!(
                    "lattice top is not a tensor identity: ⊤⊗'{}' = '{}'",
                    lattice.name(a),
                    lattice.name(tensor[top.0 as usize * n + a.0 as usize])
                )));
            }
        }

        // Associativity.
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    let ab_c = tensor[tensor[a * n + b].0 as usize * n + c];
                    let a_bc = tensor[a * n + tensor[b * n + c].0 as usize];
                    if ab_c != a_bc {
                        return Err(not_residuated(format!(
                            "tensor is not associative at ('{}', '{}', '{}')",
                            lattice.name(ElemId(a as u16)),
                            lattice.name(ElemId(b as u16)),
                            lattice.name(ElemId(c as u16))
                        )));
                    }
                }
            }
        }

        // Residuum: b→c is the maximum a with a⊗b ≤ c, by brute force.
        let mut residuum = Vec::with_capacity(n * n);
        for b in 0..n {
            for c in 0..n {
                let candidates: Vec<ElemId> = lattice
                    .elems()
                    .filter(|a| lattice.leq(tensor[a.0 as usize * n + b], ElemId(c as u16)))
                    .collect();
                let max = candidates
                    .iter()
                    .find(|&&a| candidates.iter().all(|&y| lattice.leq(y, a)))
                    .copied()
                    .ok_or_else(|| {
                        not_residuated(format!(
                            "no maximum a with a⊗'{}' ≤ '{}': the adjunction law cannot hold",
                            lattice.name(ElemId(b as u16)),
                            lattice.name(ElemId(c as u16))
                        ))
                    })?;
                residuum.push(max);
            }
        }

        // Consistency guarantee: the adjunction law over all triples.
        for a in lattice.elems() {
            for b in lattice.elems() {
                for c in lattice.elems() {
                    let tensored = tensor[a.0 as usize * n + b.0 as usize];
                    let residuated = residuum[b.0 as usize * n + c.0 as usize];
                    if lattice.leq(tensored, c) != lattice.leq(a, residuated) {
                        return Err(not_residuated(format!(
                            "adjunction law fails at ('{}', '{}', '{}')",
                            lattice.name(a),
                            lattice.name(b),
                            lattice.name(c)
                        )));
                    }
                }
            }
        }

        tracing::debug!(elements = n, "residuum derived, adjunction law holds");

        Ok(Self { lattice, tensor, residuum })
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub fn tensor(&self, a: ElemId, b: ElemId) -> ElemId {
        self.tensor[a.0 as usize * self.lattice.len() + b.0 as usize]
    }

    pub fn residuum(&self, a: ElemId, b: ElemId) -> ElemId {
        self.residuum[a.0 as usize * self.lattice.len() + b.0 as usize]
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    // Delegations. The twist structure and the model talk mostly to these.

    pub fn len(&self) -> usize {
        self.lattice.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn elems(&self) -> impl Iterator<Item = ElemId> + '_ {
        self.lattice.elems()
    }

    pub fn name(&self, e: ElemId) -> &str {
        self.lattice.name(e)
    }

    pub fn elem(&self, name: &str) -> Option<ElemId> {
        self.lattice.elem(name)
    }

    pub fn resolve(&self, name: &str) -> Result<ElemId> {
        self.lattice.resolve(name)
    }

    pub fn leq(&self, a: ElemId, b: ElemId) -> bool {
        self.lattice.leq(a, b)
    }

    pub fn meet(&self, a: ElemId, b: ElemId) -> ElemId {
        self.lattice.meet(a, b)
    }

    pub fn join(&self, a: ElemId, b: ElemId) -> ElemId {
        self.lattice.join(a, b)
    }

    pub fn top(&self) -> ElemId {
        self.lattice.top()
    }

    pub fn bottom(&self) -> ElemId {
        self.lattice.bottom()
    }
}

impl std::fmt::Debug for ResiduatedLattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResiduatedLattice")
            .field("lattice", &self.lattice)
            .finish()
    }
}

fn not_residuated(message: impl Into<String>) -> Error {
    Error::NotResiduated { message: message.into() }
}

// ============================================================================
// Tests
// ============================================================================
