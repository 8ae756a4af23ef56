//! Twist structure generator — the pair algebra A² over a residuated
//! lattice.
//!
//! Elements are pairs `(t, f)`: evidence for and evidence against. The truth
//! order refines "more true, less false"; the knowledge order refines "more
//! evidence of either kind". Both live over the same carrier, so a twist
//! structure carries two families of operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::lattice::ElemId;
use super::residuated::ResiduatedLattice;

/// An element of a twist structure: evidence for (`t`) and against (`f`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TwistPair {
    pub t: ElemId,
    pub f: ElemId,
}

impl TwistPair {
    pub fn new(t: ElemId, f: ElemId) -> Self {
        Self { t, f }
    }
}

/// The pair algebra A² derived from a residuated lattice.
///
/// Holds a shared reference to its generating [`ResiduatedLattice`] (never a
/// copy); the pair list and designated elements are its own. All operations
/// are O(1) lookups into the base tables.
pub struct TwistStructure {
    base: Arc<ResiduatedLattice>,
    pairs: Vec<TwistPair>,
    absolute_true: TwistPair,
    absolute_false: TwistPair,
}

impl TwistStructure {
    /// Generate A² over a validated residuated lattice.
    ///
    /// Pure derivation with no failure modes of its own — the input can only
    /// exist validated. Pairs are enumerated row-major over `(t, f)`, which
    /// fixes a canonical element order for display and export.
    pub fn generate(base: Arc<ResiduatedLattice>) -> Self {
        debug_assert!(adjunction_holds(&base), "generating lattice lost the adjunction law");

        let mut pairs = Vec::with_capacity(base.len() * base.len());
        for t in base.elems() {
            for f in base.elems() {
                pairs.push(TwistPair::new(t, f));
            }
        }

        let absolute_true = TwistPair::new(base.top(), base.bottom());
        let absolute_false = TwistPair::new(base.bottom(), base.top());

        tracing::debug!(pairs = pairs.len(), "twist structure generated");

        Self { base, pairs, absolute_true, absolute_false }
    }

    // ========================================================================
    // Carrier
    // ========================================================================

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// All pairs in canonical order.
    pub fn elements(&self) -> impl Iterator<Item = TwistPair> + '_ {
        self.pairs.iter().copied()
    }

    /// The generating residuated lattice.
    pub fn base(&self) -> &ResiduatedLattice {
        &self.base
    }

    /// Whether both components index into the base carrier.
    pub fn contains(&self, p: TwistPair) -> bool {
        self.base.lattice().contains(p.t) && self.base.lattice().contains(p.f)
    }

    /// Resolve a pair of element names into a member of this structure.
    pub fn pair(&self, t: &str, f: &str) -> crate::Result<TwistPair> {
        Ok(TwistPair::new(self.base.resolve(t)?, self.base.resolve(f)?))
    }

    /// The component names of a pair, for display and export.
    pub fn names(&self, p: TwistPair) -> (&str, &str) {
        (self.base.name(p.t), self.base.name(p.f))
    }

    pub fn absolute_true(&self) -> TwistPair {
        self.absolute_true
    }

    pub fn absolute_false(&self) -> TwistPair {
        self.absolute_false
    }

    // ========================================================================
    // Truth order
    // ========================================================================

    /// `(t1,f1) ≤ (t2,f2)` ⟺ t1 ≤ t2 and f2 ≤ f1.
    pub fn leq(&self, p: TwistPair, q: TwistPair) -> bool {
        self.base.leq(p.t, q.t) && self.base.leq(q.f, p.f)
    }

    pub fn meet(&self, p: TwistPair, q: TwistPair) -> TwistPair {
        TwistPair::new(self.base.meet(p.t, q.t), self.base.join(p.f, q.f))
    }

    pub fn join(&self, p: TwistPair, q: TwistPair) -> TwistPair {
        TwistPair::new(self.base.join(p.t, q.t), self.base.meet(p.f, q.f))
    }

    pub fn negation(&self, p: TwistPair) -> TwistPair {
        TwistPair::new(p.f, p.t)
    }

    /// Residuated implication: `(t1,f1) ⇒ (t2,f2) = (t1→t2, t1⊗f2)`.
    pub fn implication(&self, p: TwistPair, q: TwistPair) -> TwistPair {
        TwistPair::new(self.base.residuum(p.t, q.t), self.base.tensor(p.t, q.f))
    }

    /// Meet of a set of pairs in the truth order; empty meet is absolute-true.
    pub fn meet_all(&self, pairs: impl IntoIterator<Item = TwistPair>) -> TwistPair {
        let (fors, againsts): (Vec<ElemId>, Vec<ElemId>) =
            pairs.into_iter().map(|p| (p.t, p.f)).unzip();
        let lattice = self.base.lattice();
        TwistPair::new(lattice.meet_all(fors), lattice.join_all(againsts))
    }

    /// Join of a set of pairs in the truth order; empty join is absolute-false.
    pub fn join_all(&self, pairs: impl IntoIterator<Item = TwistPair>) -> TwistPair {
        let (fors, againsts): (Vec<ElemId>, Vec<ElemId>) =
            pairs.into_iter().map(|p| (p.t, p.f)).unzip();
        let lattice = self.base.lattice();
        TwistPair::new(lattice.join_all(fors), lattice.meet_all(againsts))
    }

    // ========================================================================
    // Knowledge order
    // ========================================================================

    /// `(t1,f1) ⊑ (t2,f2)` ⟺ t1 ≤ t2 and f1 ≤ f2 — more evidence of both kinds.
    pub fn knowledge_leq(&self, p: TwistPair, q: TwistPair) -> bool {
        self.base.leq(p.t, q.t) && self.base.leq(p.f, q.f)
    }

    /// Knowledge-order meet: the evidence both sides agree on.
    pub fn consensus(&self, p: TwistPair, q: TwistPair) -> TwistPair {
        TwistPair::new(self.base.meet(p.t, q.t), self.base.meet(p.f, q.f))
    }

    /// Knowledge-order join: accept the evidence of either side.
    pub fn gullibility(&self, p: TwistPair, q: TwistPair) -> TwistPair {
        TwistPair::new(self.base.join(p.t, q.t), self.base.join(p.f, q.f))
    }

    // ========================================================================
    // Hasse support
    // ========================================================================

    /// Covering pairs of the truth order — the Hasse diagram edge set
    /// consumed by diagram renderers.
    pub fn covers(&self) -> Vec<(TwistPair, TwistPair)> {
        let mut out = Vec::new();
        for &p in &self.pairs {
            for &q in &self.pairs {
                if p == q || !self.leq(p, q) {
                    continue;
                }
                let between = self
                    .pairs
                    .iter()
                    .any(|&c| c != p && c != q && self.leq(p, c) && self.leq(c, q));
                if !between {
                    out.push((p, q));
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for TwistStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwistStructure")
            .field("base", &self.base)
            .field("pairs", &self.pairs.len())
            .finish()
    }
}

fn adjunction_holds(rl: &ResiduatedLattice) -> bool {
    rl.elems().all(|a| {
        rl.elems().all(|b| {
            rl.elems()
                .all(|c| rl.leq(rl.tensor(a, b), c) == rl.leq(a, rl.residuum(b, c)))
        })
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lattice;

    fn bool_twist() -> TwistStructure {
        let lattice = Lattice::build(["0", "1"], [("0", "1")]).unwrap();
        let rl = ResiduatedLattice::extend(
            lattice,
            [
                ("0", "0", "0"),
                ("0", "1", "0"),
                ("1", "0", "0"),
                ("1", "1", "1"),
            ],
        )
        .unwrap();
        TwistStructure::generate(Arc::new(rl))
    }

    #[test]
    fn test_four_elements_over_boolean_base() {
        let ts = bool_twist();
        assert_eq!(ts.len(), 4);
        let (t, f) = ts.names(ts.absolute_true());
        assert_eq!((t, f), ("1", "0"));
    }

    #[test]
    fn test_negation_is_involution() {
        let ts = bool_twist();
        for p in ts.elements() {
            assert_eq!(ts.negation(ts.negation(p)), p);
        }
    }

    #[test]
    fn test_absolutes_are_identities() {
        let ts = bool_twist();
        for p in ts.elements() {
            assert_eq!(ts.meet(p, ts.absolute_true()), p);
            assert_eq!(ts.join(p, ts.absolute_false()), p);
        }
    }

    #[test]
    fn test_truth_order() {
        let ts = bool_twist();
        assert!(ts.leq(ts.absolute_false(), ts.absolute_true()));
        assert!(!ts.leq(ts.absolute_true(), ts.absolute_false()));
        // (0,0) and (1,1) are incomparable in the truth order.
        let both = ts.pair("1", "1").unwrap();
        let neither = ts.pair("0", "0").unwrap();
        assert!(!ts.leq(both, neither));
        assert!(!ts.leq(neither, both));
    }

    #[test]
    fn test_knowledge_order_and_consensus() {
        let ts = bool_twist();
        let neither = ts.pair("0", "0").unwrap();
        let both = ts.pair("1", "1").unwrap();
        // ⊑ runs from no evidence to contradictory evidence.
        assert!(ts.knowledge_leq(neither, both));
        assert!(ts.knowledge_leq(neither, ts.absolute_true()));
        // Consensus of opposite verdicts keeps nothing.
        assert_eq!(ts.consensus(ts.absolute_true(), ts.absolute_false()), neither);
        assert_eq!(ts.gullibility(ts.absolute_true(), ts.absolute_false()), both);
    }

    #[test]
    fn test_implication_on_boolean_base() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let ff = ts.absolute_false();
        // ⊤ ⇒ ⊤ = ⊤, ⊤ ⇒ ⊥ = ⊥, ⊥ ⇒ x = ⊤
        assert_eq!(ts.implication(tt, tt), tt);
        assert_eq!(ts.implication(tt, ff), ff);
        assert_eq!(ts.implication(ff, tt), tt);
        assert_eq!(ts.implication(ff, ff), tt);
    }

    #[test]
    fn test_fold_identities() {
        let ts = bool_twist();
        assert_eq!(ts.meet_all(std::iter::empty()), ts.absolute_true());
        assert_eq!(ts.join_all(std::iter::empty()), ts.absolute_false());
        let both = ts.pair("1", "1").unwrap();
        assert_eq!(ts.join_all([both]), both);
    }

    #[test]
    fn test_unknown_component_rejected() {
        let ts = bool_twist();
        assert!(ts.pair("1", "zzz").is_err());
    }

    #[test]
    fn test_covers_over_boolean_base() {
        let ts = bool_twist();
        let covers = ts.covers();
        // Diamond: ⊥ below (0,0) and (1,1), both below ⊤. Four cover edges.
        assert_eq!(covers.len(), 4);
        assert!(covers.contains(&(ts.absolute_false(), ts.pair("0", "0").unwrap())));
        assert!(covers.contains(&(ts.pair("1", "1").unwrap(), ts.absolute_true())));
    }
}
