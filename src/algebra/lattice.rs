//! Finite lattice engine — validates a partial order and derives
//! meet/join tables.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Opaque element identifier — an index into the lattice's element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElemId(pub u16);

impl std::fmt::Display for ElemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finite lattice: elements, a validated partial order, and derived
/// meet/join lookup tables.
///
/// Built once via [`Lattice::build`]; immutable afterwards. All binary
/// operations are O(1) table lookups.
pub struct Lattice {
    names: Vec<String>,
    index: HashMap<String, ElemId>,
    /// Row-major `n×n`: `leq[a*n + b]` ⟺ a ≤ b.
    leq: Vec<bool>,
    meet: Vec<ElemId>,
    join: Vec<ElemId>,
    top: ElemId,
    bottom: ElemId,
}

impl Lattice {
    /// Validate a partial order and derive the meet/join tables.
    ///
    /// `order` lists pairs `(a, b)` meaning a ≤ b; the reflexive-transitive
    /// closure is taken before validation, so only the covering pairs need to
    /// be supplied. Fails with [`Error::InvalidLattice`] if the closure is not
    /// antisymmetric, some pair lacks a greatest lower / least upper bound,
    /// or top/bottom is not unique.
    pub fn build<E, S, P, A, B>(elements: E, order: P) -> Result<Self>
    where
        E: IntoIterator<Item = S>,
        S: Into<String>,
        P: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let names: Vec<String> = elements.into_iter().map(Into::into).collect();
        let n = names.len();

        if n == 0 {
            return Err(invalid("the element set is empty"));
        }
        if n > u16::MAX as usize {
            return Err(invalid(format!("{n} elements exceed the supported carrier size")));
        }

        let mut index = HashMap::with_capacity(n);
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), ElemId(i as u16)).is_some() {
                return Err(invalid(format!("duplicate element '{name}'")));
            }
        }

        // Seed the order with reflexivity plus the supplied pairs.
        let mut leq = vec![false; n * n];
        for i in 0..n {
            leq[i * n + i] = true;
        }
        for (a, b) in order {
            let (a, b) = (a.as_ref(), b.as_ref());
            let ia = *index
                .get(a)
                .ok_or_else(|| invalid(format!("order pair references unknown element '{a}'")))?;
            let ib = *index
                .get(b)
                .ok_or_else(|| invalid(format!("order pair references unknown element '{b}'")))?;
            leq[ia.0 as usize * n + ib.0 as usize] = true;
        }

        // Transitive closure (Warshall).
        for k in 0..n {
            for i in 0..n {
                if leq[i * n + k] {
                    for j in 0..n {
                        if leq[k * n + j] {
                            leq[i * n + j] = true;
                        }
                    }
                }
            }
        }

        // Antisymmetry over the closure.
        for i in 0..n {
            for j in (i + 1)..n {
                if leq[i * n + j] && leq[j * n + i] {
                    return Err(invalid(format!(
                        "order is not antisymmetric: '{}' ≤ '{}' and '{}' ≤ '{}'",
                        names[i], names[j], names[j], names[i]
                    )));
                }
            }
        }

        // Derive meet/join by scanning all elements for the best common bound.
        let mut meet = vec![ElemId(0); n * n];
        let mut join = vec![ElemId(0); n * n];
        for a in 0..n {
            for b in 0..n {
                meet[a * n + b] = glb(&leq, n, a, b).ok_or_else(|| {
                    invalid(format!(
                        "no unique greatest lower bound for ('{}', '{}')",
                        names[a], names[b]
                    ))
                })?;
                join[a * n + b] = lub(&leq, n, a, b).ok_or_else(|| {
                    invalid(format!(
                        "no unique least upper bound for ('{}', '{}')",
                        names[a], names[b]
                    ))
                })?;
            }
        }

        // Unique top/bottom: the elements without strict upper/lower bounds.
        let maximal: Vec<usize> = (0..n)
            .filter(|&a| (0..n).all(|b| b == a || !leq[a * n + b]))
            .collect();
        let minimal: Vec<usize> = (0..n)
            .filter(|&a| (0..n).all(|b| b == a || !leq[b * n + a]))
            .collect();
        if maximal.len() != 1 {
            return Err(invalid(format!("top is not unique ({} maximal elements)", maximal.len())));
        }
        if minimal.len() != 1 {
            return Err(invalid(format!(
                "bottom is not unique ({} minimal elements)",
                minimal.len()
            )));
        }
        let (top, bottom) = (maximal[0], minimal[0]);

        tracing::debug!(elements = n, "lattice validated");

        Ok(Self {
            names,
            index,
            leq,
            meet,
            join,
            top: ElemId(top as u16),
            bottom: ElemId(bottom as u16),
        })
    }

    // ========================================================================
    // Element resolution
    // ========================================================================

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        false // construction rejects the empty carrier
    }

    /// All element ids in declaration order.
    pub fn elems(&self) -> impl Iterator<Item = ElemId> + '_ {
        (0..self.names.len() as u16).map(ElemId)
    }

    pub fn name(&self, e: ElemId) -> &str {
        &self.names[e.0 as usize]
    }

    pub fn elem(&self, name: &str) -> Option<ElemId> {
        self.index.get(name).copied()
    }

    /// Resolve an element name, failing with [`Error::TypeMismatch`] if it is
    /// not a member of this lattice.
    pub fn resolve(&self, name: &str) -> Result<ElemId> {
        self.elem(name).ok_or_else(|| Error::TypeMismatch {
            message: format!("'{name}' is not an element of the lattice"),
        })
    }

    /// Whether `e` indexes into this lattice's carrier.
    pub fn contains(&self, e: ElemId) -> bool {
        (e.0 as usize) < self.names.len()
    }

    // ========================================================================
    // Order and operations
    // ========================================================================

    pub fn leq(&self, a: ElemId, b: ElemId) -> bool {
        self.leq[a.0 as usize * self.len() + b.0 as usize]
    }

    pub fn meet(&self, a: ElemId, b: ElemId) -> ElemId {
        self.meet[a.0 as usize * self.len() + b.0 as usize]
    }

    pub fn join(&self, a: ElemId, b: ElemId) -> ElemId {
        self.join[a.0 as usize * self.len() + b.0 as usize]
    }

    pub fn top(&self) -> ElemId {
        self.top
    }

    pub fn bottom(&self) -> ElemId {
        self.bottom
    }

    /// Meet of a set of elements; the empty meet is top.
    pub fn meet_all(&self, elems: impl IntoIterator<Item = ElemId>) -> ElemId {
        elems.into_iter().fold(self.top, |acc, e| self.meet(acc, e))
    }

    /// Join of a set of elements; the empty join is bottom.
    pub fn join_all(&self, elems: impl IntoIterator<Item = ElemId>) -> ElemId {
        elems.into_iter().fold(self.bottom, |acc, e| self.join(acc, e))
    }

    /// Covering pairs `(a, b)`: a < b with no element strictly between.
    /// This is the transitive reduction, the edge set of the Hasse diagram.
    pub fn covers(&self) -> Vec<(ElemId, ElemId)> {
        let n = self.len();
        let mut out = Vec::new();
        for a in 0..n {
            for b in 0..n {
                if a == b || !self.leq[a * n + b] {
                    continue;
                }
                let between = (0..n).any(|c| {
                    c != a && c != b && self.leq[a * n + c] && self.leq[c * n + b]
                });
                if !between {
                    out.push((ElemId(a as u16), ElemId(b as u16)));
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lattice")
            .field("elements", &self.names)
            .field("top", &self.name(self.top))
            .field("bottom", &self.name(self.bottom))
            .finish()
    }
}

/// Greatest lower bound of `a` and `b`, if one exists.
fn glb(leq: &[bool], n: usize, a: usize, b: usize) -> Option<ElemId> {
    let lower: Vec<usize> = (0..n)
        .filter(|&x| leq[x * n + a] && leq[x * n + b])
        .collect();
    lower
        .iter()
        .find(|&&x| lower.iter().all(|&y| leq[y * n + x]))
        .map(|&x| ElemId(x as u16))
}

/// Least upper bound of `a` and `b`, if one exists.
fn lub(leq: &[bool], n: usize, a: usize, b: usize) -> Option<ElemId> {
    let upper: Vec<usize> = (0..n)
        .filter(|&x| leq[a * n + x] && leq[b * n + x])
        .collect();
    upper
        .iter()
        .find(|&&x| upper.iter().all(|&y| leq[x * n + y]))
        .map(|&x| ElemId(x as u16))
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidLattice { message: message.into() }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chain3() -> Lattice {
        Lattice::build(["0", "m", "1"], [("0", "m"), ("m", "1")]).unwrap()
    }

    /// 2×2 diamond: 0 < a, b < 1 with a, b incomparable.
    fn diamond() -> Lattice {
        Lattice::build(
            ["0", "a", "b", "1"],
            [("0", "a"), ("0", "b"), ("a", "1"), ("b", "1")],
        )
        .unwrap()
    }

    #[test]
    fn test_chain_tables() {
        let l = chain3();
        let (z, m, o) = (l.elem("0").unwrap(), l.elem("m").unwrap(), l.elem("1").unwrap());
        assert_eq!(l.bottom(), z);
        assert_eq!(l.top(), o);
        assert_eq!(l.meet(m, o), m);
        assert_eq!(l.join(z, m), m);
        assert!(l.leq(z, o));
        assert!(!l.leq(o, m));
    }

    #[test]
    fn test_diamond_tables() {
        let l = diamond();
        let (z, a, b, o) = (
            l.elem("0").unwrap(),
            l.elem("a").unwrap(),
            l.elem("b").unwrap(),
            l.elem("1").unwrap(),
        );
        assert_eq!(l.meet(a, b), z);
        assert_eq!(l.join(a, b), o);
        assert!(!l.leq(a, b));
        assert!(!l.leq(b, a));
    }

    #[test]
    fn test_transitive_closure_inferred() {
        // Only covering pairs supplied; 0 ≤ 1 must come from the closure.
        let l = chain3();
        assert!(l.leq(l.elem("0").unwrap(), l.elem("1").unwrap()));
    }

    #[test]
    fn test_missing_upper_bound_rejected() {
        // Two incomparable elements with no common upper bound.
        let err = Lattice::build(["a", "b"], Vec::<(&str, &str)>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidLattice { .. }));
    }

    #[test]
    fn test_antisymmetry_violation_rejected() {
        let err = Lattice::build(["a", "b"], [("a", "b"), ("b", "a")]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("antisymmetric"), "{msg}");
    }

    #[test]
    fn test_non_unique_top_rejected() {
        // 0 below both a and b, nothing above them.
        let err =
            Lattice::build(["0", "a", "b"], [("0", "a"), ("0", "b")]).unwrap_err();
        assert!(matches!(err, Error::InvalidLattice { .. }));
    }

    #[test]
    fn test_unknown_element_in_order() {
        let err = Lattice::build(["a"], [("a", "zzz")]).unwrap_err();
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn test_duplicate_element_rejected() {
        let err = Lattice::build(["a", "a"], Vec::<(&str, &str)>::new()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_meet_join_folds() {
        let l = diamond();
        let a = l.elem("a").unwrap();
        let b = l.elem("b").unwrap();
        assert_eq!(l.meet_all([a, b]), l.bottom());
        assert_eq!(l.join_all([a, b]), l.top());
        // Empty folds hit the lattice bounds.
        assert_eq!(l.meet_all(std::iter::empty()), l.top());
        assert_eq!(l.join_all(std::iter::empty()), l.bottom());
    }

    #[test]
    fn test_covers_is_transitive_reduction() {
        let l = chain3();
        let covers = l.covers();
        let z = l.elem("0").unwrap();
        let m = l.elem("m").unwrap();
        let o = l.elem("1").unwrap();
        assert!(covers.contains(&(z, m)));
        assert!(covers.contains(&(m, o)));
        assert!(!covers.contains(&(z, o)));
    }
}
