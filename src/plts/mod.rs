//! # PLTS — Paraconsistent Labelled Transition System
//!
//! Worlds with twist-valued valuations and weighted, action-labelled
//! accessibility relations, all over one shared [`TwistStructure`].
//!
//! A `Plts` is the unit of exclusive mutation: writers take `&mut self`,
//! evaluation takes `&self`, so a stable model can serve any number of
//! concurrent readers.

pub mod world;

pub use world::{World, Valuation};

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::algebra::{TwistPair, TwistStructure};
use crate::eval::{self, Validity};
use crate::formula;
use crate::{Error, Result};

/// Outgoing edges for one `(world, action)` key, in insertion order.
type Targets = SmallVec<[(usize, TwistPair); 4]>;

/// A paraconsistent model (W, R, V) over a twist structure.
///
/// Every valuation value and relation weight is validated against the
/// model's twist structure on the way in; mutation failures leave the model
/// unchanged.
pub struct Plts {
    twist: Arc<TwistStructure>,
    worlds: Vec<World>,
    index: HashMap<String, usize>,
    relations: HashMap<(usize, String), Targets>,
    actions: HashSet<String>,
}

impl Plts {
    pub fn new(twist: Arc<TwistStructure>) -> Self {
        Self {
            twist,
            worlds: Vec::new(),
            index: HashMap::new(),
            relations: HashMap::new(),
            actions: HashSet::new(),
        }
    }

    /// The twist structure all valuations and weights are drawn from.
    pub fn twist(&self) -> &TwistStructure {
        &self.twist
    }

    /// Shared handle to the twist structure, for building sibling models.
    pub fn twist_arc(&self) -> Arc<TwistStructure> {
        Arc::clone(&self.twist)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Add a world. Fails with [`Error::DuplicateWorld`] if the id exists and
    /// [`Error::TypeMismatch`] if a valuation value is not a member of the
    /// model's twist structure.
    pub fn add_world<V, P>(&mut self, id: impl Into<String>, valuation: V) -> Result<()>
    where
        V: IntoIterator<Item = (P, TwistPair)>,
        P: Into<String>,
    {
        let id = id.into();
        let mut world = World::new(id);
        for (prop, value) in valuation {
            world.valuation.insert(prop.into(), value);
        }
        self.validate_world(&world, None)?;
        self.insert_world(world);
        Ok(())
    }

    /// Add `count` worlds from a template function `i → (id, valuation)`.
    ///
    /// All-or-nothing: every world is validated (including against ids
    /// earlier in the batch) before any is inserted, so a failure leaves the
    /// model unmodified.
    pub fn add_worlds_batch<F>(&mut self, count: usize, template: F) -> Result<()>
    where
        F: Fn(usize) -> (String, Valuation),
    {
        let mut staged: Vec<World> = Vec::with_capacity(count);
        for i in 0..count {
            let (id, valuation) = template(i);
            let world = World { id, valuation };
            self.validate_world(&world, Some(&staged))?;
            staged.push(world);
        }
        for world in staged {
            self.insert_world(world);
        }
        Ok(())
    }

    /// Add an accessibility edge `from --action: weight--> to`.
    ///
    /// Appends to the target list for `(from, action)` — duplicates are
    /// deliberately kept. Registers the action label.
    pub fn add_relation(
        &mut self,
        from: &str,
        to: &str,
        action: impl Into<String>,
        weight: TwistPair,
    ) -> Result<()> {
        let src = self.index_of(from)?;
        let dst = self.index_of(to)?;
        if !self.twist.contains(weight) {
            return Err(Error::TypeMismatch {
                message: format!(
                    "relation weight is not a member of the model's twist structure ({from} → {to})"
                ),
            });
        }
        let action = action.into();
        self.actions.insert(action.clone());
        self.relations
            .entry((src, action))
            .or_default()
            .push((dst, weight));
        tracing::debug!(from, to, "relation added");
        Ok(())
    }

    // ========================================================================
    // Read API
    // ========================================================================

    /// Worlds in insertion order.
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn world(&self, id: &str) -> Option<&World> {
        self.index.get(id).map(|&i| &self.worlds[i])
    }

    /// The value of `prop` at `world`; [`Error::UndefinedAtom`] if the world
    /// does not value it.
    pub fn valuation(&self, world: &str, prop: &str) -> Result<TwistPair> {
        let w = &self.worlds[self.index_of(world)?];
        w.value(prop).ok_or_else(|| Error::UndefinedAtom {
            atom: prop.to_string(),
            world: w.id.clone(),
        })
    }

    /// Whether any relation ever registered this action label.
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    /// All registered action labels, sorted for deterministic listings.
    pub fn actions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.actions.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Outgoing `(target, weight)` edges for `(world, action)`, in insertion
    /// order. An empty result is legal (vacuous modality); it does not mean
    /// the action is unknown.
    pub fn successors(&self, world: &str, action: &str) -> Result<Vec<(&World, TwistPair)>> {
        let src = self.index_of(world)?;
        Ok(self
            .edges(src, action)
            .iter()
            .map(|&(dst, w)| (&self.worlds[dst], w))
            .collect())
    }

    // ========================================================================
    // Evaluation pipeline
    // ========================================================================

    /// Parse and evaluate a formula at one world.
    pub fn evaluate(&self, formula_text: &str, world: &str) -> Result<TwistPair> {
        let ast = formula::parse(formula_text)?;
        eval::evaluate(&ast, self, world)
    }

    /// Parse a formula and check it at every world.
    pub fn check(&self, formula_text: &str) -> Result<Validity> {
        let ast = formula::parse(formula_text)?;
        eval::check_validity(&ast, self)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    pub(crate) fn index_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownWorld { id: id.to_string() })
    }

    pub(crate) fn world_at(&self, idx: usize) -> &World {
        &self.worlds[idx]
    }

    pub(crate) fn edges(&self, src: usize, action: &str) -> &[(usize, TwistPair)] {
        self.relations
            .get(&(src, action.to_string()))
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }

    fn validate_world(&self, world: &World, staged: Option<&[World]>) -> Result<()> {
        let duplicate = self.index.contains_key(&world.id)
            || staged.is_some_and(|s| s.iter().any(|w| w.id == world.id));
        if duplicate {
            return Err(Error::DuplicateWorld { id: world.id.clone() });
        }
        for (prop, value) in &world.valuation {
            if !self.twist.contains(*value) {
                return Err(Error::TypeMismatch {
                    message: format!(
                        "valuation of '{prop}' at world '{}' is not a member of the model's twist structure",
                        world.id
                    ),
                });
            }
        }
        Ok(())
    }

    fn insert_world(&mut self, world: World) {
        tracing::debug!(id = %world.id, "world added");
        self.index.insert(world.id.clone(), self.worlds.len());
        self.worlds.push(world);
    }
}

impl std::fmt::Debug for Plts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plts")
            .field("worlds", &self.worlds.len())
            .field("relations", &self.relations.len())
            .field("actions", &self.actions)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
