//! A world — one state of a PLTS, with its twist-valued valuation.

use hashbrown::HashMap;

use crate::algebra::TwistPair;

/// Mapping from atomic proposition names to twist elements. A valuation need
/// not cover every proposition a formula mentions — absence is a distinct
/// condition surfaced at evaluation time.
pub type Valuation = HashMap<String, TwistPair>;

/// A single world in a PLTS.
#[derive(Debug, Clone)]
pub struct World {
    pub id: String,
    pub valuation: Valuation,
}

impl World {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), valuation: Valuation::new() }
    }

    pub fn with_value(mut self, prop: impl Into<String>, value: TwistPair) -> Self {
        self.valuation.insert(prop.into(), value);
        self
    }

    /// The value of a proposition at this world, if assigned.
    pub fn value(&self, prop: &str) -> Option<TwistPair> {
        self.valuation.get(prop).copied()
    }
}
