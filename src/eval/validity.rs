//! Validity checking — evaluate a formula at every world and report the
//! worlds where it falls short of absolute-true.

use crate::algebra::TwistPair;
use crate::formula::Formula;
use crate::plts::Plts;
use crate::Result;

/// Outcome of a validity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The formula evaluates to absolute-true at every world.
    Valid,
    /// Counter-example worlds, in the model's world-insertion order.
    Invalid(Vec<CounterExample>),
}

/// A world where the formula is not absolutely true, with the value it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterExample {
    pub world: String,
    pub value: TwistPair,
}

/// Check a formula at every world of the model.
///
/// Valid iff every world's value equals absolute-true; otherwise the
/// counter-examples are returned in world-insertion order. An evaluation
/// error at any world aborts the whole check.
pub fn check_validity(formula: &Formula, model: &Plts) -> Result<Validity> {
    let ts = model.twist();
    let mut counter_examples = Vec::new();

    for world in model.worlds() {
        let value = super::evaluate(formula, model, &world.id)?;
        tracing::trace!(world = %world.id, ?value, "world evaluated");
        if value != ts.absolute_true() {
            counter_examples.push(CounterExample {
                world: world.id.clone(),
                value,
            });
        }
    }

    if counter_examples.is_empty() {
        Ok(Validity::Valid)
    } else {
        Ok(Validity::Invalid(counter_examples))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Lattice, ResiduatedLattice, TwistStructure};
    use crate::plts::Valuation;
    use std::sync::Arc;

    fn bool_twist() -> Arc<TwistStructure> {
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
        Arc::new(TwistStructure::generate(Arc::new(rl)))
    }

    #[test]
    fn test_tautology_is_valid() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let ff = ts.absolute_false();
        let mut model = Plts::new(ts);
        model.add_world("w1", [("p", tt)]).unwrap();
        model.add_world("w2", [("p", ff)]).unwrap();

        assert_eq!(model.check("p | ~p").unwrap(), Validity::Valid);
        assert_eq!(model.check("1").unwrap(), Validity::Valid);
    }

    #[test]
    fn test_counter_examples_in_insertion_order() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let ff = ts.absolute_false();
        let mut model = Plts::new(Arc::clone(&ts));
        model.add_world("w1", [("p", ff)]).unwrap();
        model.add_world("w2", [("p", tt)]).unwrap();
        model.add_world("w3", [("p", ff)]).unwrap();

        let Validity::Invalid(ces) = model.check("p").unwrap() else {
            panic!("expected counter-examples");
        };
        assert_eq!(ces.len(), 2);
        assert_eq!(ces[0].world, "w1");
        assert_eq!(ces[1].world, "w3");
        assert_eq!(ces[0].value, ff);
    }

    #[test]
    fn test_evaluation_error_aborts_check() {
        let mut model = Plts::new(bool_twist());
        model.add_world("w1", Valuation::new()).unwrap();
        assert!(model.check("p").is_err());
    }
}
