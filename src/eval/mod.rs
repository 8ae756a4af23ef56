//! # Formula Evaluation
//!
//! Computes the twist-element value of a formula at a world of a model, and
//! drives the per-world check behind validity reporting.
//!
//! Evaluation never mutates the model or the AST; a failed evaluation leaves
//! both reusable.

pub mod validity;

pub use validity::{check_validity, Validity, CounterExample};

use crate::algebra::TwistPair;
use crate::formula::Formula;
use crate::plts::Plts;
use crate::{Error, Result};

/// Evaluate a formula at one world, returning its twist value.
///
/// Modal cases aggregate over the `(target, weight)` edges for
/// `(world, action)` in insertion order:
///
/// - `<>_a φ` is the twist join of `consensus(weight, ⟦φ⟧(target))` — the
///   evidence the transition and the successor agree on; no edges means
///   absolute-false.
/// - `[]_a φ` is the twist meet of `weight ⇒ ⟦φ⟧(target)`; no edges means
///   absolute-true.
///
/// A modal with an action label never registered by any relation is
/// [`Error::UndefinedAction`]; an atom the world does not value is
/// [`Error::UndefinedAtom`].
pub fn evaluate(formula: &Formula, model: &Plts, world: &str) -> Result<TwistPair> {
    let idx = model.index_of(world)?;
    eval_at(formula, model, idx)
}

fn eval_at(formula: &Formula, model: &Plts, world: usize) -> Result<TwistPair> {
    let ts = model.twist();
    match formula {
        Formula::Top => Ok(ts.absolute_true()),
        Formula::Bottom => Ok(ts.absolute_false()),

        Formula::Atom(name) => {
            let w = model.world_at(world);
            w.value(name).ok_or_else(|| Error::UndefinedAtom {
                atom: name.clone(),
                world: w.id.clone(),
            })
        }

        Formula::Not(body) => Ok(ts.negation(eval_at(body, model, world)?)),

        Formula::And(l, r) => {
            Ok(ts.meet(eval_at(l, model, world)?, eval_at(r, model, world)?))
        }

        Formula::Or(l, r) => {
            Ok(ts.join(eval_at(l, model, world)?, eval_at(r, model, world)?))
        }

        Formula::Implies(l, r) => {
            Ok(ts.implication(eval_at(l, model, world)?, eval_at(r, model, world)?))
        }

        Formula::MaterialImplies(l, r) => {
            let l = eval_at(l, model, world)?;
            let r = eval_at(r, model, world)?;
            Ok(ts.join(ts.negation(l), r))
        }

        Formula::Iff(l, r) => {
            let l = eval_at(l, model, world)?;
            let r = eval_at(r, model, world)?;
            let forward = ts.join(ts.negation(l), r);
            let backward = ts.join(ts.negation(r), l);
            Ok(ts.meet(forward, backward))
        }

        Formula::Diamond { action, body } => {
            let mut values = Vec::new();
            for &(target, weight) in edges(model, world, action)? {
                let succ = eval_at(body, model, target)?;
                values.push(ts.consensus(weight, succ));
            }
            Ok(ts.join_all(values))
        }

        Formula::Box { action, body } => {
            let mut values = Vec::new();
            for &(target, weight) in edges(model, world, action)? {
                let succ = eval_at(body, model, target)?;
                values.push(ts.implication(weight, succ));
            }
            Ok(ts.meet_all(values))
        }
    }
}

/// The outgoing edges for a modal step. An unknown action label is an error;
/// a known label with no edges from this world is legal and yields the
/// vacuous value.
fn edges<'m>(
    model: &'m Plts,
    world: usize,
    action: &str,
) -> Result<&'m [(usize, TwistPair)]> {
    if !model.has_action(action) {
        return Err(Error::UndefinedAction { action: action.to_string() });
    }
    Ok(model.edges(world, action))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Lattice, ResiduatedLattice, TwistStructure};
    use crate::formula::parse;
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
    fn test_connectives_over_boolean_base() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let ff = ts.absolute_false();
        let mut model = Plts::new(Arc::clone(&ts));
        model.add_world("w", [("p", tt), ("q", ff)]).unwrap();

        let eval = |text: &str| model.evaluate(text, "w").unwrap();
        assert_eq!(eval("p & q"), ff);
        assert_eq!(eval("p | q"), tt);
        assert_eq!(eval("~q"), tt);
        assert_eq!(eval("p => q"), ff);
        assert_eq!(eval("q => p"), tt);
        assert_eq!(eval("p -> q"), ff);
        assert_eq!(eval("p <-> p"), tt);
        assert_eq!(eval("1"), tt);
        assert_eq!(eval("0"), ff);
    }

    #[test]
    fn test_contradictory_evidence_flows_through() {
        let ts = bool_twist();
        let both = ts.pair("1", "1").unwrap();
        let mut model = Plts::new(Arc::clone(&ts));
        model.add_world("w", [("p", both)]).unwrap();

        // ~p keeps the contradiction: (1,1) swapped is (1,1).
        assert_eq!(model.evaluate("~p", "w").unwrap(), both);
    }

    #[test]
    fn test_undefined_atom_names_world() {
        let mut model = Plts::new(bool_twist());
        model.add_world("w3", Valuation::new()).unwrap();
        let err = model.evaluate("q", "w3").unwrap_err();
        match err {
            Error::UndefinedAtom { atom, world } => {
                assert_eq!(atom, "q");
                assert_eq!(world, "w3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undefined_action_vs_vacuous() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let mut model = Plts::new(Arc::clone(&ts));
        model.add_world("w1", [("p", tt)]).unwrap();
        model.add_world("w2", [("p", tt)]).unwrap();
        model.add_relation("w1", "w2", "go", tt).unwrap();

        // "go" exists but w2 has no outgoing edges: vacuous, not an error.
        assert_eq!(model.evaluate("<>_go p", "w2").unwrap(), ts.absolute_false());
        assert_eq!(model.evaluate("[]_go p", "w2").unwrap(), ts.absolute_true());

        // "fly" was never registered anywhere: an error.
        let err = model.evaluate("<>_fly p", "w1").unwrap_err();
        assert!(matches!(err, Error::UndefinedAction { .. }));
    }

    #[test]
    fn test_modal_aggregation_in_insertion_order() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let ff = ts.absolute_false();
        let mut model = Plts::new(Arc::clone(&ts));
        model.add_world("w", Valuation::new()).unwrap();
        model.add_world("u", [("p", tt)]).unwrap();
        model.add_world("v", [("p", ff)]).unwrap();
        model.add_relation("w", "u", "go", tt).unwrap();
        model.add_relation("w", "v", "go", tt).unwrap();

        // One true successor is enough for the diamond…
        assert_eq!(model.evaluate("<>_go p", "w").unwrap(), tt);
        // …and one false successor sinks the box.
        assert_eq!(model.evaluate("[]_go p", "w").unwrap(), ff);
    }

    #[test]
    fn test_failed_evaluation_leaves_model_reusable() {
        let ts = bool_twist();
        let tt = ts.absolute_true();
        let mut model = Plts::new(Arc::clone(&ts));
        model.add_world("w", Valuation::new()).unwrap();

        let ast = parse("p").unwrap();
        assert!(evaluate(&ast, &model, "w").is_err());

        // Add the missing valuation and retry with the same AST.
        model.add_world("w2", [("p", tt)]).unwrap();
        assert_eq!(evaluate(&ast, &model, "w2").unwrap(), tt);
    }
}
