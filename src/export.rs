//! Boundary shapes for the GUI and persistence layers.
//!
//! These DTOs are the crate's external contract: the editor and the JSON
//! load/save layer own serialization, and they must map exactly onto these
//! shapes. Everything here is plain serde data plus bridges into and out of
//! the core types — no algorithmic behavior.
//!
//! ```text
//! JSON ⇄ *Def shapes ⇄ Lattice / ResiduatedLattice / Plts
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algebra::{Lattice, ResiduatedLattice, TwistStructure};
use crate::eval::Validity;
use crate::plts::{Plts, Valuation};
use crate::Result;

// ============================================================================
// Algebra definitions
// ============================================================================

/// A lattice definition: element names plus order pairs `(a, b)` meaning
/// a ≤ b. The covering pairs suffice — closure is taken at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatticeDef {
    pub elements: Vec<String>,
    pub order: Vec<(String, String)>,
}

impl LatticeDef {
    pub fn build(&self) -> Result<Lattice> {
        Lattice::build(
            self.elements.iter().cloned(),
            self.order.iter().map(|(a, b)| (a.as_str(), b.as_str())),
        )
    }

    /// Export a lattice as its element list plus Hasse (covering) pairs.
    pub fn from_lattice(lattice: &Lattice) -> Self {
        Self {
            elements: lattice.elems().map(|e| lattice.name(e).to_string()).collect(),
            order: lattice
                .covers()
                .into_iter()
                .map(|(a, b)| (lattice.name(a).to_string(), lattice.name(b).to_string()))
                .collect(),
        }
    }
}

/// A residuated lattice definition: a lattice plus the tensor as
/// `(a, b, result)` triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResiduatedLatticeDef {
    pub elements: Vec<String>,
    pub order: Vec<(String, String)>,
    pub tensor: Vec<(String, String, String)>,
}

impl ResiduatedLatticeDef {
    pub fn build(&self) -> Result<ResiduatedLattice> {
        let lattice = Lattice::build(
            self.elements.iter().cloned(),
            self.order.iter().map(|(a, b)| (a.as_str(), b.as_str())),
        )?;
        ResiduatedLattice::extend(
            lattice,
            self.tensor
                .iter()
                .map(|(a, b, r)| (a.as_str(), b.as_str(), r.as_str())),
        )
    }

    /// Export a residuated lattice with its full tensor table.
    pub fn from_residuated(rl: &ResiduatedLattice) -> Self {
        let base = LatticeDef::from_lattice(rl.lattice());
        let mut tensor = Vec::with_capacity(rl.len() * rl.len());
        for a in rl.elems() {
            for b in rl.elems() {
                tensor.push((
                    rl.name(a).to_string(),
                    rl.name(b).to_string(),
                    rl.name(rl.tensor(a, b)).to_string(),
                ));
            }
        }
        Self { elements: base.elements, order: base.order, tensor }
    }
}

// ============================================================================
// Model definitions
// ============================================================================

/// A world definition: id plus valuation as `prop → [t, f]` name pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDef {
    pub id: String,
    pub valuation: BTreeMap<String, (String, String)>,
}

/// An accessibility edge definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDef {
    pub from: String,
    pub to: String,
    pub action: String,
    pub weight: (String, String),
}

/// A model definition: a reference to its twist structure (by whatever name
/// the persistence layer uses) plus worlds and relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDef {
    pub twist_structure_ref: String,
    pub worlds: Vec<WorldDef>,
    pub relations: Vec<RelationDef>,
}

impl ModelDef {
    /// Build a model over `twist`, resolving every element name. Worlds land
    /// in definition order; any unknown name or model error aborts.
    pub fn instantiate(&self, twist: Arc<TwistStructure>) -> Result<Plts> {
        let mut model = Plts::new(Arc::clone(&twist));
        for w in &self.worlds {
            let mut valuation = Valuation::new();
            for (prop, (t, f)) in &w.valuation {
                valuation.insert(prop.clone(), twist.pair(t, f)?);
            }
            model.add_world(w.id.clone(), valuation)?;
        }
        for r in &self.relations {
            let weight = twist.pair(&r.weight.0, &r.weight.1)?;
            model.add_relation(&r.from, &r.to, r.action.clone(), weight)?;
        }
        Ok(model)
    }

    /// Export a model. Worlds keep insertion order; relations are listed per
    /// world in insertion order, grouped by sorted action label.
    pub fn from_model(model: &Plts, twist_structure_ref: impl Into<String>) -> Self {
        let ts = model.twist();

        let worlds = model
            .worlds()
            .iter()
            .map(|w| WorldDef {
                id: w.id.clone(),
                valuation: w
                    .valuation
                    .iter()
                    .map(|(prop, &value)| {
                        let (t, f) = ts.names(value);
                        (prop.clone(), (t.to_string(), f.to_string()))
                    })
                    .collect(),
            })
            .collect();

        let mut relations = Vec::new();
        for w in model.worlds() {
            for action in model.actions() {
                for (target, weight) in model.successors(&w.id, action).unwrap_or_default() {
                    let (t, f) = ts.names(weight);
                    relations.push(RelationDef {
                        from: w.id.clone(),
                        to: target.id.clone(),
                        action: action.to_string(),
                        weight: (t.to_string(), f.to_string()),
                    });
                }
            }
        }

        Self { twist_structure_ref: twist_structure_ref.into(), worlds, relations }
    }
}

// ============================================================================
// Evaluation request/response
// ============================================================================

/// What the GUI sends to have a formula checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub formula_text: String,
    pub model_ref: String,
}

/// A counter-example world with the value the formula took there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterExampleDef {
    pub world: String,
    pub value: (String, String),
}

/// Validity outcome in wire shape: `{valid: true}` or
/// `{valid: false, counterExamples: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counter_examples: Vec<CounterExampleDef>,
}

impl EvaluationOutcome {
    pub fn from_validity(validity: &Validity, ts: &TwistStructure) -> Self {
        match validity {
            Validity::Valid => Self { valid: true, counter_examples: Vec::new() },
            Validity::Invalid(ces) => Self {
                valid: false,
                counter_examples: ces
                    .iter()
                    .map(|ce| {
                        let (t, f) = ts.names(ce.value);
                        CounterExampleDef {
                            world: ce.world.clone(),
                            value: (t.to_string(), f.to_string()),
                        }
                    })
                    .collect(),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bool_def() -> ResiduatedLatticeDef {
        ResiduatedLatticeDef {
            elements: vec!["0".into(), "1".into()],
            order: vec![("0".into(), "1".into())],
            tensor: vec![
                ("0".into(), "0".into(), "0".into()),
                ("0".into(), "1".into(), "0".into()),
                ("1".into(), "0".into(), "0".into()),
                ("1".into(), "1".into(), "1".into()),
            ],
        }
    }

    #[test]
    fn test_lattice_def_json_shape() {
        let def = LatticeDef {
            elements: vec!["0".into(), "1".into()],
            order: vec![("0".into(), "1".into())],
        };
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "elements": ["0", "1"],
                "order": [["0", "1"]],
            })
        );
    }

    #[test]
    fn test_residuated_def_builds() {
        let rl = bool_def().build().unwrap();
        let z = rl.elem("0").unwrap();
        let o = rl.elem("1").unwrap();
        assert_eq!(rl.tensor(o, z), z);
    }

    #[test]
    fn test_residuated_def_round_trip() {
        let def = bool_def();
        let rl = def.build().unwrap();
        let exported = ResiduatedLatticeDef::from_residuated(&rl);
        assert_eq!(exported, def);
    }

    #[test]
    fn test_outcome_serialization() {
        let valid = EvaluationOutcome { valid: true, counter_examples: Vec::new() };
        assert_eq!(
            serde_json::to_value(&valid).unwrap(),
            serde_json::json!({"valid": true})
        );

        let invalid = EvaluationOutcome {
            valid: false,
            counter_examples: vec![CounterExampleDef {
                world: "w1".into(),
                value: ("0".into(), "0".into()),
            }],
        };
        assert_eq!(
            serde_json::to_value(&invalid).unwrap(),
            serde_json::json!({
                "valid": false,
                "counterExamples": [{"world": "w1", "value": ["0", "0"]}],
            })
        );
    }
}
