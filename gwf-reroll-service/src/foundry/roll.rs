//! Roll, term and die result shapes as serialized by `Roll#toJSON`.

use serde::{Deserialize, Serialize};

/// A roll attached to a chat message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roll {
    pub formula: String,

    #[serde(default)]
    pub terms: Vec<RollTerm>,

    /// Evaluation context (`roll.data`), carried unchanged into a reroll
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Roll {
    /// All die terms in the roll, including those nested in pools, function
    /// arguments and parenthetical terms, in formula order.
    pub fn dice(&self) -> Vec<&DieTerm> {
        let mut dice = Vec::new();
        collect_dice(&self.terms, &mut dice);
        dice
    }
}

fn collect_dice<'a>(terms: &'a [RollTerm], out: &mut Vec<&'a DieTerm>) {
    for term in terms {
        match term {
            RollTerm::Die(die) => out.push(die),
            RollTerm::PoolTerm { rolls } | RollTerm::FunctionTerm { rolls } => {
                for roll in rolls {
                    collect_dice(&roll.terms, out);
                }
            }
            RollTerm::ParentheticalTerm { roll: Some(roll) } => collect_dice(&roll.terms, out),
            RollTerm::ParentheticalTerm { roll: None } | RollTerm::Other => {}
        }
    }
}

/// A single term of a roll, tagged by its Foundry class name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum RollTerm {
    Die(DieTerm),
    PoolTerm {
        #[serde(default)]
        rolls: Vec<Roll>,
    },
    ParentheticalTerm {
        #[serde(default)]
        roll: Option<Box<Roll>>,
    },
    /// `max(1d12, 3)` and friends; each argument is its own roll
    FunctionTerm {
        #[serde(default)]
        rolls: Vec<Roll>,
    },
    /// Numeric, operator and string terms; none of them carry dice
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DieTerm {
    #[serde(default)]
    pub number: Option<u32>,

    #[serde(default)]
    pub faces: Option<u32>,

    #[serde(default)]
    pub results: Vec<DieResult>,
}

/// One rolled value of a die term
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DieResult {
    /// Usually a number; older messages sometimes store a numeric string
    #[serde(default)]
    pub result: serde_json::Value,

    /// Missing means active; `false` means dropped or rerolled away
    #[serde(default)]
    pub active: Option<bool>,
}

impl DieResult {
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }

    /// Numeric value of the result, if it has a finite one
    pub fn value(&self) -> Option<f64> {
        let value = match &self.result {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// An evaluated roll returned by the host, forwarded verbatim for publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluatedRoll(pub serde_json::Value);

impl EvaluatedRoll {
    pub fn formula(&self) -> Option<&str> {
        self.0.get("formula").and_then(|f| f.as_str())
    }

    pub fn total(&self) -> Option<f64> {
        self.0.get("total").and_then(|t| t.as_f64())
    }
}
