//! Value comparison for [`super::Container::compare_data`].
//!
//! Loose operators compare numerically when both sides read as numbers
//! (numbers, numeric strings, booleans) and as strings otherwise. Strict
//! operators compare type and value.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::value::{as_number, as_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    StrictEq,
    StrictNe,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::StrictEq => "===",
            CompareOp::StrictNe => "!==",
        }
    }

    /// Evaluate `left <op> right`.
    pub fn compare(&self, left: &Value, right: &Value) -> bool {
        match self {
            CompareOp::StrictEq => left == right,
            CompareOp::StrictNe => left != right,
            CompareOp::Eq => loose_eq(left, right),
            CompareOp::Ne => !loose_eq(left, right),
            CompareOp::Lt => ordering(left, right) == Some(Ordering::Less),
            CompareOp::Le => matches!(ordering(left, right), Some(Ordering::Less | Ordering::Equal)),
            CompareOp::Gt => ordering(left, right) == Some(Ordering::Greater),
            CompareOp::Ge => matches!(ordering(left, right), Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" | "eq" => Ok(CompareOp::Eq),
            "!=" | "<>" | "ne" => Ok(CompareOp::Ne),
            "<" | "lt" => Ok(CompareOp::Lt),
            "<=" | "le" => Ok(CompareOp::Le),
            ">" | "gt" => Ok(CompareOp::Gt),
            ">=" | "ge" => Ok(CompareOp::Ge),
            "===" => Ok(CompareOp::StrictEq),
            "!==" => Ok(CompareOp::StrictNe),
            other => Err(format!("unknown comparison operator '{}'", other)),
        }
    }
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    ordering(left, right) == Some(Ordering::Equal)
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return a.partial_cmp(&b);
    }
    match (as_string(left), as_string(right)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}
