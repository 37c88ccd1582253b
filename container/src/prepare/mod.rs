//! Data preparation.
//!
//! Preparations transform values as they pass through a container:
//!
//! - [`Stage::Pre`] runs when a value is written (after validation)
//! - [`Stage::Post`] runs when a value is read or exported
//!
//! Each stage keeps its own [`KeyRules`] registry; every preparation whose
//! pattern matches the key runs, in registration order, each one receiving
//! the output of the previous.
//!
//! ```text
//! set_data(k, v) ──▶ validate ──▶ Pre rules ──▶ stored
//! get_data(k)    ◀── Post rules ◀──────────────  stored
//! ```

pub mod operations;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::ValidationResult;
use crate::rules::KeyRules;

pub use operations::{operations_description, Operation};

/// Signature of callback preparations.
pub type PrepareFn = dyn Fn(&str, Value) -> Value + Send + Sync;

/// When a preparation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// On write.
    Pre,
    /// On read and export.
    Post,
}

/// One preparation step.
#[derive(Clone)]
pub enum Preparation {
    /// Declarative operations applied in sequence.
    Operations(Vec<Operation>),
    /// Custom transformation receiving the key and the value.
    Callback(Arc<PrepareFn>),
}

impl Preparation {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&str, Value) -> Value + Send + Sync + 'static,
    {
        Preparation::Callback(Arc::new(f))
    }

    pub fn apply(&self, key: &str, value: Value) -> Value {
        match self {
            Preparation::Operations(ops) => ops.iter().fold(value, |v, op| op.apply(&v)),
            Preparation::Callback(f) => f(key, value),
        }
    }
}

impl From<Vec<Operation>> for Preparation {
    fn from(ops: Vec<Operation>) -> Self {
        Preparation::Operations(ops)
    }
}

impl From<Operation> for Preparation {
    fn from(op: Operation) -> Self {
        Preparation::Operations(vec![op])
    }
}

impl fmt::Debug for Preparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preparation::Operations(ops) => f.debug_tuple("Operations").field(ops).finish(),
            Preparation::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Pre and post preparation registries.
#[derive(Debug, Clone, Default)]
pub struct Preparer {
    pre: KeyRules<Preparation>,
    post: KeyRules<Preparation>,
}

impl Preparer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(
        &mut self,
        stage: Stage,
        pattern: &str,
        preparation: impl Into<Preparation>,
    ) -> ValidationResult<()> {
        self.rules_mut(stage).put(pattern, preparation.into())
    }

    pub fn remove(&mut self, stage: Stage, pattern: &str) -> usize {
        self.rules_mut(stage).remove(pattern)
    }

    pub fn clear(&mut self) {
        self.pre.clear();
        self.post.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }

    /// Run every preparation of `stage` matching `key`.
    pub fn apply(&self, stage: Stage, key: &str, value: Value) -> Value {
        self.rules(stage)
            .matching(key)
            .fold(value, |v, prep| prep.apply(key, v))
    }

    fn rules(&self, stage: Stage) -> &KeyRules<Preparation> {
        match stage {
            Stage::Pre => &self.pre,
            Stage::Post => &self.post,
        }
    }

    fn rules_mut(&mut self, stage: Stage) -> &mut KeyRules<Preparation> {
        match stage {
            Stage::Pre => &mut self.pre,
            Stage::Post => &mut self.post,
        }
    }
}
