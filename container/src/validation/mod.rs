//! Per-key validation rules.
//!
//! Rules are registered against a key pattern (see [`crate::rules`]). When a
//! value is written, every rule matching its key must accept it; otherwise
//! the write is rejected and one message per failing rule is recorded.
//!
//! # Rule kinds
//!
//! - [`ValidationRule::Pattern`] - regex tested against the stringified scalar
//! - [`ValidationRule::Schema`] - JSON Schema Draft 7, compiled once
//! - [`ValidationRule::Callback`] - arbitrary predicate over key and value
//!
//! # Example
//!
//! ```rust
//! use datacontainer::validation::{ValidationRule, Validator};
//! use serde_json::json;
//!
//! let mut validator = Validator::new();
//! validator.put("^age$", ValidationRule::pattern(r"^\d+$").unwrap()).unwrap();
//!
//! assert!(validator.check("age", &json!("42")).is_ok());
//! assert!(validator.check("age", &json!("forty")).is_err());
//! // keys without rules always pass
//! assert!(validator.check("name", &json!(null)).is_ok());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ValidationError, ValidationResult};
use crate::rules::KeyRules;
use crate::value::{as_string, type_name};

/// Predicate signature for callback rules.
pub type RuleFn = dyn Fn(&str, &Value) -> bool + Send + Sync;

/// A single validation rule.
#[derive(Clone)]
pub enum ValidationRule {
    /// Regex tested against the scalar value rendered as a string.
    /// Arrays and objects never match.
    Pattern(Regex),

    /// Compiled JSON schema, kept with its source for messages.
    Schema {
        schema: Value,
        validator: Arc<jsonschema::Validator>,
    },

    /// Custom predicate.
    Callback {
        check: Arc<RuleFn>,
        message: String,
    },
}

impl ValidationRule {
    pub fn pattern(pattern: &str) -> ValidationResult<Self> {
        Regex::new(pattern)
            .map(ValidationRule::Pattern)
            .map_err(|e| ValidationError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn schema(schema: Value) -> ValidationResult<Self> {
        let validator =
            jsonschema::draft7::new(&schema).map_err(|e| ValidationError::InvalidSchema {
                schema: schema.to_string(),
                message: e.to_string(),
            })?;
        Ok(ValidationRule::Schema {
            schema,
            validator: Arc::new(validator),
        })
    }

    pub fn callback<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + Send + Sync + 'static,
    {
        ValidationRule::Callback {
            check: Arc::new(check),
            message: message.into(),
        }
    }

    /// Check a value, returning the failure messages.
    pub fn check(&self, key: &str, value: &Value) -> Result<(), Vec<String>> {
        match self {
            ValidationRule::Pattern(regex) => match as_string(value) {
                Some(s) if regex.is_match(&s) => Ok(()),
                Some(s) => Err(vec![format!(
                    "Value '{}' does not match pattern '{}'",
                    s,
                    regex.as_str()
                )]),
                None => Err(vec![format!(
                    "Value of type {} cannot match pattern '{}'",
                    type_name(value),
                    regex.as_str()
                )]),
            },
            ValidationRule::Schema { validator, .. } => {
                let errors: Vec<String> = validator
                    .iter_errors(value)
                    .map(|e| e.to_string())
                    .collect();
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(errors)
                }
            }
            ValidationRule::Callback { check, message } => {
                if check(key, value) {
                    Ok(())
                } else {
                    Err(vec![message.clone()])
                }
            }
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            ValidationRule::Schema { schema, .. } => f.debug_tuple("Schema").field(schema).finish(),
            ValidationRule::Callback { message, .. } => {
                f.debug_struct("Callback").field("message", message).finish()
            }
        }
    }
}

/// Declarative rule, as found in options files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuleSpec {
    /// `{"pattern": "^\\d+$"}`
    Pattern(String),
    /// `{"schema": {"type": "integer"}}`
    Schema(Value),
}

impl RuleSpec {
    pub fn compile(&self) -> ValidationResult<ValidationRule> {
        match self {
            RuleSpec::Pattern(p) => ValidationRule::pattern(p),
            RuleSpec::Schema(s) => ValidationRule::schema(s.clone()),
        }
    }
}

/// Rule set applied on writes.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: KeyRules<ValidationRule>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for keys matching `pattern`.
    pub fn put(&mut self, pattern: &str, rule: ValidationRule) -> ValidationResult<()> {
        self.rules.put(pattern, rule)
    }

    /// Remove all rules registered under `pattern`.
    pub fn remove(&mut self, pattern: &str) -> usize {
        self.rules.remove(pattern)
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check `value` against every rule matching `key`.
    ///
    /// All rules run, so the error list is complete.
    pub fn check(&self, key: &str, value: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .rules
            .matching(key)
            .filter_map(|rule| rule.check(key, value).err())
            .flatten()
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validation messages recorded by a container, per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorList {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorList {
    pub fn record(&mut self, key: &str, messages: Vec<String>) {
        self.errors
            .entry(key.to_string())
            .or_default()
            .extend(messages);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.errors.get(key).map(Vec::as_slice)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.errors.remove(key)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
