//! Preparation operations.
//!
//! Declarative value transformations usable as pre (on write) or post
//! (on read) preparation steps. Operations are serde-tagged so they can be
//! listed in options files:
//!
//! ```json
//! [{"type": "trim"}, {"type": "pad_start", "length": 5}]
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::value::{as_string, is_empty};

/// All available preparation operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Remove leading and trailing whitespace
    Trim,

    /// Convert to uppercase
    Uppercase,

    /// Convert to lowercase
    Lowercase,

    /// Replace using regex pattern
    Replace {
        pattern: String,
        #[serde(default)]
        value: String,
    },

    /// Pad string at start to reach target length
    PadStart {
        length: usize,
        #[serde(default = "default_pad_char")]
        char: String,
    },

    /// Pad string at end to reach target length
    PadEnd {
        length: usize,
        #[serde(default = "default_pad_char")]
        char: String,
    },

    /// Ensure string starts with given prefix
    EnsurePrefix { value: String },

    /// Ensure string ends with given suffix
    EnsureSuffix { value: String },

    /// Map values using a lookup table
    Map {
        mapping: HashMap<String, String>,
        #[serde(default)]
        case_insensitive: bool,
        /// Value used when nothing matches; unmatched values pass through otherwise
        #[serde(default)]
        default_unmapped: Option<String>,
    },

    /// Split string into array
    Split {
        #[serde(default = "default_separator")]
        separator: String,
    },

    /// Join an array of scalars into one string
    Join {
        #[serde(default = "default_separator")]
        separator: String,
    },

    /// Convert to boolean
    ToBoolean {
        #[serde(default = "default_true_values")]
        true_values: Vec<String>,
    },

    /// Convert to number (integer or float)
    ToNumber,

    /// Take a character range
    Substring {
        start: usize,
        #[serde(default)]
        length: Option<usize>,
    },

    /// Remove all non-alphanumeric characters
    Alphanumeric,

    /// Remove all non-digit characters
    DigitsOnly,

    /// Replace null or blank values
    Default { value: Value },
}

fn default_pad_char() -> String {
    "0".to_string()
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_true_values() -> Vec<String> {
    ["true", "1", "yes", "on", "y"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Operation {
    /// Apply this operation to a value
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Operation::Trim => map_str(value, |s| s.trim().to_string()),
            Operation::Uppercase => map_str(value, |s| s.to_uppercase()),
            Operation::Lowercase => map_str(value, |s| s.to_lowercase()),
            Operation::Replace {
                pattern,
                value: replacement,
            } => Self::apply_replace(value, pattern, replacement),
            Operation::PadStart { length, char } => {
                map_str(value, |s| pad(s, *length, char, true))
            }
            Operation::PadEnd { length, char } => map_str(value, |s| pad(s, *length, char, false)),
            Operation::EnsurePrefix { value: prefix } => map_str(value, |s| {
                if s.starts_with(prefix.as_str()) {
                    s.to_string()
                } else {
                    format!("{}{}", prefix, s)
                }
            }),
            Operation::EnsureSuffix { value: suffix } => map_str(value, |s| {
                if s.ends_with(suffix.as_str()) {
                    s.to_string()
                } else {
                    format!("{}{}", s, suffix)
                }
            }),
            Operation::Map {
                mapping,
                case_insensitive,
                default_unmapped,
            } => Self::apply_map(value, mapping, *case_insensitive, default_unmapped.as_deref()),
            Operation::Split { separator } => Self::apply_split(value, separator),
            Operation::Join { separator } => Self::apply_join(value, separator),
            Operation::ToBoolean { true_values } => Self::apply_to_boolean(value, true_values),
            Operation::ToNumber => Self::apply_to_number(value),
            Operation::Substring { start, length } => map_str(value, |s| {
                let chars: Vec<char> = s.chars().collect();
                let begin = (*start).min(chars.len());
                let end = length
                    .map(|l| begin.saturating_add(l))
                    .unwrap_or(chars.len())
                    .min(chars.len());
                chars[begin..end].iter().collect()
            }),
            Operation::Alphanumeric => {
                map_str(value, |s| s.chars().filter(|c| c.is_alphanumeric()).collect())
            }
            Operation::DigitsOnly => {
                map_str(value, |s| s.chars().filter(|c| c.is_ascii_digit()).collect())
            }
            Operation::Default { value: fallback } => {
                if is_empty(value) {
                    fallback.clone()
                } else {
                    value.clone()
                }
            }
        }
    }

    fn apply_replace(value: &Value, pattern: &str, replacement: &str) -> Value {
        match Regex::new(pattern) {
            Ok(re) => map_str(value, |s| re.replace_all(s, replacement).to_string()),
            Err(_) => value.clone(),
        }
    }

    fn apply_map(
        value: &Value,
        mapping: &HashMap<String, String>,
        case_insensitive: bool,
        default_unmapped: Option<&str>,
    ) -> Value {
        let Some(s) = scalar_string(value) else {
            return value.clone();
        };

        let found = if case_insensitive {
            let lower = s.to_lowercase();
            mapping.iter().find(|(k, _)| k.to_lowercase() == lower)
        } else {
            mapping.get_key_value(&s)
        };

        match (found, default_unmapped) {
            (Some((_, v)), _) => Value::String(v.clone()),
            (None, Some(d)) => Value::String(d.to_string()),
            (None, None) => value.clone(),
        }
    }

    fn apply_split(value: &Value, separator: &str) -> Value {
        match value {
            Value::String(s) if !separator.is_empty() => Value::Array(
                s.split(separator)
                    .map(|p| Value::String(p.trim().to_string()))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }

    fn apply_join(value: &Value, separator: &str) -> Value {
        match value {
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(as_string).collect();
                Value::String(parts.join(separator))
            }
            _ => value.clone(),
        }
    }

    fn apply_to_boolean(value: &Value, true_values: &[String]) -> Value {
        match value {
            Value::Bool(b) => Value::Bool(*b),
            Value::Number(n) => Value::Bool(n.as_f64().is_some_and(|f| f != 0.0)),
            _ => scalar_string(value)
                .map(|s| {
                    let lower = s.trim().to_lowercase();
                    Value::Bool(true_values.iter().any(|tv| tv.to_lowercase() == lower))
                })
                .unwrap_or(Value::Bool(false)),
        }
    }

    fn apply_to_number(value: &Value) -> Value {
        match value {
            Value::Number(_) => value.clone(),
            Value::Bool(b) => Value::from(i64::from(*b)),
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Value::from(n);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            _ => Value::Null,
        }
    }
}

/// Apply `f` to string-like scalars; other values pass through untouched.
fn map_str<F>(value: &Value, f: F) -> Value
where
    F: FnOnce(&str) -> String,
{
    match scalar_string(value) {
        Some(s) => Value::String(f(&s)),
        None => value.clone(),
    }
}

/// Strings and numbers; null, booleans and collections are left alone.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn pad(s: &str, length: usize, pad_char: &str, at_start: bool) -> String {
    let count = s.chars().count();
    if count >= length {
        return s.to_string();
    }
    let c = pad_char.chars().next().unwrap_or('0');
    let padding: String = std::iter::repeat_n(c, length - count).collect();
    if at_start {
        format!("{}{}", padding, s)
    } else {
        format!("{}{}", s, padding)
    }
}

/// Get a description of all available operations
pub fn operations_description() -> String {
    r#"Available preparation operations:

| Operation | Description | Parameters |
|-----------|-------------|------------|
| trim | Remove leading/trailing whitespace | - |
| uppercase | Convert to uppercase | - |
| lowercase | Convert to lowercase | - |
| replace | Regex pattern replacement | pattern: regex, value: replacement |
| pad_start | Pad string at start | length: target length, char: pad character (default "0") |
| pad_end | Pad string at end | length: target length, char: pad character (default "0") |
| ensure_prefix | Add prefix if not present | value: prefix string |
| ensure_suffix | Add suffix if not present | value: suffix string |
| map | Map values using lookup table | mapping: {source: target}, case_insensitive: bool, default_unmapped: string |
| split | Split string into array | separator (default ",") |
| join | Join array into string | separator (default ",") |
| to_boolean | Convert to boolean | true_values: list of truthy strings |
| to_number | Convert to number | - |
| substring | Extract substring | start: start index, length: optional length |
| alphanumeric | Keep only alphanumeric chars | - |
| digits_only | Keep only digits | - |
| default | Replace null/blank values | value: any JSON value |

Example operations in JSON:
[
  {"type": "trim"},
  {"type": "replace", "pattern": "[-. ]", "value": ""},
  {"type": "map", "mapping": {"m": "male", "f": "female"}, "case_insensitive": true},
  {"type": "to_number"},
  {"type": "default", "value": 0}
]"#
    .to_string()
}
