//! Key rule registry.
//!
//! Validation rules and preparation callbacks are both registered against a
//! *key pattern*. When a key is read or written, every rule whose pattern
//! matches the key is dispatched, in registration order.
//!
//! A pattern is a regular expression tested against the key. Patterns made
//! only of key characters (`[A-Za-z0-9_-]`) are anchored, so `name` matches
//! the key `name` and not `username`. Anything else is used as written:
//! `^user_` matches every key starting with `user_`.
//!
//! # Example
//!
//! ```rust
//! use datacontainer::rules::KeyRules;
//!
//! let mut rules = KeyRules::new();
//! rules.put("^user_", "user rule").unwrap();
//! rules.put("user_id", "id rule").unwrap();
//!
//! let hits: Vec<_> = rules.matching("user_id").copied().collect();
//! assert_eq!(hits, vec!["user rule", "id rule"]);
//! ```

use regex::Regex;

use crate::error::{ValidationError, ValidationResult};

/// A compiled key pattern.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    source: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compile a key pattern.
    pub fn new(pattern: &str) -> ValidationResult<Self> {
        let is_literal = !pattern.is_empty()
            && pattern
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        let expr = if is_literal {
            format!("^{}$", regex::escape(pattern))
        } else {
            pattern.to_string()
        };

        let regex = Regex::new(&expr).map_err(|e| ValidationError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Ordered list of rules keyed by pattern.
#[derive(Debug, Clone)]
pub struct KeyRules<T> {
    entries: Vec<(KeyPattern, T)>,
}

impl<T> KeyRules<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a rule. Several rules may share one pattern.
    pub fn put(&mut self, pattern: &str, rule: T) -> ValidationResult<()> {
        let pattern = KeyPattern::new(pattern)?;
        self.entries.push((pattern, rule));
        Ok(())
    }

    /// Iterate the rules that apply to `key`, in registration order.
    pub fn matching<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.entries
            .iter()
            .filter(move |(pattern, _)| pattern.is_match(key))
            .map(|(_, rule)| rule)
    }

    /// Check whether any rule applies to `key`.
    pub fn applies_to(&self, key: &str) -> bool {
        self.entries.iter().any(|(pattern, _)| pattern.is_match(key))
    }

    /// Remove every rule registered under `pattern`. Returns how many were removed.
    pub fn remove(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(p, _)| p.as_str() != pattern);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered patterns, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }
}

impl<T> Default for KeyRules<T> {
    fn default() -> Self {
        Self::new()
    }
}
