//! Container options.
//!
//! Options can be built in code or loaded from a JSON file:
//!
//! ```json
//! {
//!   "data": "name = Joe\nage = 30",
//!   "format": "ini",
//!   "ini_typed": true,
//!   "validation": [
//!     { "key": "^age$", "rule": { "schema": { "type": "integer", "minimum": 0 } } }
//!   ],
//!   "preparation": [
//!     { "key": "name", "stage": "pre", "operations": [{ "type": "trim" }] }
//!   ]
//! }
//! ```
//!
//! Format settings (`xml_root`, `csv_delimiter`, ...) sit at the top level.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigResult;
use crate::formats::{Format, FormatOptions};
use crate::prepare::{Operation, Stage};
use crate::validation::RuleSpec;

/// Environment variable naming a default options file.
pub const OPTIONS_ENV: &str = "DATACONTAINER_OPTIONS";

/// A validation rule bound to a key pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleConfig {
    pub key: String,
    pub rule: RuleSpec,
}

/// Preparation operations bound to a key pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreparationConfig {
    pub key: String,
    #[serde(default = "default_stage")]
    pub stage: Stage,
    pub operations: Vec<Operation>,
}

fn default_stage() -> Stage {
    Stage::Pre
}

/// Options for [`crate::Container::with_options`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContainerOptions {
    /// Initial payload, loaded without change tracking.
    pub data: Option<String>,
    /// Format of `data`.
    pub format: Format,
    /// Run validation rules on writes.
    pub validate: bool,
    /// Run preparation rules on writes and reads.
    pub prepare: bool,
    #[serde(flatten)]
    pub formats: FormatOptions,
    pub validation: Vec<RuleConfig>,
    pub preparation: Vec<PreparationConfig>,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            data: None,
            format: Format::Json,
            validate: true,
            prepare: true,
            formats: FormatOptions::default(),
            validation: Vec::new(),
            preparation: Vec::new(),
        }
    }
}

impl ContainerOptions {
    /// Parse options from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Load the file named by [`OPTIONS_ENV`], if set.
    pub fn from_env() -> ConfigResult<Option<Self>> {
        match std::env::var(OPTIONS_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()).map(Some),
            _ => Ok(None),
        }
    }

    pub fn with_data(mut self, format: Format, data: impl Into<String>) -> Self {
        self.format = format;
        self.data = Some(data.into());
        self
    }

    pub fn with_rule(mut self, key: impl Into<String>, rule: RuleSpec) -> Self {
        self.validation.push(RuleConfig {
            key: key.into(),
            rule,
        });
        self
    }

    pub fn with_preparation(
        mut self,
        key: impl Into<String>,
        stage: Stage,
        operations: Vec<Operation>,
    ) -> Self {
        self.preparation.push(PreparationConfig {
            key: key.into(),
            stage,
            operations,
        });
        self
    }
}
