//! Error types for the data container.
//!
//! - [`FormatError`] - decoding/encoding failures of the format codecs
//! - [`ValidationError`] - rejected values and broken rule definitions
//! - [`MagicError`] - dynamic accessor dispatch failures
//! - [`ConfigError`] - options loading errors
//! - [`ContainerError`] - top-level error returned by [`crate::Container`]
//!
//! Lower-level errors convert into [`ContainerError`] through `From`,
//! so `?` works across module boundaries.

use thiserror::Error;

// =============================================================================
// Format Errors
// =============================================================================

/// Errors raised by the format codecs.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Unknown format name.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// The decoded payload is not a key/value mapping.
    #[error("Expected a key/value mapping, got {0}")]
    NotAnObject(String),

    /// JSON encode/decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML encode/decode error.
    #[error("XML error: {0}")]
    Xml(String),

    /// PHP serialized string is malformed.
    #[error("Serialized data error at byte {position}: {message}")]
    Serialized { position: usize, message: String },

    /// CSV encode/decode error.
    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    /// INI decode error.
    #[error("INI error on line {line}: {message}")]
    Ini { line: usize, message: String },

    /// Reading the payload failed.
    #[error("Failed to read payload: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    pub fn serialized(position: usize, message: impl Into<String>) -> Self {
        Self::Serialized {
            position,
            message: message.into(),
        }
    }

    pub fn csv(line: usize, message: impl Into<String>) -> Self {
        Self::Csv {
            line,
            message: message.into(),
        }
    }

    pub fn ini(line: usize, message: impl Into<String>) -> Self {
        Self::Ini {
            line,
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for FormatError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<csv::Error> for FormatError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        Self::Csv {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors from validation rules.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A value was rejected by one or more rules.
    #[error("Invalid value for key '{key}': {messages:?}")]
    Rejected { key: String, messages: Vec<String> },

    /// A rule pattern is not a valid regular expression.
    #[error("Invalid rule pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A JSON schema rule could not be compiled.
    #[error("Invalid JSON schema {schema}: {message}")]
    InvalidSchema { schema: String, message: String },
}

// =============================================================================
// Magic Accessor Errors
// =============================================================================

/// Errors from dynamic accessor dispatch.
#[derive(Debug, Error, PartialEq)]
pub enum MagicError {
    /// The method name has no known accessor prefix.
    #[error("Unknown accessor method: {0}")]
    UnknownMethod(String),

    /// The method name has a prefix but no key.
    #[error("Accessor '{0}' does not name a key")]
    MissingKey(String),

    /// Wrong number of arguments.
    #[error("Accessor '{method}' expects {expected} argument(s), got {got}")]
    Arity {
        method: String,
        expected: usize,
        got: usize,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading [`crate::ContainerOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Options file could not be read.
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// Options file is not valid JSON for the options schema.
    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Container Errors (top-level)
// =============================================================================

/// Top-level error returned by container operations.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Format codec error.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Validation rule error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Accessor dispatch error.
    #[error("Accessor error: {0}")]
    Magic(#[from] MagicError),

    /// Options error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for codec operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Result type for validation rule definitions.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
