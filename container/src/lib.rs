//! # datacontainer - key/value data holder with change tracking
//!
//! A [`Container`] wraps an insertion-ordered map of JSON values and adds
//! change tracking, per-key validation and preparation rules, accessor-by-name
//! dispatch, and conversion to and from several payload formats.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Payload   │────▶│   Formats   │────▶│  Container  │────▶│   Payload   │
//! │ (json, ini) │     │  (decode)   │     │ (rules+diff)│     │  (encode)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use datacontainer::{Container, Format, Operation, Stage, ValidationRule};
//! use serde_json::json;
//!
//! let mut container = Container::from_format(Format::Ini, "name = Joe\nage = 30").unwrap();
//! container
//!     .put_validation_rule("age", ValidationRule::pattern(r"^\d+$").unwrap())
//!     .unwrap()
//!     .put_preparation(Stage::Pre, "name", Operation::Uppercase)
//!     .unwrap();
//!
//! container.set_data("name", "ann").set_data("age", "unknown");
//!
//! assert_eq!(container.get_data("name"), Some(json!("ANN")));
//! assert_eq!(container.get_data("age"), Some(json!("30")));
//! assert!(container.has_errors());
//! assert_eq!(container.get_original_data("name"), Some(json!("Joe")));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`container`] - The container, change tracking, comparisons
//! - [`rules`] - Key-pattern dispatch shared by validation and preparation
//! - [`validation`] - Validation rules (regex, JSON Schema, callbacks)
//! - [`prepare`] - Preparation DSL and callbacks
//! - [`magic`] - Accessor-by-name dispatch (`getFooBar`, `setFooBar`, ...)
//! - [`formats`] - JSON, XML, PHP serialized, CSV and INI codecs
//! - [`config`] - Declarative container options
//! - [`logs`] - Log broadcast channel

// Core modules
pub mod error;
pub mod value;

// Rules
pub mod rules;
pub mod validation;
pub mod prepare;

// Container
pub mod container;
pub mod magic;

// Formats
pub mod formats;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    ContainerError,
    ContainerResult,
    FormatError,
    FormatResult,
    MagicError,
    ValidationError,
};

// =============================================================================
// Re-exports - Container
// =============================================================================

pub use container::{ChangeTracker, CompareOp, Container};
pub use magic::{parse_accessor, Accessor, Action};

// =============================================================================
// Re-exports - Rules
// =============================================================================

pub use rules::{KeyPattern, KeyRules};
pub use validation::{ErrorList, RuleSpec, ValidationRule, Validator};
pub use prepare::{operations_description, Operation, Preparation, Preparer, Stage};

// =============================================================================
// Re-exports - Formats
// =============================================================================

pub use formats::{
    decode,
    encode,
    read_file,
    detect_encoding,
    decode_content,
    Format,
    FormatOptions,
};

// =============================================================================
// Re-exports - Config & Logs
// =============================================================================

pub use config::{ContainerOptions, PreparationConfig, RuleConfig, OPTIONS_ENV};
pub use logs::{LogEntry, LogLevel, LOG_BROADCASTER};
