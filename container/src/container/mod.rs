//! The data container.
//!
//! A [`Container`] wraps an insertion-ordered key/value map and adds:
//!
//! - change tracking against the data it was created with
//!   (see [`tracker`])
//! - per-key validation on writes ([`crate::validation`])
//! - per-key preparation on writes and reads ([`crate::prepare`])
//! - import/export through the format codecs ([`crate::formats`])
//!
//! # Lifecycle
//!
//! ```text
//! new / with_options / from_map ──▶ baseline (untracked)
//!        │
//!        ▼
//! set_data / unset_data / append ──▶ tracked changes
//!        │
//!        ├── restore_data ──▶ back to baseline, tracking cleared
//!        └── replace_data ──▶ new baseline, tracking cleared
//! ```
//!
//! # Example
//!
//! ```rust
//! use datacontainer::Container;
//! use serde_json::json;
//!
//! let mut container = Container::from_value(json!({ "name": "Joe" })).unwrap();
//! container.set_data("name", "Ann").set_data("age", 30);
//!
//! assert!(container.data_changed());
//! assert_eq!(container.get_original_data("name"), Some(json!("Joe")));
//! assert_eq!(container.get_original_data("age"), None);
//!
//! container.restore_data();
//! assert_eq!(container.to_json().unwrap(), r#"{"name":"Joe"}"#);
//! ```

pub mod access;
pub mod compare;
pub mod tracker;

use serde_json::{Map, Value};
use std::path::Path;

use crate::config::ContainerOptions;
use crate::error::{ContainerResult, FormatError, ValidationError};
use crate::formats::{self, Format, FormatOptions};
use crate::logs::{log_error, log_info, log_key, LogEntry};
use crate::prepare::{Preparation, Preparer, Stage};
use crate::validation::{ErrorList, ValidationRule, Validator};
use crate::value::type_name;

pub use compare::CompareOp;
pub use tracker::ChangeTracker;

/// Key/value data holder with change tracking.
#[derive(Debug, Clone)]
pub struct Container {
    data: Map<String, Value>,
    tracker: ChangeTracker,
    validator: Validator,
    preparer: Preparer,
    errors: ErrorList,
    format_options: FormatOptions,
    validate: bool,
    prepare: bool,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new() -> Self {
        Self {
            data: Map::new(),
            tracker: ChangeTracker::new(),
            validator: Validator::new(),
            preparer: Preparer::new(),
            errors: ErrorList::default(),
            format_options: FormatOptions::default(),
            validate: true,
            prepare: true,
        }
    }

    /// Build a container from options: rules first, then the initial payload.
    pub fn with_options(options: ContainerOptions) -> ContainerResult<Self> {
        let mut container = Self::new();
        container.format_options = options.formats;
        container.validate = options.validate;
        container.prepare = options.prepare;

        for entry in &options.validation {
            container.validator.put(&entry.key, entry.rule.compile()?)?;
        }
        for entry in options.preparation {
            container
                .preparer
                .put(entry.stage, &entry.key, entry.operations)?;
        }

        if let Some(payload) = &options.data {
            let map = formats::decode(options.format, payload, &container.format_options)?;
            container.load(map);
        }

        Ok(container)
    }

    /// Create a container whose baseline is `map`.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut container = Self::new();
        container.load(map);
        container
    }

    /// Create a container from a JSON object value.
    pub fn from_value(value: Value) -> ContainerResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(FormatError::NotAnObject(type_name(&other).to_string()).into()),
        }
    }

    /// Create a container by decoding a payload.
    pub fn from_format(format: Format, input: &str) -> ContainerResult<Self> {
        let mut container = Self::new();
        let map = formats::decode(format, input, &container.format_options)?;
        container.load(map);
        Ok(container)
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Register a validation rule for keys matching `pattern`.
    pub fn put_validation_rule(
        &mut self,
        pattern: &str,
        rule: ValidationRule,
    ) -> ContainerResult<&mut Self> {
        self.validator.put(pattern, rule)?;
        Ok(self)
    }

    pub fn remove_validation_rule(&mut self, pattern: &str) -> usize {
        self.validator.remove(pattern)
    }

    /// Register a preparation for keys matching `pattern`.
    pub fn put_preparation(
        &mut self,
        stage: Stage,
        pattern: &str,
        preparation: impl Into<Preparation>,
    ) -> ContainerResult<&mut Self> {
        self.preparer.put(stage, pattern, preparation)?;
        Ok(self)
    }

    pub fn remove_preparation(&mut self, stage: Stage, pattern: &str) -> usize {
        self.preparer.remove(stage, pattern)
    }

    /// Turn validation on or off.
    pub fn set_validation(&mut self, enabled: bool) -> &mut Self {
        self.validate = enabled;
        self
    }

    /// Turn preparation on or off.
    pub fn set_preparation(&mut self, enabled: bool) -> &mut Self {
        self.prepare = enabled;
        self
    }

    pub fn format_options(&self) -> &FormatOptions {
        &self.format_options
    }

    pub fn format_options_mut(&mut self) -> &mut FormatOptions {
        &mut self.format_options
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Validate and pre-prepare a value. Rejections are recorded.
    fn admit(&mut self, key: &str, value: Value) -> Result<Value, Vec<String>> {
        if self.validate {
            if let Err(messages) = self.validator.check(key, &value) {
                log_key(
                    LogEntry::warning(format!("value rejected: {}", messages.join("; "))),
                    key,
                );
                self.errors.record(key, messages.clone());
                return Err(messages);
            }
        }

        if self.prepare {
            Ok(self.preparer.apply(Stage::Pre, key, value))
        } else {
            Ok(value)
        }
    }

    /// Untracked load, used for baselines.
    fn load(&mut self, map: Map<String, Value>) {
        for (key, value) in map {
            if let Ok(value) = self.admit(&key, value) {
                self.data.insert(key, value);
            }
        }
    }

    /// Tracked write.
    fn put(&mut self, key: &str, value: Value) -> Result<(), Vec<String>> {
        let value = self.admit(key, value)?;
        self.tracker.record_write(key, self.data.get(key));
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    /// Set a value. Values rejected by validation are not stored; the
    /// failure is recorded in [`Container::errors`].
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let _ = self.put(&key, value.into());
        self
    }

    /// Set a value, reporting a rejection as an error.
    pub fn try_set_data(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        let key = key.into();
        self.put(&key, value.into())
            .map_err(|messages| ValidationError::Rejected { key, messages })
    }

    /// Set every entry of `map`, in order.
    pub fn set_many(&mut self, map: Map<String, Value>) -> &mut Self {
        for (key, value) in map {
            let _ = self.put(&key, value);
        }
        self
    }

    /// Remove a key. Absent keys are ignored.
    pub fn unset_data(&mut self, key: &str) -> &mut Self {
        if let Some(previous) = self.data.get(key) {
            self.tracker.record_removal(key, previous);
            self.data.shift_remove(key);
        }
        self
    }

    /// Remove every key (tracked).
    pub fn clear_data(&mut self) -> &mut Self {
        let keys: Vec<String> = self.data.keys().cloned().collect();
        for key in keys {
            self.unset_data(&key);
        }
        self
    }

    /// Discard all changes and go back to the baseline.
    pub fn restore_data(&mut self) -> &mut Self {
        self.tracker.restore_all(&mut self.data);
        log_info("restored original data");
        self
    }

    /// Restore one key. Returns false when the key had no changes.
    pub fn restore_key(&mut self, key: &str) -> bool {
        let restored = self.tracker.restore_key(key, &mut self.data);
        if restored {
            log_key(LogEntry::info("restored original value"), key);
        }
        restored
    }

    /// Replace all data and make it the new baseline.
    pub fn replace_data(&mut self, map: Map<String, Value>) -> &mut Self {
        self.data.clear();
        self.tracker.reset();
        let count = map.len();
        self.load(map);
        log_info(format!("replaced data with {} keys", count));
        self
    }

    /// Copy every current value of `other` into this container (tracked).
    pub fn merge(&mut self, other: &Container) -> &mut Self {
        self.set_many(other.get_all())
    }

    /// Apply `f` to stored values. With `recursive`, `f` sees the scalar
    /// leaves of arrays and objects (with their own key or index) instead
    /// of the top-level values. Values that change are written back as
    /// tracked updates.
    pub fn traverse<F>(&mut self, recursive: bool, mut f: F) -> &mut Self
    where
        F: FnMut(&str, &mut Value),
    {
        let keys: Vec<String> = self.data.keys().cloned().collect();
        for key in keys {
            let Some(current) = self.data.get(&key) else {
                continue;
            };
            let mut value = current.clone();
            if recursive {
                walk(&key, &mut value, &mut f);
            } else {
                f(&key, &mut value);
            }
            if self.data.get(&key) != Some(&value) {
                let _ = self.put(&key, value);
            }
        }
        self
    }

    // =========================================================================
    // Read path
    // =========================================================================

    fn post(&self, key: &str, value: Value) -> Value {
        if self.prepare {
            self.preparer.apply(Stage::Post, key, value)
        } else {
            value
        }
    }

    /// Current value of `key`, after post-preparation.
    pub fn get_data(&self, key: &str) -> Option<Value> {
        self.data.get(key).map(|v| self.post(key, v.clone()))
    }

    /// Stored value of `key`, without post-preparation.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// All current values, after post-preparation.
    pub fn get_all(&self) -> Map<String, Value> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), self.post(k, v.clone())))
            .collect()
    }

    /// Whether `key` is present; `null` counts as present.
    pub fn has_data(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Baseline value of `key`; `None` for keys added since.
    pub fn get_original_data(&self, key: &str) -> Option<Value> {
        self.tracker
            .original_value(key, &self.data)
            .map(|v| self.post(key, v.clone()))
    }

    /// The full baseline.
    pub fn get_original_all(&self) -> Map<String, Value> {
        self.tracker
            .original_view(&self.data)
            .into_iter()
            .map(|(k, v)| {
                let v = self.post(&k, v);
                (k, v)
            })
            .collect()
    }

    /// True once any mutation happened since creation or the last
    /// full restore/replace.
    pub fn data_changed(&self) -> bool {
        self.tracker.changed()
    }

    /// Whether `key` differs from its baseline (presence included).
    pub fn key_data_changed(&self, key: &str) -> bool {
        self.tracker.key_changed(key, &self.data)
    }

    /// Keys added since the baseline.
    pub fn new_keys(&self) -> Vec<String> {
        self.tracker.new_keys().map(str::to_string).collect()
    }

    /// Every key whose value differs from the baseline, current keys first.
    pub fn changed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .data
            .keys()
            .filter(|k| self.key_data_changed(k))
            .cloned()
            .collect();
        for key in self.tracker.touched_keys() {
            if !self.data.contains_key(key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Compare the current value of `key` with `value`. A missing key
    /// compares as `null`.
    pub fn compare_data(&self, key: &str, value: &Value, op: CompareOp) -> bool {
        let current = self.get_data(key).unwrap_or(Value::Null);
        op.compare(&current, value)
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    pub fn key_errors(&self, key: &str) -> Option<&[String]> {
        self.errors.get(key)
    }

    pub fn remove_error(&mut self, key: &str) -> Option<Vec<String>> {
        self.errors.remove(key)
    }

    pub fn clear_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }

    // =========================================================================
    // Import / export
    // =========================================================================

    /// Decode a payload and set its entries (tracked).
    pub fn append(&mut self, format: Format, input: &str) -> ContainerResult<&mut Self> {
        match formats::decode(format, input, &self.format_options) {
            Ok(map) => Ok(self.set_many(map)),
            Err(e) => {
                log_error(format!("failed to append {} data: {}", format, e));
                Err(e.into())
            }
        }
    }

    /// Read a payload file (encoding auto-detected) and append it.
    pub fn append_file<P: AsRef<Path>>(&mut self, format: Format, path: P) -> ContainerResult<&mut Self> {
        let content = formats::read_file(path)?;
        self.append(format, &content)
    }

    /// Encode all current values (post-prepared).
    pub fn export(&self, format: Format) -> ContainerResult<String> {
        Ok(formats::encode(format, &self.get_all(), &self.format_options)?)
    }

    /// Same as [`Container::get_all`].
    pub fn to_array(&self) -> Map<String, Value> {
        self.get_all()
    }

    pub fn to_json(&self) -> ContainerResult<String> {
        self.export(Format::Json)
    }

    pub fn to_xml(&self) -> ContainerResult<String> {
        self.export(Format::Xml)
    }

    pub fn to_simple_xml(&self) -> ContainerResult<String> {
        self.export(Format::SimpleXml)
    }

    pub fn to_serialized(&self) -> ContainerResult<String> {
        self.export(Format::Serialized)
    }

    pub fn to_csv(&self) -> ContainerResult<String> {
        self.export(Format::Csv)
    }

    pub fn to_ini(&self) -> ContainerResult<String> {
        self.export(Format::Ini)
    }

    pub fn append_array(&mut self, map: Map<String, Value>) -> &mut Self {
        self.set_many(map)
    }

    pub fn append_json(&mut self, input: &str) -> ContainerResult<&mut Self> {
        self.append(Format::Json, input)
    }

    pub fn append_xml(&mut self, input: &str) -> ContainerResult<&mut Self> {
        self.append(Format::Xml, input)
    }

    pub fn append_simple_xml(&mut self, input: &str) -> ContainerResult<&mut Self> {
        self.append(Format::SimpleXml, input)
    }

    pub fn append_serialized(&mut self, input: &str) -> ContainerResult<&mut Self> {
        self.append(Format::Serialized, input)
    }

    pub fn append_csv(&mut self, input: &str) -> ContainerResult<&mut Self> {
        self.append(Format::Csv, input)
    }

    pub fn append_ini(&mut self, input: &str) -> ContainerResult<&mut Self> {
        self.append(Format::Ini, input)
    }
}

fn walk<F>(key: &str, value: &mut Value, f: &mut F)
where
    F: FnMut(&str, &mut Value),
{
    match value {
        Value::Object(map) => {
            for (k, child) in map.iter_mut() {
                walk(k, child, f);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter_mut().enumerate() {
                walk(&i.to_string(), child, f);
            }
        }
        leaf => f(key, leaf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::Operation;
    use serde_json::json;

    fn sample() -> Container {
        Container::from_value(json!({ "name": "Joe", "age": 30, "city": "Paris" })).unwrap()
    }

    #[test]
    fn test_construction_is_untracked() {
        let container = sample();
        assert!(!container.data_changed());
        assert!(container.new_keys().is_empty());
        assert_eq!(container.get_original_all(), container.get_all());
        assert_eq!(container.len(), 3);
    }

    #[test]
    fn test_set_tracks_original_and_new_keys() {
        let mut container = sample();
        container.set_data("name", "Ann").set_data("country", "FR");

        assert!(container.data_changed());
        assert_eq!(container.get_data("name"), Some(json!("Ann")));
        assert_eq!(container.get_original_data("name"), Some(json!("Joe")));
        assert_eq!(container.get_original_data("country"), None);
        assert_eq!(container.new_keys(), vec!["country"]);
        assert_eq!(
            container.get_original_all(),
            *json!({ "name": "Joe", "age": 30, "city": "Paris" }).as_object().unwrap()
        );
    }

    #[test]
    fn test_unset_and_has() {
        let mut container = sample();
        container.set_data("nothing", Value::Null);
        assert!(container.has_data("nothing"));

        container.unset_data("city").unset_data("missing");
        assert!(!container.has_data("city"));
        assert_eq!(container.get_original_data("city"), Some(json!("Paris")));
        assert!(container.key_data_changed("city"));
    }

    #[test]
    fn test_clear_data_then_restore() {
        let mut container = sample();
        container.clear_data();
        assert!(container.is_empty());
        assert!(container.data_changed());

        container.restore_data();
        assert_eq!(container.len(), 3);
        assert_eq!(container.get_data("age"), Some(json!(30)));
        assert!(!container.data_changed());
    }

    #[test]
    fn test_restore_key_keeps_changed_flag() {
        let mut container = sample();
        container.set_data("age", 31).set_data("extra", true);

        assert!(container.restore_key("age"));
        assert!(container.restore_key("extra"));
        assert!(!container.restore_key("city"));

        assert_eq!(container.get_data("age"), Some(json!(30)));
        assert!(!container.has_data("extra"));
        assert!(container.data_changed());
        assert!(!container.key_data_changed("age"));
    }

    #[test]
    fn test_restore_removed_key() {
        let mut container = sample();
        container.unset_data("age");
        assert!(container.key_data_changed("age"));

        assert!(container.restore_key("age"));
        assert_eq!(container.get_data("age"), Some(json!(30)));
        assert!(!container.key_data_changed("age"));
        assert!(container.changed_keys().is_empty());
        // nothing left to restore
        assert!(!container.restore_key("age"));
    }

    #[test]
    fn test_unset_then_set_keeps_original() {
        let mut container = sample();
        container.unset_data("city").set_data("city", "Lyon");

        assert_eq!(container.get_original_data("city"), Some(json!("Paris")));
        assert!(container.new_keys().is_empty());
        assert!(container.key_data_changed("city"));

        container.set_data("city", "Paris");
        assert!(!container.key_data_changed("city"));
        assert_eq!(container.get_original_data("city"), Some(json!("Paris")));
    }

    #[test]
    fn test_append_hostile_serialized_payloads() {
        let mut container = sample();
        assert!(container
            .append_serialized(r#"a:1:{s:1:"k";s:18446744073709551615:"x";}"#)
            .is_err());

        let deep = format!("{}N;{}", "a:1:{i:0;".repeat(10_000), "}".repeat(10_000));
        assert!(container.append_serialized(&deep).is_err());
        assert!(!container.data_changed());
    }

    #[test]
    fn test_replace_data_sets_new_baseline() {
        let mut container = sample();
        container.set_data("name", "Ann");

        container.replace_data(json!({ "id": 1 }).as_object().unwrap().clone());
        assert!(!container.data_changed());
        assert_eq!(container.get_original_data("id"), Some(json!(1)));
        assert!(!container.has_data("name"));

        container.set_data("id", 2);
        container.restore_data();
        assert_eq!(container.get_data("id"), Some(json!(1)));
    }

    #[test]
    fn test_changed_keys() {
        let mut container = sample();
        container
            .set_data("name", "Ann")
            .set_data("age", 30)
            .set_data("new", 1)
            .unset_data("city");

        assert_eq!(container.changed_keys(), vec!["name", "new", "city"]);
    }

    #[test]
    fn test_validation_rejects_and_records() {
        let mut container = sample();
        container
            .put_validation_rule("^age$", ValidationRule::pattern(r"^\d+$").unwrap())
            .unwrap();

        container.set_data("age", "old");
        assert_eq!(container.get_data("age"), Some(json!(30)));
        assert!(container.has_errors());
        assert_eq!(container.key_errors("age").unwrap().len(), 1);
        // a rejected write is not a change
        assert!(!container.data_changed());

        let err = container.try_set_data("age", "older").unwrap_err();
        assert!(matches!(err, ValidationError::Rejected { ref key, .. } if key == "age"));
        assert_eq!(container.key_errors("age").unwrap().len(), 2);

        container.set_data("age", 31);
        assert_eq!(container.get_data("age"), Some(json!(31)));

        container.clear_errors();
        assert!(!container.has_errors());
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let mut container = Container::new();
        container
            .put_validation_rule(".*", ValidationRule::callback("never", |_, _| false))
            .unwrap();
        container.set_validation(false).set_data("a", 1);
        assert_eq!(container.get_data("a"), Some(json!(1)));
        assert!(!container.has_errors());
    }

    #[test]
    fn test_pre_and_post_preparation() {
        let mut container = Container::new();
        container
            .put_preparation(Stage::Pre, "^name$", Operation::Trim)
            .unwrap()
            .put_preparation(Stage::Post, "^name$", Operation::Uppercase)
            .unwrap();

        container.set_data("name", "  joe ");
        assert_eq!(container.get_raw("name"), Some(&json!("joe")));
        assert_eq!(container.get_data("name"), Some(json!("JOE")));
        assert_eq!(container.to_json().unwrap(), r#"{"name":"JOE"}"#);

        container.set_preparation(false);
        assert_eq!(container.get_data("name"), Some(json!("joe")));
    }

    #[test]
    fn test_with_options() {
        let options = ContainerOptions::from_json(
            r#"{
                "data": "name = \" Joe \"\nage = 30\nbad = x",
                "format": "ini",
                "ini_typed": true,
                "validation": [{ "key": "^bad$", "rule": { "schema": { "type": "integer" } } }],
                "preparation": [{ "key": "name", "operations": [{ "type": "trim" }] }]
            }"#,
        )
        .unwrap();
        let container = Container::with_options(options).unwrap();

        assert_eq!(container.get_data("name"), Some(json!("Joe")));
        assert_eq!(container.get_data("age"), Some(json!(30)));
        assert!(!container.has_data("bad"));
        assert!(container.has_errors());
        assert!(!container.data_changed());
    }

    #[test]
    fn test_with_options_invalid_rule() {
        let options = ContainerOptions::default()
            .with_rule("(", crate::validation::RuleSpec::Pattern(".*".into()));
        assert!(Container::with_options(options).is_err());
    }

    #[test]
    fn test_merge() {
        let mut container = sample();
        let other = Container::from_value(json!({ "age": 40, "pet": "cat" })).unwrap();
        container.merge(&other);

        assert_eq!(container.get_data("age"), Some(json!(40)));
        assert_eq!(container.new_keys(), vec!["pet"]);
        assert_eq!(container.get_original_data("age"), Some(json!(30)));
    }

    #[test]
    fn test_traverse() {
        let mut container =
            Container::from_value(json!({ "a": " x ", "b": { "c": " y " }, "d": 1 })).unwrap();

        container.traverse(true, |_, v| {
            if let Value::String(s) = v {
                *s = s.trim().to_string();
            }
        });

        assert_eq!(container.get_data("a"), Some(json!("x")));
        assert_eq!(container.get_data("b"), Some(json!({ "c": "y" })));
        assert!(container.key_data_changed("b"));
        assert!(!container.key_data_changed("d"));

        let mut seen = Vec::new();
        container.traverse(false, |k, _| seen.push(k.to_string()));
        assert_eq!(seen, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_append_and_export() {
        let mut container = Container::new();
        container.append_ini("a = 1\n[s]\nb = 2\n").unwrap();
        container.append_json(r#"{"c": [1, 2]}"#).unwrap();

        assert_eq!(container.get_data("s"), Some(json!({ "b": "2" })));
        assert_eq!(container.new_keys().len(), 3);

        let serialized = container.to_serialized().unwrap();
        assert!(serialized.starts_with("a:3:{"));
        let xml = container.to_xml().unwrap();
        assert!(xml.contains("<c>1</c><c>2</c>"));
        assert!(container.to_csv().unwrap().contains("c,1,2"));
    }

    #[test]
    fn test_append_invalid_payload() {
        let mut container = sample();
        assert!(container.append_json("[1, 2]").is_err());
        assert!(container.append_serialized("garbage").is_err());
        assert!(!container.data_changed());
    }

    #[test]
    fn test_from_value_rejects_scalars() {
        assert!(Container::from_value(json!(1)).is_err());
    }

    #[test]
    fn test_compare_data() {
        let container = sample();
        assert!(container.compare_data("age", &json!("30"), CompareOp::Eq));
        assert!(!container.compare_data("age", &json!("30"), CompareOp::StrictEq));
        assert!(container.compare_data("age", &json!(18), CompareOp::Gt));
        assert!(container.compare_data("missing", &Value::Null, CompareOp::StrictEq));
    }
}
