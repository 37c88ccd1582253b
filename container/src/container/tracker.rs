//! Change tracking against the original snapshot.
//!
//! The tracker never copies the whole data set. It keeps:
//!
//! - `original`: for each key touched since the baseline, the value it held
//!   before its first mutation (only keys that existed at the baseline)
//! - `new_keys`: keys added after the baseline
//! - `changed`: set by any mutation, cleared by a full restore or replace
//!
//! The original view is reconstructed on demand:
//!
//! ```text
//! original = (current ⊕ original) ∖ new_keys
//! ```

use serde_json::{Map, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    original: Map<String, Value>,
    new_keys: BTreeSet<String>,
    changed: bool,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` is about to be written; `previous` is its current value.
    pub fn record_write(&mut self, key: &str, previous: Option<&Value>) {
        if !self.original.contains_key(key) && !self.new_keys.contains(key) {
            match previous {
                Some(old) => {
                    self.original.insert(key.to_string(), old.clone());
                }
                None => {
                    self.new_keys.insert(key.to_string());
                }
            }
        }
        self.changed = true;
    }

    /// Record that `key`, currently holding `previous`, is about to be removed.
    pub fn record_removal(&mut self, key: &str, previous: &Value) {
        if !self.original.contains_key(key) && !self.new_keys.contains(key) {
            self.original.insert(key.to_string(), previous.clone());
        }
        self.changed = true;
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Whether `key` was added after the baseline.
    pub fn is_new(&self, key: &str) -> bool {
        self.new_keys.contains(key)
    }

    pub fn new_keys(&self) -> impl Iterator<Item = &str> {
        self.new_keys.iter().map(String::as_str)
    }

    /// Keys whose baseline value has been saved.
    pub fn touched_keys(&self) -> impl Iterator<Item = &str> {
        self.original.keys().map(String::as_str)
    }

    /// The baseline value of `key`, given the current data.
    pub fn original_value<'a>(&'a self, key: &str, current: &'a Map<String, Value>) -> Option<&'a Value> {
        if self.new_keys.contains(key) {
            return None;
        }
        self.original.get(key).or_else(|| current.get(key))
    }

    /// Reconstruct the full baseline.
    ///
    /// Keys keep their current position; keys removed since the baseline
    /// are appended in removal order.
    pub fn original_view(&self, current: &Map<String, Value>) -> Map<String, Value> {
        let mut view = Map::new();
        for (key, value) in current {
            if self.new_keys.contains(key) {
                continue;
            }
            let value = self.original.get(key).unwrap_or(value);
            view.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.original {
            if !view.contains_key(key) && !self.new_keys.contains(key) {
                view.insert(key.clone(), value.clone());
            }
        }
        view
    }

    /// Whether the current value of `key` differs from its baseline.
    pub fn key_changed(&self, key: &str, current: &Map<String, Value>) -> bool {
        self.original_value(key, current) != current.get(key)
    }

    /// Put `data` back to the baseline and forget all tracking.
    pub fn restore_all(&mut self, data: &mut Map<String, Value>) {
        *data = self.original_view(data);
        self.reset();
    }

    /// Put a single key back to its baseline. Returns false when the key
    /// was never touched.
    ///
    /// A removed key comes back at the end of `data`, which is also where
    /// the original view lists it; a full restore does the same.
    pub fn restore_key(&mut self, key: &str, data: &mut Map<String, Value>) -> bool {
        if self.new_keys.remove(key) {
            data.shift_remove(key);
            self.original.shift_remove(key);
            return true;
        }
        match self.original.shift_remove(key) {
            Some(value) => {
                data.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Make the current data the new baseline.
    pub fn reset(&mut self) {
        self.original.clear();
        self.new_keys.clear();
        self.changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    /// Tracked write, the way the container does it.
    fn write(tracker: &mut ChangeTracker, map: &mut Map<String, Value>, key: &str, value: Value) {
        tracker.record_write(key, map.get(key));
        map.insert(key.to_string(), value);
    }

    fn remove(tracker: &mut ChangeTracker, map: &mut Map<String, Value>, key: &str) {
        if let Some(old) = map.get(key).cloned() {
            tracker.record_removal(key, &old);
            map.shift_remove(key);
        }
    }

    #[test]
    fn test_first_mutation_keeps_baseline() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1 }));

        write(&mut tracker, &mut map, "a", json!(2));
        write(&mut tracker, &mut map, "a", json!(3));

        assert!(tracker.changed());
        assert_eq!(tracker.original_value("a", &map), Some(&json!(1)));
        assert_eq!(map["a"], json!(3));
    }

    #[test]
    fn test_new_keys_are_excluded_from_original() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1 }));

        write(&mut tracker, &mut map, "b", json!(2));
        write(&mut tracker, &mut map, "b", json!(3));

        assert!(tracker.is_new("b"));
        assert_eq!(tracker.original_value("b", &map), None);
        assert_eq!(tracker.original_view(&map), data(json!({ "a": 1 })));
        // a new key never gets a saved original
        assert_eq!(tracker.touched_keys().count(), 0);
    }

    #[test]
    fn test_removed_then_readded_key() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1, "b": 2 }));

        remove(&mut tracker, &mut map, "a");
        assert!(!map.contains_key("a"));
        assert_eq!(tracker.original_value("a", &map), Some(&json!(1)));

        write(&mut tracker, &mut map, "a", json!(5));
        assert!(!tracker.is_new("a"));
        assert_eq!(tracker.original_view(&map), data(json!({ "a": 1, "b": 2 })));
    }

    #[test]
    fn test_new_key_removed_and_readded() {
        let mut tracker = ChangeTracker::new();
        let mut map = Map::new();

        write(&mut tracker, &mut map, "x", json!(1));
        remove(&mut tracker, &mut map, "x");
        write(&mut tracker, &mut map, "x", json!(2));

        assert!(tracker.is_new("x"));
        assert!(tracker.original_view(&map).is_empty());
    }

    #[test]
    fn test_original_view_order() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1, "b": 2, "c": 3 }));

        remove(&mut tracker, &mut map, "a");
        write(&mut tracker, &mut map, "c", json!(30));
        write(&mut tracker, &mut map, "d", json!(4));

        let view = tracker.original_view(&map);
        assert_eq!(view.keys().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_eq!(view["c"], json!(3));
    }

    #[test]
    fn test_key_changed() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1, "b": 2 }));

        write(&mut tracker, &mut map, "a", json!(1));
        write(&mut tracker, &mut map, "b", json!(20));
        write(&mut tracker, &mut map, "c", json!(3));

        assert!(!tracker.key_changed("a", &map));
        assert!(tracker.key_changed("b", &map));
        assert!(tracker.key_changed("c", &map));
        assert!(!tracker.key_changed("missing", &map));
    }

    #[test]
    fn test_restore_all() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1, "b": 2 }));

        write(&mut tracker, &mut map, "a", json!(10));
        remove(&mut tracker, &mut map, "b");
        write(&mut tracker, &mut map, "c", json!(3));

        tracker.restore_all(&mut map);
        assert_eq!(map, data(json!({ "a": 1, "b": 2 })));
        assert!(!tracker.changed());
        assert_eq!(tracker.new_keys().count(), 0);
    }

    #[test]
    fn test_restore_key() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1 }));

        write(&mut tracker, &mut map, "a", json!(10));
        write(&mut tracker, &mut map, "n", json!(5));

        assert!(tracker.restore_key("a", &mut map));
        assert_eq!(map["a"], json!(1));
        assert!(tracker.restore_key("n", &mut map));
        assert!(!map.contains_key("n"));
        assert!(!tracker.restore_key("a", &mut map));

        // per-key restore leaves the flag alone
        assert!(tracker.changed());
    }

    #[test]
    fn test_restore_removed_key() {
        let mut tracker = ChangeTracker::new();
        let mut map = data(json!({ "a": 1, "b": 2, "c": 3 }));

        remove(&mut tracker, &mut map, "a");
        assert!(tracker.restore_key("a", &mut map));

        assert_eq!(map["a"], json!(1));
        assert_eq!(tracker.touched_keys().count(), 0);
        assert!(!tracker.key_changed("a", &map));
        // restored at the end, matching the original view
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_eq!(
            tracker.original_view(&map).keys().collect::<Vec<_>>(),
            vec!["b", "c", "a"]
        );
        assert!(tracker.changed());
    }
}
