//! Collection-style access to a [`Container`].
//!
//! Iteration and indexing see stored values as they are, without
//! post-preparation; use [`Container::get_all`] for the prepared view.

use serde_json::{Map, Value};
use std::fmt;
use std::ops::Index;

use super::Container;

impl Container {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Raw value of `key`.
///
/// # Panics
///
/// Panics if the key is absent, like map indexing in std.
impl Index<&str> for Container {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.data[key]
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Tracked writes, same as [`Container::set_data`].
impl<K: Into<String>> Extend<(K, Value)> for Container {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set_data(key, value);
        }
    }
}

/// Collected entries form the baseline.
impl<K: Into<String>> FromIterator<(K, Value)> for Container {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let map: Map<String, Value> = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Container::from_map(map)
    }
}

/// Compact JSON of the prepared data.
impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.get_all()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_access() {
        let container: Container = vec![("b", json!(2)), ("a", json!(1))].into_iter().collect();

        assert_eq!(container.len(), 2);
        assert!(!container.is_empty());
        assert!(!container.data_changed());
        assert_eq!(container.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(container["a"], json!(1));

        let pairs: Vec<_> = container.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        assert_eq!(pairs, vec!["b=2", "a=1"]);

        let mut count = 0;
        for (_, value) in &container {
            assert!(value.is_number());
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    #[should_panic]
    fn test_index_missing_key_panics() {
        let container = Container::new();
        let _ = &container["missing"];
    }

    #[test]
    fn test_extend_is_tracked() {
        let mut container = Container::new();
        container.extend(vec![("x".to_string(), json!(true))]);

        assert!(container.data_changed());
        assert_eq!(container.new_keys(), vec!["x"]);
    }

    #[test]
    fn test_display() {
        let container: Container = vec![("k", json!("v")), ("n", json!([1, null]))]
            .into_iter()
            .collect();
        assert_eq!(container.to_string(), r#"{"k":"v","n":[1,null]}"#);
    }
}
