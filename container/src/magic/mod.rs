//! Accessor-by-name dispatch.
//!
//! Method names like `getFirstName` or `hasURLPath` are split into an
//! [`Action`] and a snake_case key, then run against a container:
//!
//! | Prefix     | Effect                                   | Returns          |
//! |------------|------------------------------------------|------------------|
//! | `get`      | `get_data(key)`                          | value or `null`  |
//! | `set`      | `set_data(key, args[0])`                 | `true`           |
//! | `has`      | `has_data(key)`                          | bool             |
//! | `unset`    | `unset_data(key)`                        | `true`           |
//! | `restore`  | `restore_key(key)`                       | `true`           |
//! | `original` | `get_original_data(key)`                 | value or `null`  |
//! | `changed`  | `key_data_changed(key)`                  | bool             |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::container::Container;
use crate::error::MagicError;
use crate::value::camel_to_snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Get,
    Set,
    Has,
    Unset,
    Restore,
    Original,
    Changed,
}

impl Action {
    const PREFIXES: [(&'static str, Action); 7] = [
        ("original", Action::Original),
        ("restore", Action::Restore),
        ("changed", Action::Changed),
        ("unset", Action::Unset),
        ("get", Action::Get),
        ("set", Action::Set),
        ("has", Action::Has),
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
            Action::Has => "has",
            Action::Unset => "unset",
            Action::Restore => "restore",
            Action::Original => "original",
            Action::Changed => "changed",
        }
    }

    /// Number of arguments the action takes.
    pub fn arity(&self) -> usize {
        match self {
            Action::Set => 1,
            _ => 0,
        }
    }
}

/// A parsed accessor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub action: Action,
    pub key: String,
}

/// Split an accessor name into action and key.
///
/// Returns `None` for unknown prefixes and for names with nothing after
/// the prefix.
///
/// ```rust
/// use datacontainer::magic::{parse_accessor, Action};
///
/// let accessor = parse_accessor("getURLPath").unwrap();
/// assert_eq!(accessor.action, Action::Get);
/// assert_eq!(accessor.key, "url_path");
/// ```
pub fn parse_accessor(name: &str) -> Option<Accessor> {
    let (action, rest) = Action::PREFIXES
        .iter()
        .find_map(|(prefix, action)| name.strip_prefix(prefix).map(|rest| (*action, rest)))?;

    // `settings` is not `set` + `tings`
    if !rest.starts_with(|c: char| c.is_uppercase() || c == '_') {
        return None;
    }

    let key = camel_to_snake(rest.trim_start_matches('_'));
    if key.is_empty() {
        return None;
    }
    Some(Accessor { action, key })
}

impl Container {
    /// Run an accessor by name, e.g. `call("setFirstName", &[json!("Ann")])`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, MagicError> {
        let accessor = match parse_accessor(name) {
            Some(accessor) => accessor,
            None if Action::PREFIXES
                .iter()
                .any(|(p, _)| name.trim_end_matches('_') == *p) =>
            {
                return Err(MagicError::MissingKey(name.to_string()));
            }
            None => return Err(MagicError::UnknownMethod(name.to_string())),
        };

        let expected = accessor.action.arity();
        if args.len() != expected {
            return Err(MagicError::Arity {
                method: name.to_string(),
                expected,
                got: args.len(),
            });
        }

        let key = accessor.key.as_str();
        let result = match accessor.action {
            Action::Get => self.get_data(key).unwrap_or(Value::Null),
            Action::Set => {
                self.set_data(key, args[0].clone());
                Value::Bool(true)
            }
            Action::Has => Value::Bool(self.has_data(key)),
            Action::Unset => {
                self.unset_data(key);
                Value::Bool(true)
            }
            Action::Restore => {
                self.restore_key(key);
                Value::Bool(true)
            }
            Action::Original => self.get_original_data(key).unwrap_or(Value::Null),
            Action::Changed => Value::Bool(self.key_data_changed(key)),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_accessor() {
        let cases = [
            ("getFooBar", Action::Get, "foo_bar"),
            ("getURLPath", Action::Get, "url_path"),
            ("getItem2", Action::Get, "item2"),
            ("setName", Action::Set, "name"),
            ("unsetName", Action::Unset, "name"),
            ("originalAge", Action::Original, "age"),
            ("changedAge", Action::Changed, "age"),
            ("restoreAge", Action::Restore, "age"),
            ("hasX", Action::Has, "x"),
            ("get_snake_key", Action::Get, "snake_key"),
        ];
        for (name, action, key) in cases {
            let accessor = parse_accessor(name).unwrap();
            assert_eq!(accessor.action, action, "{}", name);
            assert_eq!(accessor.key, key, "{}", name);
        }
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(parse_accessor("get"), None);
        assert_eq!(parse_accessor("settings"), None);
        assert_eq!(parse_accessor("fetchName"), None);
        assert_eq!(parse_accessor("get_"), None);
    }

    #[test]
    fn test_call_round() {
        let mut container = Container::from_value(json!({ "first_name": "Joe" })).unwrap();

        assert_eq!(container.call("getFirstName", &[]).unwrap(), json!("Joe"));
        assert_eq!(container.call("hasLastName", &[]).unwrap(), json!(false));
        assert_eq!(container.call("setFirstName", &[json!("Ann")]).unwrap(), json!(true));
        assert_eq!(container.call("changedFirstName", &[]).unwrap(), json!(true));
        assert_eq!(container.call("originalFirstName", &[]).unwrap(), json!("Joe"));
        assert_eq!(container.call("restoreFirstName", &[]).unwrap(), json!(true));
        assert_eq!(container.call("getFirstName", &[]).unwrap(), json!("Joe"));
        assert_eq!(container.call("unsetFirstName", &[]).unwrap(), json!(true));
        assert_eq!(container.call("getFirstName", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_call_errors() {
        let mut container = Container::new();

        assert_eq!(
            container.call("fetchName", &[]),
            Err(MagicError::UnknownMethod("fetchName".into()))
        );
        assert_eq!(
            container.call("get", &[]),
            Err(MagicError::MissingKey("get".into()))
        );
        assert_eq!(
            container.call("get_", &[]),
            Err(MagicError::MissingKey("get_".into()))
        );
        assert_eq!(
            container.call("setName", &[]),
            Err(MagicError::Arity {
                method: "setName".into(),
                expected: 1,
                got: 0
            })
        );
        assert!(container.call("getName", &[json!(1)]).is_err());
    }
}
