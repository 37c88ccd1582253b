//! INI codec.
//!
//! ```ini
//! ; top-level keys first
//! name = Joe
//! tags[] = a
//! tags[] = b
//!
//! [database]
//! host = localhost
//! port = 5432
//! ```
//!
//! With sections enabled, top-level objects become `[section]` blocks and
//! objects nested below that level use `key[sub] = value`. Without sections,
//! every object uses the `key[sub]` form and section headers are ignored on
//! decode.
//!
//! Strings are quoted when they would otherwise be misread: special
//! characters, surrounding whitespace, or text that looks like a number,
//! boolean or null.

use serde_json::{Map, Number, Value};

use super::FormatOptions;
use crate::error::{FormatError, FormatResult};

// =============================================================================
// Encoding
// =============================================================================

pub fn encode(data: &Map<String, Value>, options: &FormatOptions) -> String {
    let mut out = String::new();
    let mut sections: Vec<(&String, &Map<String, Value>)> = Vec::new();

    for (key, value) in data {
        match value {
            Value::Object(map) if options.ini_sections => sections.push((key, map)),
            other => write_entry(&mut out, key, other),
        }
    }

    for (name, map) in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", name));
        for (key, value) in map {
            write_entry(&mut out, key, value);
        }
    }

    out
}

fn write_entry(out: &mut String, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                out.push_str(&format!("{}[] = {}\n", key, render(item)));
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                out.push_str(&format!("{}[{}] = {}\n", key, sub, render(item)));
            }
        }
        scalar => out.push_str(&format!("{} = {}\n", key, render(scalar))),
    }
}

fn render(value: &Value) -> String {
    match value {
        // empty value; an empty string is quoted instead
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if needs_quotes(s) {
                quote(s)
            } else {
                s.clone()
            }
        }
        // deeper nesting has no INI form
        nested => quote(&nested.to_string()),
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || s.contains(&['=', ';', '#', '"', '[', ']', '\n', '\r', '\\'][..])
        || !matches!(typed(s), Value::String(_))
}

fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"", escaped)
}

// =============================================================================
// Decoding
// =============================================================================

pub fn decode(input: &str, options: &FormatOptions) -> FormatResult<Map<String, Value>> {
    let mut map = Map::new();
    let mut section: Option<String> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .ok_or_else(|| FormatError::ini(line_num, "unterminated section header"))?
                .trim();
            if name.is_empty() {
                return Err(FormatError::ini(line_num, "empty section name"));
            }
            if options.ini_sections {
                map.entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                section = Some(name.to_string());
            }
            continue;
        }

        let (raw_key, raw_value) = line
            .split_once('=')
            .ok_or_else(|| FormatError::ini(line_num, format!("expected 'key = value', got '{}'", line)))?;
        let raw_key = raw_key.trim();
        if raw_key.is_empty() {
            return Err(FormatError::ini(line_num, "empty key"));
        }
        let value = parse_value(raw_value.trim(), options.ini_typed, line_num)?;

        let target = match &section {
            Some(name) => match map.get_mut(name) {
                Some(Value::Object(inner)) => inner,
                _ => return Err(FormatError::ini(line_num, format!("section '{}' clashes with a key", name))),
            },
            None => &mut map,
        };
        insert(target, raw_key, value, line_num)?;
    }

    Ok(map)
}

/// Insert `key`, `key[]` or `key[sub]`.
fn insert(target: &mut Map<String, Value>, raw_key: &str, value: Value, line: usize) -> FormatResult<()> {
    let Some((name, rest)) = raw_key.split_once('[') else {
        target.insert(raw_key.to_string(), value);
        return Ok(());
    };

    let sub = rest
        .strip_suffix(']')
        .ok_or_else(|| FormatError::ini(line, format!("malformed key '{}'", raw_key)))?
        .trim();
    let name = name.trim().to_string();

    if sub.is_empty() {
        let slot = target.entry(name).or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(value),
            _ => return Err(FormatError::ini(line, format!("'{}' is not an array", raw_key))),
        }
    } else {
        let slot = target.entry(name).or_insert_with(|| Value::Object(Map::new()));
        match slot {
            Value::Object(items) => {
                items.insert(sub.to_string(), value);
            }
            _ => return Err(FormatError::ini(line, format!("'{}' is not a map", raw_key))),
        }
    }
    Ok(())
}

fn parse_value(raw: &str, typed_values: bool, line: usize) -> FormatResult<Value> {
    if let Some(quoted) = raw.strip_prefix('"') {
        return unquote(quoted, line).map(Value::String);
    }

    // inline comment
    let text = match raw.find(" ;") {
        Some(pos) => raw[..pos].trim_end(),
        None => raw,
    };

    if typed_values {
        Ok(typed(text))
    } else {
        Ok(Value::String(text.to_string()))
    }
}

fn unquote(rest: &str, line: usize) -> FormatResult<String> {
    let mut out = String::new();
    let mut chars = rest.chars();
    loop {
        match chars.next() {
            None => return Err(FormatError::ini(line, "unterminated quoted value")),
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(c) => out.push(c),
                None => return Err(FormatError::ini(line, "dangling escape")),
            },
            Some(c) => out.push(c),
        }
    }

    let tail = chars.as_str().trim();
    if !tail.is_empty() && !tail.starts_with(';') && !tail.starts_with('#') {
        return Err(FormatError::ini(line, "unexpected text after quoted value"));
    }
    Ok(out)
}

/// Interpret an unquoted value.
fn typed(text: &str) -> Value {
    match text.to_lowercase().as_str() {
        "true" | "on" | "yes" => return Value::Bool(true),
        "false" | "off" | "no" => return Value::Bool(false),
        "null" | "none" | "" => return Value::Null,
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::from(n);
    }
    if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn typed_opts() -> FormatOptions {
        FormatOptions {
            ini_typed: true,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn test_encode_sections() {
        let data = json!({
            "name": "Joe",
            "db": { "host": "localhost", "port": 5432, "opts": ["a", "b"] },
            "tags": ["x", "y"],
            "code": "007",
            "note": "a;b"
        });
        let out = encode(data.as_object().unwrap(), &FormatOptions::default());

        let expected = "name = Joe\n\
                        tags[] = x\n\
                        tags[] = y\n\
                        code = \"007\"\n\
                        note = \"a;b\"\n\
                        \n\
                        [db]\n\
                        host = localhost\n\
                        port = 5432\n\
                        opts[] = a\n\
                        opts[] = b\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_encode_without_sections() {
        let options = FormatOptions {
            ini_sections: false,
            ..FormatOptions::default()
        };
        let data = json!({ "db": { "host": "h" } });
        assert_eq!(encode(data.as_object().unwrap(), &options), "db[host] = h\n");
    }

    #[test]
    fn test_decode_sections_and_arrays() {
        let input = r#"
            ; comment
            name = Joe
            list[] = 1
            list[] = 2

            [server]
            # another comment
            host = "my host" ; trailing
            port = 8080
            flags[debug] = on
        "#;
        let map = decode(input, &FormatOptions::default()).unwrap();

        assert_eq!(map["name"], json!("Joe"));
        assert_eq!(map["list"], json!(["1", "2"]));
        assert_eq!(map["server"]["host"], json!("my host"));
        assert_eq!(map["server"]["port"], json!("8080"));
        assert_eq!(map["server"]["flags"], json!({ "debug": "on" }));
    }

    #[test]
    fn test_decode_typed() {
        let input = "a = 1\nb = 2.5\nc = yes\nd = null\ne = \"42\"\nf = text ; note\n";
        let map = decode(input, &typed_opts()).unwrap();

        assert_eq!(map["a"], json!(1));
        assert_eq!(map["b"], json!(2.5));
        assert_eq!(map["c"], json!(true));
        assert_eq!(map["d"], Value::Null);
        assert_eq!(map["e"], json!("42"));
        assert_eq!(map["f"], json!("text"));
    }

    #[test]
    fn test_typed_round_trip_keeps_types() {
        let data = json!({
            "n": 3,
            "s": "3",
            "b": false,
            "z": null,
            "e": "",
            "q": "say \"hi\""
        });
        let map = data.as_object().unwrap();
        let out = encode(map, &typed_opts());
        assert!(out.contains("z = \n"));
        assert!(out.contains("e = \"\"\n"));
        assert_eq!(&decode(&out, &typed_opts()).unwrap(), map);
    }

    #[test]
    fn test_encode_null_as_empty() {
        let data = json!({ "z": null, "list": [null, "x"] });
        let out = encode(data.as_object().unwrap(), &FormatOptions::default());
        assert_eq!(out, "z = \nlist[] = \nlist[] = x\n");

        let map = decode(&out, &typed_opts()).unwrap();
        assert_eq!(map["z"], Value::Null);
        assert_eq!(map["list"], json!([null, "x"]));
    }

    #[test]
    fn test_flattened_sections() {
        let options = FormatOptions {
            ini_sections: false,
            ..FormatOptions::default()
        };
        let map = decode("[one]\na = 1\n[two]\nb = 2\n", &options).unwrap();
        assert_eq!(map, *json!({ "a": "1", "b": "2" }).as_object().unwrap());
    }

    #[test]
    fn test_decode_errors() {
        let opts = FormatOptions::default();
        assert!(matches!(decode("[open\n", &opts), Err(FormatError::Ini { line: 1, .. })));
        assert!(matches!(decode("a = 1\njunk\n", &opts), Err(FormatError::Ini { line: 2, .. })));
        assert!(decode("a = \"open\n", &opts).is_err());
        assert!(decode("a = 1\na[] = 2\n", &opts).is_err());
    }
}
