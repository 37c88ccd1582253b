//! PHP `serialize()` codec.
//!
//! | PHP | encoded |
//! |-----|---------|
//! | null | `N;` |
//! | bool | `b:1;` |
//! | int | `i:42;` |
//! | float | `d:1.5;` |
//! | string | `s:3:"abc";` (length in bytes) |
//! | array | `a:2:{i:0;s:1:"a";s:1:"k";i:1;}` |
//! | object | `O:8:"stdClass":1:{s:1:"k";i:1;}` (decode only) |
//!
//! Arrays whose keys are exactly `0..n` decode to JSON arrays, any other
//! array decodes to an object. The top-level payload always becomes a map.

use serde_json::{Map, Number, Value};

use crate::error::{FormatError, FormatResult};

// =============================================================================
// Encoding
// =============================================================================

pub fn encode(data: &Map<String, Value>) -> String {
    let mut out = String::new();
    write_map(&mut out, data);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("N;"),
        Value::Bool(b) => out.push_str(if *b { "b:1;" } else { "b:0;" }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push_str(&format!("i:{};", i));
            } else if let Some(u) = n.as_u64() {
                out.push_str(&format!("i:{};", u));
            } else {
                let f = n.as_f64().unwrap_or_default();
                out.push_str(&format!("d:{};", f));
            }
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push_str(&format!("a:{}:{{", items.len()));
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!("i:{};", i));
                write_value(out, item);
            }
            out.push('}');
        }
        Value::Object(map) => write_map(out, map),
    }
}

fn write_map(out: &mut String, map: &Map<String, Value>) {
    out.push_str(&format!("a:{}:{{", map.len()));
    for (k, v) in map {
        match integer_key(k) {
            Some(i) => out.push_str(&format!("i:{};", i)),
            None => write_string(out, k),
        }
        write_value(out, v);
    }
    out.push('}');
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&format!("s:{}:\"{}\";", s.len(), s));
}

/// Keys PHP stores as integers: canonical decimal forms only ("7", "-3", not "07").
fn integer_key(key: &str) -> Option<i64> {
    let n: i64 = key.parse().ok()?;
    (n.to_string() == key).then_some(n)
}

// =============================================================================
// Decoding
// =============================================================================

enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    fn into_string(self) -> String {
        match self {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => s,
        }
    }
}

/// Maximum array/object nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError::serialized(self.pos, message)
    }

    fn next(&mut self) -> FormatResult<u8> {
        let b = *self
            .input
            .get(self.pos)
            .ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> FormatResult<()> {
        let at = self.pos;
        let b = self.next()?;
        if b == expected {
            Ok(())
        } else {
            Err(FormatError::serialized(
                at,
                format!("expected '{}', found '{}'", expected as char, b as char),
            ))
        }
    }

    /// Read up to (and consume) `end`.
    fn until(&mut self, end: u8) -> FormatResult<&'a str> {
        let start = self.pos;
        let len = self.input[start..]
            .iter()
            .position(|&b| b == end)
            .ok_or_else(|| self.error(format!("missing '{}'", end as char)))?;
        self.pos = start + len + 1;
        std::str::from_utf8(&self.input[start..start + len])
            .map_err(|_| FormatError::serialized(start, "invalid UTF-8"))
    }

    fn number<T: std::str::FromStr>(&mut self, end: u8) -> FormatResult<T> {
        let start = self.pos;
        let raw = self.until(end)?;
        raw.trim()
            .parse()
            .map_err(|_| FormatError::serialized(start, format!("invalid number '{}'", raw)))
    }

    fn string_body(&mut self) -> FormatResult<String> {
        let len: usize = self.number(b':')?;
        self.expect(b'"')?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .ok_or_else(|| self.error("string length exceeds input"))?;
        let bytes = self
            .input
            .get(start..end)
            .ok_or_else(|| self.error("string length exceeds input"))?;
        let s = std::str::from_utf8(bytes)
            .map_err(|_| FormatError::serialized(start, "invalid UTF-8 in string"))?
            .to_string();
        self.pos = end;
        self.expect(b'"')?;
        Ok(s)
    }

    fn value(&mut self) -> FormatResult<Value> {
        let at = self.pos;
        match self.next()? {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                let n: u8 = self.number(b';')?;
                Ok(Value::Bool(n != 0))
            }
            b'i' => {
                self.expect(b':')?;
                let n: i64 = self.number(b';')?;
                Ok(Value::from(n))
            }
            b'd' => {
                self.expect(b':')?;
                let f: f64 = self.number(b';')?;
                Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
            }
            b's' => {
                self.expect(b':')?;
                let s = self.string_body()?;
                self.expect(b';')?;
                Ok(Value::String(s))
            }
            b'a' => {
                self.expect(b':')?;
                let entries = self.entries()?;
                Ok(collapse(entries))
            }
            b'O' => {
                self.expect(b':')?;
                // class name is dropped, properties become an object
                self.string_body()?;
                self.expect(b':')?;
                let entries = self.entries()?;
                Ok(Value::Object(
                    entries.into_iter().map(|(k, v)| (k.into_string(), v)).collect(),
                ))
            }
            other => Err(FormatError::serialized(
                at,
                format!("unknown type tag '{}'", other as char),
            )),
        }
    }

    /// `<n>:{key value ...}`
    fn entries(&mut self) -> FormatResult<Vec<(Key, Value)>> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let entries = self.entries_body();
        self.depth -= 1;
        entries
    }

    fn entries_body(&mut self) -> FormatResult<Vec<(Key, Value)>> {
        let count: usize = self.number(b':')?;
        self.expect(b'{')?;
        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let at = self.pos;
            let key = match self.value()? {
                Value::Number(n) if n.is_i64() => Key::Int(n.as_i64().unwrap_or_default()),
                Value::String(s) => Key::Str(s),
                _ => return Err(FormatError::serialized(at, "array key must be int or string")),
            };
            let value = self.value()?;
            entries.push((key, value));
        }
        self.expect(b'}')?;
        Ok(entries)
    }
}

/// Sequential `0..n` integer keys make a list.
fn collapse(entries: Vec<(Key, Value)>) -> Value {
    let is_list = entries
        .iter()
        .enumerate()
        .all(|(i, (k, _))| matches!(k, Key::Int(n) if *n == i as i64));

    if is_list {
        Value::Array(entries.into_iter().map(|(_, v)| v).collect())
    } else {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into_string(), v))
                .collect(),
        )
    }
}

/// Decode a serialized array into a map; list keys become `"0"`, `"1"`, ...
pub fn decode(input: &str) -> FormatResult<Map<String, Value>> {
    let mut parser = Parser::new(input.trim());
    let at = parser.pos;

    let map = match parser.next()? {
        b'a' => {
            parser.expect(b':')?;
            parser
                .entries()?
                .into_iter()
                .map(|(k, v)| (k.into_string(), v))
                .collect()
        }
        b'O' => {
            parser.pos = at;
            match parser.value()? {
                Value::Object(map) => map,
                _ => Map::new(),
            }
        }
        other => {
            return Err(FormatError::NotAnObject(format!(
                "serialized value of type '{}'",
                other as char
            )))
        }
    };

    if parser.pos != parser.input.len() {
        return Err(parser.error("trailing data"));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_scalars() {
        let data = json!({
            "n": null,
            "t": true,
            "i": -4,
            "f": 1.5,
            "s": "héllo"
        });
        let out = encode(data.as_object().unwrap());
        assert_eq!(
            out,
            r#"a:5:{s:1:"n";N;s:1:"t";b:1;s:1:"i";i:-4;s:1:"f";d:1.5;s:1:"s";s:6:"héllo";}"#
        );
    }

    #[test]
    fn test_encode_integer_keys_and_lists() {
        let data = json!({ "7": ["a", "b"], "07": 1 });
        let out = encode(data.as_object().unwrap());
        assert_eq!(
            out,
            r#"a:2:{i:7;a:2:{i:0;s:1:"a";i:1;s:1:"b";}s:2:"07";i:1;}"#
        );
    }

    #[test]
    fn test_decode_php_output() {
        let input = r#"a:3:{s:4:"name";s:3:"Joe";s:4:"tags";a:2:{i:0;s:1:"x";i:1;s:1:"y";}s:4:"meta";a:2:{i:3;b:0;s:1:"k";d:0.25;}}"#;
        let map = decode(input).unwrap();

        assert_eq!(map["name"], json!("Joe"));
        assert_eq!(map["tags"], json!(["x", "y"]));
        assert_eq!(map["meta"], json!({ "3": false, "k": 0.25 }));
    }

    #[test]
    fn test_decode_top_level_list() {
        let map = decode(r#"a:2:{i:0;s:1:"a";i:1;N;}"#).unwrap();
        assert_eq!(map["0"], json!("a"));
        assert_eq!(map["1"], Value::Null);
    }

    #[test]
    fn test_decode_object() {
        let map = decode(r#"O:8:"stdClass":1:{s:1:"a";i:1;}"#).unwrap();
        assert_eq!(map["a"], json!(1));
    }

    #[test]
    fn test_decode_multibyte_length() {
        let map = decode(r#"a:1:{s:1:"k";s:6:"héllo";}"#).unwrap();
        assert_eq!(map["k"], json!("héllo"));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode("i:5;"), Err(FormatError::NotAnObject(_))));
        assert!(decode(r#"a:1:{s:1:"k";s:9:"short";}"#).is_err());
        assert!(decode(r#"a:1:{s:1:"k";i:1;"#).is_err());
        assert!(decode(r#"a:0:{}extra"#).is_err());

        let err = decode(r#"a:1:{s:1:"k";x:1;}"#).unwrap_err();
        assert!(err.to_string().contains("unknown type tag 'x'"));
    }

    #[test]
    fn test_decode_huge_string_length() {
        let err = decode(r#"a:1:{s:1:"k";s:18446744073709551615:"x";}"#).unwrap_err();
        assert!(matches!(err, FormatError::Serialized { .. }));
    }

    #[test]
    fn test_decode_nesting_limit() {
        let nested = |levels: usize| {
            format!("{}N;{}", "a:1:{i:0;".repeat(levels), "}".repeat(levels))
        };

        let map = decode(&nested(MAX_DEPTH)).unwrap();
        assert!(map["0"].is_array());

        let err = decode(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(err.to_string().contains("nesting deeper than 128 levels"));

        // far past the limit: an error, not a stack overflow
        assert!(decode(&nested(200_000)).is_err());
    }
}
