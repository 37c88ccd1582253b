//! CSV codec.
//!
//! One row per key: the first field is the key, the remaining fields hold
//! the value.
//!
//! ```text
//! name,Joe
//! tags,a,b,c
//! meta,"{""k"":1}"
//! ```
//!
//! Arrays spread over several fields; nested objects and nested arrays are
//! stored as JSON text. Decoding yields strings: a row with one value field
//! is a string, a row with several is an array of strings.

use ::csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde_json::{Map, Value};

use super::FormatOptions;
use crate::error::{FormatError, FormatResult};
use crate::value::as_string;

fn delimiter(options: &FormatOptions) -> FormatResult<u8> {
    u8::try_from(options.csv_delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            FormatError::csv(
                0,
                format!("delimiter '{}' is not an ASCII character", options.csv_delimiter),
            )
        })
}

fn field(value: &Value) -> String {
    as_string(value).unwrap_or_else(|| value.to_string())
}

pub fn encode(data: &Map<String, Value>, options: &FormatOptions) -> FormatResult<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter(options)?)
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for (key, value) in data {
        let mut record = vec![key.clone()];
        match value {
            Value::Array(items) if !items.is_empty() => record.extend(items.iter().map(field)),
            other => record.push(field(other)),
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FormatError::csv(0, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FormatError::csv(0, e.to_string()))
}

pub fn decode(input: &str, options: &FormatOptions) -> FormatResult<Map<String, Value>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter(options)?)
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut map = Map::new();
    for result in reader.records() {
        let record = result?;
        let mut fields = record.iter();
        let Some(key) = fields.next() else {
            continue;
        };
        if key.is_empty() && record.len() == 1 {
            continue;
        }

        let values: Vec<Value> = fields.map(|f| Value::String(f.to_string())).collect();
        let value = match values.len() {
            0 => Value::String(String::new()),
            1 => values.into_iter().next().unwrap_or(Value::Null),
            _ => Value::Array(values),
        };
        map.insert(key.to_string(), value);
    }

    Ok(map)
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_rows() {
        let data = json!({
            "name": "Joe, Jr.",
            "tags": ["a", "b"],
            "age": 30,
            "meta": { "k": 1 }
        });
        let out = encode(data.as_object().unwrap(), &FormatOptions::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], r#"name,"Joe, Jr.""#);
        assert_eq!(lines[1], "tags,a,b");
        assert_eq!(lines[2], "age,30");
        assert_eq!(lines[3], r#"meta,"{""k"":1}""#);
    }

    #[test]
    fn test_decode_rows() {
        let input = "name;Joe\ntags;a;b;c\nempty\n\n\"quoted;key\";x\n";
        let options = FormatOptions {
            csv_delimiter: ';',
            ..FormatOptions::default()
        };
        let map = decode(input, &options).unwrap();

        assert_eq!(map["name"], json!("Joe"));
        assert_eq!(map["tags"], json!(["a", "b", "c"]));
        assert_eq!(map["empty"], json!(""));
        assert_eq!(map["quoted;key"], json!("x"));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_non_ascii_delimiter() {
        let options = FormatOptions {
            csv_delimiter: '§',
            ..FormatOptions::default()
        };
        assert!(decode("a§b", &options).is_err());
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }
}
