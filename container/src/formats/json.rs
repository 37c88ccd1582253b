//! JSON codec. `array` shares it: the key/value map *is* the array form.

use serde_json::{Map, Value};

use crate::error::{FormatError, FormatResult};
use crate::value::type_name;

/// Decode a JSON object.
pub fn decode(input: &str) -> FormatResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(input)? {
        Value::Object(map) => Ok(map),
        other => Err(FormatError::NotAnObject(type_name(&other).to_string())),
    }
}

pub fn encode(data: &Map<String, Value>, pretty: bool) -> FormatResult<String> {
    let out = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(out)
}
