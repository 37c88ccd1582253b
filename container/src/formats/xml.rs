//! XML and simple-XML codecs.
//!
//! Layout of an encoded container:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root><name>Joe</name><tags>a</tags><tags>b</tags><integer_key_0>zero</integer_key_0></root>
//! ```
//!
//! - nested objects become nested elements
//! - arrays become repeated elements named after their key
//! - numeric keys get the integer-key prefix, since element names cannot
//!   start with a digit
//! - `null` is an empty element (`<k/>`), the empty string is `<k></k>`
//!
//! The full codec additionally maps the special keys `@attributes` (object of
//! element attributes) and `@value` (text content beside attributes or
//! children). The simple codec skips them on output and ignores attributes
//! on input.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::FormatOptions;
use crate::error::{FormatError, FormatResult};
use crate::value::as_string;

pub const ATTRIBUTES_KEY: &str = "@attributes";
pub const VALUE_KEY: &str = "@value";

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a map under the configured root element.
pub fn encode(data: &Map<String, Value>, options: &FormatOptions, attributes: bool) -> String {
    let root = element_name(&options.xml_root, options);
    let mut out = String::from(DECLARATION);
    out.push('\n');
    write_element(&mut out, &root, &Value::Object(data.clone()), options, attributes);
    out.push('\n');
    out
}

fn write_element(
    out: &mut String,
    name: &str,
    value: &Value,
    options: &FormatOptions,
    attributes: bool,
) {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item, options, attributes);
            }
        }
        Value::Object(map) => {
            out.push('<');
            out.push_str(name);

            if attributes {
                if let Some(Value::Object(attrs)) = map.get(ATTRIBUTES_KEY) {
                    for (k, v) in attrs {
                        let text = as_string(v).unwrap_or_else(|| v.to_string());
                        out.push_str(&format!(" {}=\"{}\"", element_name(k, options), escape(text.as_str())));
                    }
                }
            }

            let text = if attributes {
                map.get(VALUE_KEY).and_then(as_string)
            } else {
                None
            };
            let children: Vec<(&String, &Value)> =
                map.iter().filter(|(k, _)| !k.starts_with('@')).collect();

            if children.is_empty() && text.is_none() {
                out.push_str("/>");
                return;
            }

            out.push('>');
            if let Some(text) = text {
                out.push_str(&escape(text.as_str()));
            }
            for (k, v) in children {
                write_element(out, &element_name(k, options), v, options, attributes);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Value::Null => {
            out.push_str(&format!("<{}/>", name));
        }
        scalar => {
            let text = as_string(scalar).unwrap_or_default();
            out.push_str(&format!("<{0}>{1}</{0}>", name, escape(text.as_str())));
        }
    }
}

/// Turn a key into a valid element name.
fn element_name(key: &str, options: &FormatOptions) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_badly = name
        .chars()
        .next()
        .is_none_or(|c| c.is_ascii_digit() || c == '-' || c == '.');
    if starts_badly {
        name = format!("{}_{}", options.integer_key_prefix, name);
    }
    name
}

/// Reverse of [`element_name`] for prefixed numeric keys.
fn key_name(element: &str, options: &FormatOptions) -> String {
    let prefix = format!("{}_", options.integer_key_prefix);
    match element.strip_prefix(&prefix) {
        Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) => {
            rest.to_string()
        }
        _ => element.to_string(),
    }
}

// =============================================================================
// Decoding
// =============================================================================

struct Frame {
    name: String,
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, attributes: bool) -> FormatResult<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Map::new();
        if attributes {
            for attr in start.attributes() {
                let attr = attr.map_err(|e| FormatError::Xml(e.to_string()))?;
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr.unescape_value()?.into_owned();
                attrs.insert(key, Value::String(value));
            }
        }
        Ok(Self {
            name,
            attrs,
            children: Map::new(),
            text: String::new(),
        })
    }

    /// Collapse the frame into a value. `empty_tag` marks `<k/>`.
    fn close(self, empty_tag: bool) -> Value {
        if self.children.is_empty() && self.attrs.is_empty() {
            if empty_tag {
                return Value::Null;
            }
            return Value::String(self.text);
        }

        let mut map = Map::new();
        if !self.attrs.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attrs));
        }
        if !self.text.is_empty() {
            map.insert(VALUE_KEY.to_string(), Value::String(self.text));
        }
        map.extend(self.children);
        Value::Object(map)
    }
}

/// Append a child, turning repeated names into arrays.
fn add_child(parent: &mut Map<String, Value>, key: String, value: Value) {
    match parent.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(key, value);
        }
    }
}

/// Decode an XML document; the root element's children become the map.
pub fn decode(input: &str, options: &FormatOptions, attributes: bool) -> FormatResult<Map<String, Value>> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(FormatError::Xml("content after root element".into()));
                }
                stack.push(Frame::open(&start, attributes)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(FormatError::Xml("content after root element".into()));
                }
                let frame = Frame::open(&start, attributes)?;
                let name = frame.name.clone();
                let value = frame.close(true);
                match stack.last_mut() {
                    Some(parent) => add_child(&mut parent.children, key_name(&name, options), value),
                    None => root = Some(value),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| FormatError::Xml("unexpected closing tag".into()))?;
                let name = frame.name.clone();
                let value = frame.close(false);
                match stack.last_mut() {
                    Some(parent) => add_child(&mut parent.children, key_name(&name, options), value),
                    None => root = Some(value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(FormatError::Xml("unclosed element".into()));
    }

    match root {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Null) => Ok(Map::new()),
        Some(Value::String(s)) if s.is_empty() => Ok(Map::new()),
        Some(_) => Err(FormatError::NotAnObject("text".into())),
        None => Err(FormatError::Xml("document has no root element".into())),
    }
}
