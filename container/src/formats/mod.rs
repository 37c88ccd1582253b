//! Format codecs.
//!
//! Every codec turns a payload string into a key/value [`Map`] and back.
//!
//! | format | decode | encode |
//! |--------|--------|--------|
//! | `array` / `json` | JSON object | JSON object |
//! | `xml` | elements, `@attributes`, `@value` | same |
//! | `simple_xml` | elements only | same, `@`-keys skipped |
//! | `serialized` | PHP `serialize()` array | same |
//! | `csv` | `key,value[,value...]` rows | same |
//! | `ini` | `[section]` / `key = value` | same |

pub mod csv;
pub mod ini;
pub mod json;
pub mod serialized;
pub mod source;
pub mod xml;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{FormatError, FormatResult};

pub use source::{decode_content, detect_encoding, read_file};

/// Supported payload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Array,
    Json,
    Xml,
    SimpleXml,
    Serialized,
    Csv,
    Ini,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Array,
        Format::Json,
        Format::Xml,
        Format::SimpleXml,
        Format::Serialized,
        Format::Csv,
        Format::Ini,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Array => "array",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::SimpleXml => "simple_xml",
            Format::Serialized => "serialized",
            Format::Csv => "csv",
            Format::Ini => "ini",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "array" => Ok(Format::Array),
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "simple_xml" | "simplexml" => Ok(Format::SimpleXml),
            "serialized" | "php" => Ok(Format::Serialized),
            "csv" => Ok(Format::Csv),
            "ini" => Ok(Format::Ini),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Codec settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Root element name for XML output.
    pub xml_root: String,
    /// Prefix for element names built from numeric keys (`0` → `integer_key_0`).
    pub integer_key_prefix: String,
    /// CSV field delimiter (ASCII).
    pub csv_delimiter: char,
    /// INI: map top-level objects to `[section]` blocks.
    pub ini_sections: bool,
    /// INI: decode numbers, booleans and null instead of keeping strings.
    pub ini_typed: bool,
    /// JSON: pretty-print output.
    pub json_pretty: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            xml_root: "root".to_string(),
            integer_key_prefix: "integer_key".to_string(),
            csv_delimiter: ',',
            ini_sections: true,
            ini_typed: false,
            json_pretty: false,
        }
    }
}

/// Decode a payload into a key/value map.
pub fn decode(format: Format, input: &str, options: &FormatOptions) -> FormatResult<Map<String, Value>> {
    match format {
        Format::Array | Format::Json => json::decode(input),
        Format::Xml => xml::decode(input, options, true),
        Format::SimpleXml => xml::decode(input, options, false),
        Format::Serialized => serialized::decode(input),
        Format::Csv => csv::decode(input, options),
        Format::Ini => ini::decode(input, options),
    }
}

/// Encode a key/value map.
pub fn encode(format: Format, data: &Map<String, Value>, options: &FormatOptions) -> FormatResult<String> {
    match format {
        Format::Array => json::encode(data, true),
        Format::Json => json::encode(data, options.json_pretty),
        Format::Xml => Ok(xml::encode(data, options, true)),
        Format::SimpleXml => Ok(xml::encode(data, options, false)),
        Format::Serialized => Ok(serialized::encode(data)),
        Format::Csv => csv::encode(data, options),
        Format::Ini => Ok(ini::encode(data, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("Simple-XML".parse::<Format>().unwrap(), Format::SimpleXml);
        assert_eq!("php".parse::<Format>().unwrap(), Format::Serialized);
        assert!("yaml".parse::<Format>().is_err());

        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let options: FormatOptions =
            serde_json::from_value(json!({ "csv_delimiter": ";" })).unwrap();
        assert_eq!(options.csv_delimiter, ';');
        assert_eq!(options.xml_root, "root");
        assert!(options.ini_sections);
    }
}
