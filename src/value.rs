//! # Typed Values
//!
//! A [`TypedValue`] is one named scalar taken from a configuration map. It keeps the raw text it
//! was read from together with a primitive [`ValueType`] and knows how the configuration grammar
//! wants that type quoted.
//!
//! | Type      | Rendering                                          | Metadata mode       |
//! |-----------|----------------------------------------------------|---------------------|
//! | `Int`     | digits, unquoted                                   | unchanged           |
//! | `Decimal` | dot-separated, unquoted                            | wrapped in quotes   |
//! | `Bool`    | `true`/`false`, unquoted                           | wrapped in quotes   |
//! | `String`  | `\` and `"` escaped, always quoted                 | unchanged           |
//! | `Other`   | raw text passed through                            | unchanged           |
//!
//! ```rust
//! use jsondb_export::{TypedValue, ValueType};
//!
//! let port = TypedValue::infer("port", "1883");
//! assert_eq!(port.value_type(), ValueType::Int);
//! assert_eq!(port.render(), "1883");
//!
//! let offset = TypedValue::new(ValueType::Decimal, "offset", "2,5", true).unwrap();
//! assert_eq!(offset.render(), "\"2.5\"");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use crate::ExportError;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("integer pattern compiles"));
static SIGNED_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("signed integer pattern compiles"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+([,.]\d+)?$").expect("decimal pattern compiles"));

///////////////////////////////////////////// ValueType ////////////////////////////////////////////

/// The primitive type of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Whole number.
    Int,
    /// Decimal number; either `,` or `.` is accepted as separator.
    Decimal,
    /// `true` or `false`.
    Bool,
    /// Free text.
    String,
    /// Anything else; the raw text is emitted verbatim.
    Other,
}

impl ValueType {
    /// Infers the type of `raw`: boolean literal, then integer, then decimal, else string.
    pub fn infer(raw: &str) -> Self {
        if raw == "true" || raw == "false" {
            ValueType::Bool
        } else if INTEGER.is_match(raw) {
            ValueType::Int
        } else if DECIMAL.is_match(raw) {
            ValueType::Decimal
        } else {
            ValueType::String
        }
    }

    /// Maps a declared type word (`int`, `decimal`, `System.Boolean`, ...) to a value type.
    ///
    /// Unrecognized words map to [`ValueType::Other`]. Readers whose source carries
    /// type-annotated definitions reach this through [`crate::RawProperty::parse_definition`].
    pub fn from_type_name(word: &str) -> Self {
        let word = word.trim().to_ascii_lowercase();
        let word = word.strip_prefix("system.").unwrap_or(&word);
        match word {
            "int" | "long" | "int16" | "int32" | "int64" | "short" | "byte" | "integer" => {
                ValueType::Int
            }
            "decimal" | "double" | "float" | "single" | "number" => ValueType::Decimal,
            "bool" | "boolean" => ValueType::Bool,
            "string" => ValueType::String,
            _ => ValueType::Other,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ValueType::Int => "integer",
            ValueType::Decimal => "decimal",
            ValueType::Bool => "boolean",
            ValueType::String => "string",
            ValueType::Other => "raw",
        }
    }
}

//////////////////////////////////////////// TypedValue ////////////////////////////////////////////

/// One named configuration value with its primitive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    value_type: ValueType,
    name: String,
    raw: String,
    /// Quote decimals and booleans, as link and metadata configurations require.
    pub metadata_mode: bool,
}

impl TypedValue {
    /// Creates a value with an explicit type.
    ///
    /// Numeric and boolean types are checked here so a malformed literal never reaches the
    /// output.
    pub fn new(
        value_type: ValueType,
        name: impl Into<String>,
        raw: impl Into<String>,
        metadata_mode: bool,
    ) -> Result<Self, ExportError> {
        let name = name.into();
        let raw = raw.into();
        let valid = match value_type {
            ValueType::Int => SIGNED_INTEGER.is_match(&raw),
            ValueType::Decimal => DECIMAL.is_match(&raw),
            ValueType::Bool => {
                let lower = raw.to_ascii_lowercase();
                if lower != "true" && lower != "false" {
                    return Err(ExportError::InvalidBoolean { name, raw });
                }
                true
            }
            ValueType::String | ValueType::Other => true,
        };
        if !valid {
            return Err(ExportError::InvalidNumber {
                name,
                raw,
                value_type: value_type.label(),
            });
        }
        Ok(Self {
            value_type,
            name,
            raw,
            metadata_mode,
        })
    }

    /// Creates a value whose type is inferred from `raw`.
    pub fn infer(name: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            value_type: ValueType::infer(&raw),
            name: name.into(),
            raw,
            metadata_mode: false,
        }
    }

    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw text the value was built from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The primitive type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Renders the value alone, quoted per its type.
    pub fn render(&self) -> String {
        match self.value_type {
            ValueType::Int => self.raw.clone(),
            ValueType::Decimal => {
                let normalized = self.raw.replace(',', ".");
                if self.metadata_mode {
                    format!("\"{}\"", normalized)
                } else {
                    normalized
                }
            }
            ValueType::Bool => {
                let lower = self.raw.to_ascii_lowercase();
                if self.metadata_mode {
                    format!("\"{}\"", lower)
                } else {
                    lower
                }
            }
            ValueType::String => quote(&self.raw),
            ValueType::Other => self.raw.clone(),
        }
    }

    /// Renders `name=value`.
    pub fn render_assignment(&self) -> String {
        format!("{}={}", self.name, self.render())
    }
}

/// Escapes `\` and `"` and wraps the result in double quotes.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_order() {
        assert_eq!(ValueType::infer("true"), ValueType::Bool);
        assert_eq!(ValueType::infer("false"), ValueType::Bool);
        assert_eq!(ValueType::infer("True"), ValueType::String);
        assert_eq!(ValueType::infer("42"), ValueType::Int);
        assert_eq!(ValueType::infer("-42"), ValueType::Decimal);
        assert_eq!(ValueType::infer("4,2"), ValueType::Decimal);
        assert_eq!(ValueType::infer("4.2"), ValueType::Decimal);
        assert_eq!(ValueType::infer("4.2.1"), ValueType::String);
        assert_eq!(ValueType::infer(""), ValueType::String);
    }

    #[test]
    fn type_names() {
        assert_eq!(ValueType::from_type_name("int"), ValueType::Int);
        assert_eq!(ValueType::from_type_name("long"), ValueType::Int);
        assert_eq!(ValueType::from_type_name("System.Decimal"), ValueType::Decimal);
        assert_eq!(ValueType::from_type_name("double"), ValueType::Decimal);
        assert_eq!(ValueType::from_type_name("bool"), ValueType::Bool);
        assert_eq!(ValueType::from_type_name("string"), ValueType::String);
        assert_eq!(ValueType::from_type_name("Object[]"), ValueType::Other);
    }

    #[test]
    fn decimal_normalizes_separator() {
        let comma = TypedValue::new(ValueType::Decimal, "x", "12,5", false).unwrap();
        let dot = TypedValue::new(ValueType::Decimal, "x", "12.5", false).unwrap();
        assert_eq!(comma.render(), "12.5");
        assert_eq!(dot.render(), "12.5");
    }

    #[test]
    fn metadata_mode_quotes_decimal_and_bool_only() {
        let dec = TypedValue::new(ValueType::Decimal, "x", "0.5", true).unwrap();
        let boolean = TypedValue::new(ValueType::Bool, "x", "True", true).unwrap();
        let int = TypedValue::new(ValueType::Int, "x", "5", true).unwrap();
        let text = TypedValue::new(ValueType::String, "x", "five", true).unwrap();
        assert_eq!(dec.render(), "\"0.5\"");
        assert_eq!(boolean.render(), "\"true\"");
        assert_eq!(int.render(), "5");
        assert_eq!(text.render(), "\"five\"");
    }

    #[test]
    fn bool_lowercases() {
        let value = TypedValue::new(ValueType::Bool, "enabled", "FALSE", false).unwrap();
        assert_eq!(value.render(), "false");
    }

    #[test]
    fn string_escapes() {
        let value = TypedValue::new(ValueType::String, "path", r#"C:\dir "x""#, false).unwrap();
        assert_eq!(value.render(), r#""C:\\dir \"x\"""#);
    }

    #[test]
    fn other_passes_through() {
        let value = TypedValue::new(ValueType::Other, "list", "\"a\", \"b\"", true).unwrap();
        assert_eq!(value.render(), "\"a\", \"b\"");
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(matches!(
            TypedValue::new(ValueType::Decimal, "x", "abc", false),
            Err(ExportError::InvalidNumber { .. })
        ));
        assert!(matches!(
            TypedValue::new(ValueType::Int, "x", "1.5", false),
            Err(ExportError::InvalidNumber { .. })
        ));
        assert!(matches!(
            TypedValue::new(ValueType::Bool, "x", "yes", false),
            Err(ExportError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn assignment() {
        let value = TypedValue::infer("host", "192.168.1.2");
        assert_eq!(value.render_assignment(), "host=\"192.168.1.2\"");
    }
}
