//! Value conversion collaborator
//!
//! The universal type converter block delegates the actual coercion to a
//! [`Converter`]. [`DefaultConverter`] implements the following rules:
//!
//! | from \ to  | string        | number          | boolean        | list              | dictionary          |
//! |------------|---------------|-----------------|----------------|-------------------|---------------------|
//! | null       | `""`          | error           | `false`        | `[]`              | `{}`                |
//! | boolean    | `"true"`      | `1.0` / `0.0`   | itself         | `[v]`             | error               |
//! | number     | decimal text  | as float        | non-zero       | `[v]`             | error               |
//! | string     | itself        | parsed float    | keyword/truthy | JSON array or `[v]` | JSON object or error |
//! | list       | JSON text     | error           | non-empty      | itself            | index-keyed         |
//! | dictionary | JSON text     | error           | non-empty      | values in order   | itself              |
//!
//! String to boolean recognizes `true/yes/y/on/1` and `false/no/n/off/0`
//! (any case, surrounding whitespace ignored); any other string follows
//! truthiness.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use std::fmt;

use super::value::{is_truthy, kind_of};

/// Target types of the universal converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOption {
    String,
    Number,
    Boolean,
    List,
    Dictionary,
}

impl TypeOption {
    /// All options, in the order hosts present them
    pub const ALL: [TypeOption; 5] = [
        TypeOption::String,
        TypeOption::Number,
        TypeOption::Boolean,
        TypeOption::List,
        TypeOption::Dictionary,
    ];

    /// Wire name of the option
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeOption::String => "string",
            TypeOption::Number => "number",
            TypeOption::Boolean => "boolean",
            TypeOption::List => "list",
            TypeOption::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for TypeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// No rule converts this kind of value to the target
    #[error("cannot convert {from} to {to}")]
    Unsupported { from: &'static str, to: TypeOption },

    /// Text did not parse as the target
    #[error("cannot parse {input:?} as {to}")]
    Unparseable { input: String, to: TypeOption },

    /// Result would be NaN or infinite
    #[error("{input:?} is not a finite number")]
    NonFinite { input: String },
}

/// Coerces a value to one of the universal types
pub trait Converter: Send + Sync {
    /// Convert `value` to `target`
    fn convert(&self, value: &JsonValue, target: TypeOption) -> Result<JsonValue, ConversionError>;
}

/// Converter implementing the rules in the module documentation
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn convert(&self, value: &JsonValue, target: TypeOption) -> Result<JsonValue, ConversionError> {
        match target {
            TypeOption::String => Ok(JsonValue::String(to_text(value))),
            TypeOption::Number => to_number(value),
            TypeOption::Boolean => Ok(JsonValue::Bool(to_boolean(value))),
            TypeOption::List => Ok(to_list(value)),
            TypeOption::Dictionary => to_dictionary(value),
        }
    }
}

fn to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

fn to_number(value: &JsonValue) -> Result<JsonValue, ConversionError> {
    let unsupported = || ConversionError::Unsupported {
        from: kind_of(value),
        to: TypeOption::Number,
    };
    let float = match value {
        JsonValue::Number(n) => n.as_f64().ok_or_else(unsupported)?,
        JsonValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        JsonValue::String(s) => s.trim().parse::<f64>().map_err(|_| ConversionError::Unparseable {
            input: s.clone(),
            to: TypeOption::Number,
        })?,
        _ => return Err(unsupported()),
    };
    Number::from_f64(float)
        .map(JsonValue::Number)
        .ok_or_else(|| ConversionError::NonFinite {
            input: to_text(value),
        })
}

fn to_boolean(value: &JsonValue) -> bool {
    if let JsonValue::String(s) = value {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => return true,
            "false" | "no" | "n" | "off" | "0" => return false,
            _ => {}
        }
    }
    is_truthy(value)
}

fn to_list(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => JsonValue::Array(Vec::new()),
        JsonValue::Array(_) => value.clone(),
        JsonValue::Object(map) => JsonValue::Array(map.values().cloned().collect()),
        JsonValue::String(s) => match serde_json::from_str::<JsonValue>(s) {
            Ok(parsed @ JsonValue::Array(_)) => parsed,
            _ => JsonValue::Array(vec![value.clone()]),
        },
        _ => JsonValue::Array(vec![value.clone()]),
    }
}

fn to_dictionary(value: &JsonValue) -> Result<JsonValue, ConversionError> {
    match value {
        JsonValue::Null => Ok(JsonValue::Object(JsonMap::new())),
        JsonValue::Object(_) => Ok(value.clone()),
        JsonValue::Array(items) => Ok(JsonValue::Object(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item.clone()))
                .collect(),
        )),
        JsonValue::String(s) => match serde_json::from_str::<JsonValue>(s) {
            Ok(parsed @ JsonValue::Object(_)) => Ok(parsed),
            _ => Err(ConversionError::Unparseable {
                input: s.clone(),
                to: TypeOption::Dictionary,
            }),
        },
        _ => Err(ConversionError::Unsupported {
            from: kind_of(value),
            to: TypeOption::Dictionary,
        }),
    }
}
