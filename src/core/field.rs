//! Field descriptors for block schemas
//!
//! A field descriptor declares one named, typed slot of an input or output
//! schema, together with its default and the hints a host uses to render it.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::value::kind_of;

/// Field definition
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Field name, also the key in raw input maps and the output event name
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Default used when the field is absent
    #[serde(skip_serializing_if = "FieldDefault::is_required")]
    pub default: FieldDefault,
    /// Field description
    pub description: String,
    /// Hidden behind an "advanced" toggle in hosts that render forms
    pub advanced: bool,
    /// Example value shown in an empty input
    pub placeholder: Option<String>,
    /// Display title overriding the field name
    pub title: Option<String>,
}

impl FieldDescriptor {
    /// Create a required field with no default
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: FieldDefault::Required,
            description: String::new(),
            advanced: false,
            placeholder: None,
            title: None,
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Use a scalar literal as default
    pub fn default_value(mut self, value: impl Into<JsonValue>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Use a factory as default; required for list and dictionary defaults
    pub fn default_factory(mut self, factory: fn() -> JsonValue) -> Self {
        self.default = FieldDefault::Factory(factory);
        self
    }

    /// Mark as advanced
    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    /// Set the placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the display title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether the field has to be supplied by the caller
    pub fn is_required(&self) -> bool {
        self.default.is_required()
    }
}

/// Default for an absent field
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// No default, the field must be supplied
    Required,
    /// Scalar literal, cloned on use
    Value(JsonValue),
    /// Zero-argument factory invoked on every validation
    Factory(fn() -> JsonValue),
}

impl FieldDefault {
    /// Check if this is the required marker
    pub fn is_required(&self) -> bool {
        matches!(self, FieldDefault::Required)
    }

    /// Produce a fresh default value, `None` for required fields
    pub fn produce(&self) -> Option<JsonValue> {
        match self {
            FieldDefault::Required => None,
            FieldDefault::Value(value) => Some(value.clone()),
            FieldDefault::Factory(factory) => Some(factory()),
        }
    }

    /// A literal list or dictionary default would be shared across
    /// validations, which schemas forbid.
    pub fn is_container_literal(&self) -> bool {
        matches!(
            self,
            FieldDefault::Value(JsonValue::Array(_)) | FieldDefault::Value(JsonValue::Object(_))
        )
    }
}

impl Serialize for FieldDefault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.produce().serialize(serializer)
    }
}

/// Factory for an empty list default
pub fn empty_list() -> JsonValue {
    JsonValue::Array(Vec::new())
}

/// Factory for an empty dictionary default
pub fn empty_dictionary() -> JsonValue {
    JsonValue::Object(JsonMap::new())
}

/// Declared field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// Any JSON value, null included
    Any,
    /// Text
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Number,
    /// Boolean flag
    Boolean,
    /// Ordered sequence
    List,
    /// String-keyed mapping
    Dictionary,
    /// Text or whole number (lookup keys)
    StringOrInteger,
    /// Reference to a file: URL, data URI or local path
    MediaFile,
    /// One of a fixed set of strings
    Enum { options: Vec<String> },
    /// Null or the inner type
    Optional { inner: Box<FieldType> },
}

impl FieldType {
    /// Enumeration over the given options
    pub fn one_of(options: &[&str]) -> Self {
        FieldType::Enum {
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// Null or `inner`
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional {
            inner: Box::new(inner),
        }
    }

    /// Whether null is a conformant value
    pub fn accepts_null(&self) -> bool {
        matches!(self, FieldType::Any | FieldType::Optional { .. })
    }

    /// Short type name used in error messages
    pub fn describe(&self) -> String {
        match self {
            FieldType::Any => "any".into(),
            FieldType::String => "string".into(),
            FieldType::Integer => "integer".into(),
            FieldType::Number => "number".into(),
            FieldType::Boolean => "boolean".into(),
            FieldType::List => "list".into(),
            FieldType::Dictionary => "dictionary".into(),
            FieldType::StringOrInteger => "string or integer".into(),
            FieldType::MediaFile => "media file reference".into(),
            FieldType::Enum { options } => format!("one of [{}]", options.join(", ")),
            FieldType::Optional { inner } => format!("optional {}", inner.describe()),
        }
    }

    /// Coerce a raw value to this type
    ///
    /// Returns the normalized value, or the raw value's kind when it cannot
    /// be coerced.
    pub fn coerce(&self, value: JsonValue) -> Result<JsonValue, &'static str> {
        let found = kind_of(&value);
        match (self, value) {
            (FieldType::Any, v) => Ok(v),
            (FieldType::Optional { .. }, JsonValue::Null) => Ok(JsonValue::Null),
            (FieldType::Optional { inner }, v) => inner.coerce(v),

            (FieldType::String | FieldType::MediaFile, v @ JsonValue::String(_)) => Ok(v),

            (FieldType::Integer, v @ JsonValue::Number(_)) => integral(&v).ok_or(found),
            (FieldType::Integer, JsonValue::String(s)) => {
                s.trim().parse::<i64>().map(JsonValue::from).map_err(|_| found)
            }

            (FieldType::Number, v @ JsonValue::Number(_)) => Ok(v),
            (FieldType::Number, JsonValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .ok_or(found),

            (FieldType::Boolean, v @ JsonValue::Bool(_)) => Ok(v),
            (FieldType::Boolean, JsonValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(JsonValue::Bool(true)),
                "false" => Ok(JsonValue::Bool(false)),
                _ => Err(found),
            },

            (FieldType::List, v @ JsonValue::Array(_)) => Ok(v),
            (FieldType::Dictionary, v @ JsonValue::Object(_)) => Ok(v),

            (FieldType::StringOrInteger, v @ JsonValue::String(_)) => Ok(v),
            (FieldType::StringOrInteger, v @ JsonValue::Number(_)) => integral(&v).ok_or(found),

            (FieldType::Enum { options }, JsonValue::String(s)) if options.contains(&s) => {
                Ok(JsonValue::String(s))
            }

            _ => Err(found),
        }
    }
}

/// Integer form of a number with no fractional part
fn integral(value: &JsonValue) -> Option<JsonValue> {
    if let Some(i) = value.as_i64() {
        return Some(JsonValue::from(i));
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(JsonValue::from(f as i64))
    } else {
        None
    }
}
