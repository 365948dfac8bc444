//! Block schemas
//!
//! A schema is an ordered, closed set of field descriptors. Input schemas
//! turn the raw value map handed over by the host into a validated input;
//! output schemas name the events a block may emit.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::block::BlockError;
use super::field::FieldDescriptor;

/// Ordered set of field descriptors
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct BlockSchema {
    fields: Vec<FieldDescriptor>,
}

impl BlockSchema {
    /// Create a schema from its fields, in declaration order
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if the schema declares `name`
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Validate a raw value map.
    ///
    /// Absent fields are filled from their default (factories run fresh on
    /// every call), present fields are coerced to their declared type, and
    /// keys outside the schema are dropped. All problems are reported
    /// together.
    pub fn validate(&self, raw: &JsonMap<String, JsonValue>) -> Result<ValidatedInput, ValidationError> {
        let mut values = JsonMap::new();
        let mut issues = Vec::new();

        for field in &self.fields {
            let supplied = match raw.get(&field.name) {
                Some(JsonValue::Null) if !field.field_type.accepts_null() => None,
                other => other.cloned(),
            };

            let value = match supplied.or_else(|| field.default.produce()) {
                Some(value) => value,
                None => {
                    issues.push(FieldIssue::Missing {
                        field: field.name.clone(),
                    });
                    continue;
                }
            };

            match field.field_type.coerce(value) {
                Ok(value) => {
                    values.insert(field.name.clone(), value);
                }
                Err(found) => issues.push(FieldIssue::TypeMismatch {
                    field: field.name.clone(),
                    expected: field.field_type.describe(),
                    found: found.to_string(),
                }),
            }
        }

        if issues.is_empty() {
            Ok(ValidatedInput(values))
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Check that a single value conforms to the declared type of `name`
    pub fn check_value(&self, name: &str, value: &JsonValue) -> Result<(), FieldIssue> {
        let field = self.field(name).ok_or_else(|| FieldIssue::Unknown {
            field: name.to_string(),
        })?;
        field
            .field_type
            .coerce(value.clone())
            .map(|_| ())
            .map_err(|found| FieldIssue::TypeMismatch {
                field: name.to_string(),
                expected: field.field_type.describe(),
                found: found.to_string(),
            })
    }
}

/// Raw values that passed schema validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput(JsonMap<String, JsonValue>);

impl ValidatedInput {
    /// Get a validated field value
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    /// Borrow the normalized map
    pub fn as_map(&self) -> &JsonMap<String, JsonValue> {
        &self.0
    }

    /// Take the normalized map
    pub fn into_map(self) -> JsonMap<String, JsonValue> {
        self.0
    }

    /// Deserialize into a block's typed input record
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, BlockError> {
        serde_json::from_value(JsonValue::Object(self.0))
            .map_err(|e| BlockError::InvalidInput(e.to_string()))
    }
}

/// One problem found while validating a field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldIssue {
    /// Required field not supplied
    #[error("field '{field}' is required")]
    Missing { field: String },

    /// Value could not be coerced to the declared type
    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Name not declared by the schema
    #[error("field '{field}' is not declared")]
    Unknown { field: String },
}

/// Schema validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
