//! Find In Dictionary Block
//!
//! Looks a key up in a dictionary, list or record whose shape is not known in
//! advance. Text inputs holding a JSON document are parsed first. The first
//! matching rule wins:
//!
//! | Input | Key | Result |
//! |-------|-----|--------|
//! | dictionary containing key | text | `output` = value |
//! | list | integer in bounds | `output` = element |
//! | empty list | text | `output` = `[]` |
//! | list whose first element contains key | text | `output` = values of key from every element containing it |
//! | other list | text | `output` = key attribute of every element exposing it |
//! | value exposing attribute | text | `output` = attribute |
//! | anything else | | `missing` = original input |
//!
//! Attribute rules only apply when `attribute_lookup` is enabled in the
//! runtime config. It is off by default, so `[{"a": 1}, {"b": 2}]` with key
//! `b` yields `[]`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::value::attribute;
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("0e50422c-6dee-4145-83d6-3a5a392f65de"));

/// Lookup key: list position or dictionary key / attribute name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LookupKey {
    Index(i64),
    Name(String),
}

#[derive(Deserialize)]
struct Input {
    input: JsonValue,
    key: LookupKey,
}

pub struct FindInDictionaryBlock {
    metadata: BlockMetadata,
}

impl FindInDictionaryBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: ID,
            name: "FindInDictionaryBlock".into(),
            description: "Lookup the given key in the input dictionary/object/list and return the value.".into(),
            categories: BTreeSet::from([BlockCategory::Basic]),
            input_schema: BlockSchema::new(vec![
                FieldDescriptor::new("input", FieldType::Any).description("Dictionary to lookup from"),
                FieldDescriptor::new("key", FieldType::StringOrInteger)
                    .description("Key to lookup in the dictionary"),
            ]),
            output_schema: BlockSchema::new(vec![
                FieldDescriptor::new("output", FieldType::Any).description("Value found for the given key"),
                FieldDescriptor::new("missing", FieldType::Any)
                    .description("Value of the input that missing the key"),
            ]),
            static_output: false,
            block_type: BlockType::Standard,
            fixtures: Self::build_fixtures(),
        }
    }

    fn build_fixtures() -> Vec<Fixture> {
        vec![
            Fixture::new(
                json!({"input": {"apple": 1, "banana": 2, "cherry": 3}, "key": "banana"}),
                vec![("output", json!(2))],
            ),
            Fixture::new(
                json!({"input": {"x": 10, "y": 20, "z": 30}, "key": "w"}),
                vec![("missing", json!({"x": 10, "y": 20, "z": 30}))],
            ),
            Fixture::new(json!({"input": [1, 2, 3], "key": 1}), vec![("output", json!(2))]),
            Fixture::new(json!({"input": [1, 2, 3], "key": 3}), vec![("missing", json!([1, 2, 3]))]),
            Fixture::new(
                json!({"input": [{"k1": "v1"}, {"k2": "v2"}, {"k1": "v3"}], "key": "k1"}),
                vec![("output", json!(["v1", "v3"]))],
            ),
            Fixture::new(
                json!({"input": "{\"name\": \"Alice\", \"age\": 25}", "key": "age"}),
                vec![("output", json!(25))],
            ),
        ]
    }
}

impl Default for FindInDictionaryBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `key` in `obj`; `None` means the key is missing.
pub fn lookup(obj: &JsonValue, key: &LookupKey, attributes: bool) -> Option<JsonValue> {
    match (obj, key) {
        (JsonValue::Object(map), LookupKey::Name(name)) if map.contains_key(name) => map.get(name).cloned(),
        (JsonValue::Array(items), LookupKey::Index(index)) => usize::try_from(*index)
            .ok()
            .and_then(|i| items.get(i))
            .cloned(),
        (JsonValue::Array(items), LookupKey::Name(name)) => Some(project(items, name, attributes)),
        (other, LookupKey::Name(name)) if attributes => attribute(other, name).cloned(),
        _ => None,
    }
}

/// Collect `name` from the elements of a list, skipping elements without it
fn project(items: &[JsonValue], name: &str, attributes: bool) -> JsonValue {
    let first_has_key = matches!(items.first(), Some(JsonValue::Object(first)) if first.contains_key(name));

    let values: Vec<JsonValue> = if first_has_key {
        items
            .iter()
            .filter_map(|item| item.as_object().and_then(|map| map.get(name)))
            .cloned()
            .collect()
    } else if attributes {
        items.iter().filter_map(|item| attribute(item, name)).cloned().collect()
    } else {
        Vec::new()
    };
    JsonValue::Array(values)
}

#[async_trait]
impl Block for FindInDictionaryBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { input, key } = input.parse()?;

        let parsed = match &input {
            JsonValue::String(text) => serde_json::from_str::<JsonValue>(text).ok(),
            _ => None,
        };
        let obj = parsed.as_ref().unwrap_or(&input);

        match lookup(obj, &key, context.config.attribute_lookup) {
            Some(found) => Ok(BlockOutput::single("output", found)),
            None => {
                tracing::debug!(graph_exec_id = %context.graph_exec_id, ?key, "key not found");
                Ok(BlockOutput::single("missing", input))
            }
        }
    }
}
