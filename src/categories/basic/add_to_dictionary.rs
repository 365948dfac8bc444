//! Add To Dictionary Block
//!
//! Copies the given dictionary (or starts from an empty one), sets the single
//! `key`/`value` pair when both are given, then applies every pair of the
//! batch `entries`. Later writes win.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{empty_dictionary, FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("31d1064e-7446-4693-a7d4-65e5ca1180d1"));

#[derive(Deserialize)]
struct Input {
    dictionary: JsonMap<String, JsonValue>,
    key: String,
    value: JsonValue,
    entries: JsonMap<String, JsonValue>,
}

pub struct AddToDictionaryBlock {
    metadata: BlockMetadata,
}

impl AddToDictionaryBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: ID,
            name: "AddToDictionaryBlock".into(),
            description: "Adds a new key-value pair to a dictionary. If no dictionary is provided, a new one is created."
                .into(),
            categories: BTreeSet::from([BlockCategory::Basic]),
            input_schema: Self::build_inputs(),
            output_schema: Self::build_outputs(),
            static_output: false,
            block_type: BlockType::Standard,
            fixtures: vec![
                Fixture::new(
                    json!({
                        "dictionary": {"existing_key": "existing_value"},
                        "key": "new_key",
                        "value": "new_value",
                    }),
                    vec![(
                        "updated_dictionary",
                        json!({"existing_key": "existing_value", "new_key": "new_value"}),
                    )],
                ),
                Fixture::new(
                    json!({"key": "first_key", "value": "first_value"}),
                    vec![("updated_dictionary", json!({"first_key": "first_value"}))],
                ),
                Fixture::new(
                    json!({
                        "dictionary": {"existing_key": "existing_value"},
                        "entries": {"new_key": "new_value", "first_key": "first_value"},
                    }),
                    vec![(
                        "updated_dictionary",
                        json!({
                            "existing_key": "existing_value",
                            "new_key": "new_value",
                            "first_key": "first_value",
                        }),
                    )],
                ),
            ],
        }
    }

    fn build_inputs() -> BlockSchema {
        BlockSchema::new(vec![
            FieldDescriptor::new("dictionary", FieldType::Dictionary)
                .description("The dictionary to add the entry to. If not provided, a new dictionary will be created.")
                .default_factory(empty_dictionary),
            FieldDescriptor::new("key", FieldType::String)
                .description("The key for the new entry.")
                .default_value("")
                .placeholder("new_key"),
            FieldDescriptor::new("value", FieldType::Any)
                .description("The value for the new entry.")
                .default_value(JsonValue::Null)
                .placeholder("new_value"),
            FieldDescriptor::new("entries", FieldType::Dictionary)
                .description(
                    "The entries to add to the dictionary. This is the batch version of the `key` and `value` fields.",
                )
                .default_factory(empty_dictionary)
                .advanced(),
        ])
    }

    fn build_outputs() -> BlockSchema {
        BlockSchema::new(vec![
            FieldDescriptor::new("updated_dictionary", FieldType::Dictionary)
                .description("The dictionary with the new entry added."),
            FieldDescriptor::new("error", FieldType::String).description("Error message if the operation failed."),
        ])
    }
}

impl Default for AddToDictionaryBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge the single pair and then the batch into a copy of `dictionary`
pub fn merge_entries(
    dictionary: &JsonMap<String, JsonValue>,
    key: &str,
    value: &JsonValue,
    entries: &JsonMap<String, JsonValue>,
) -> JsonMap<String, JsonValue> {
    let mut updated = dictionary.clone();
    if !value.is_null() && !key.is_empty() {
        updated.insert(key.to_string(), value.clone());
    }
    for (k, v) in entries {
        updated.insert(k.clone(), v.clone());
    }
    updated
}

#[async_trait]
impl Block for AddToDictionaryBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let input: Input = input.parse()?;
        let updated = merge_entries(&input.dictionary, &input.key, &input.value, &input.entries);
        Ok(BlockOutput::single("updated_dictionary", updated))
    }
}
