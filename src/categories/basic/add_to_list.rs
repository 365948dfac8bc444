//! Add To List Block
//!
//! Inserts a batch of entries into a copy of a list. The batch is `entries`
//! followed by `entry` (when not null). Without `position` the batch is
//! appended; with it the batch is spliced in so that the element previously
//! at `position` follows the batch.
//!
//! Positions follow slice semantics: a negative position counts from the end
//! of the list, and positions beyond either end are clamped to it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{empty_list, FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("aeb08fc1-2fc1-4141-bc8e-f758f183a822"));

#[derive(Deserialize)]
struct Input {
    list: Vec<JsonValue>,
    entry: JsonValue,
    entries: Vec<JsonValue>,
    position: Option<i64>,
}

pub struct AddToListBlock {
    metadata: BlockMetadata,
}

impl AddToListBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: ID,
            name: "AddToListBlock".into(),
            description: "Adds a new entry to a list. The entry can be of any type. \
                          If no list is provided, a new one is created."
                .into(),
            categories: BTreeSet::from([BlockCategory::Basic]),
            input_schema: Self::build_inputs(),
            output_schema: Self::build_outputs(),
            static_output: false,
            block_type: BlockType::Standard,
            fixtures: Self::build_fixtures(),
        }
    }

    fn build_inputs() -> BlockSchema {
        BlockSchema::new(vec![
            FieldDescriptor::new("list", FieldType::List)
                .description("The list to add the entry to. If not provided, a new list will be created.")
                .default_factory(empty_list),
            FieldDescriptor::new("entry", FieldType::Any)
                .description("The entry to add to the list. Can be of any type (string, int, dict, etc.).")
                .default_value(JsonValue::Null),
            FieldDescriptor::new("entries", FieldType::List)
                .description("The entries to add to the list. This is the batch version of the `entry` field.")
                .default_factory(empty_list)
                .advanced(),
            FieldDescriptor::new("position", FieldType::optional(FieldType::Integer))
                .description(
                    "The position to insert the new entry. If not provided, \
                     the entry will be appended to the end of the list.",
                )
                .default_value(JsonValue::Null),
        ])
    }

    fn build_outputs() -> BlockSchema {
        BlockSchema::new(vec![
            FieldDescriptor::new("updated_list", FieldType::List).description("The list with the new entry added."),
            FieldDescriptor::new("error", FieldType::String).description("Error message if the operation failed."),
        ])
    }

    fn build_fixtures() -> Vec<Fixture> {
        vec![
            Fixture::new(
                json!({
                    "list": [1, "string", {"existing_key": "existing_value"}],
                    "entry": {"new_key": "new_value"},
                    "position": 1,
                }),
                vec![(
                    "updated_list",
                    json!([1, {"new_key": "new_value"}, "string", {"existing_key": "existing_value"}]),
                )],
            ),
            Fixture::new(json!({"entry": "first_entry"}), vec![("updated_list", json!(["first_entry"]))]),
            Fixture::new(
                json!({"list": ["a", "b", "c"], "entry": "d"}),
                vec![("updated_list", json!(["a", "b", "c", "d"]))],
            ),
            Fixture::new(
                json!({"entry": "e", "entries": ["f", "g"], "list": ["a", "b"], "position": 1}),
                vec![("updated_list", json!(["a", "f", "g", "e", "b"]))],
            ),
        ]
    }
}

impl Default for AddToListBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Index at which a batch is spliced for `position` in a list of `len`
pub fn splice_index(len: usize, position: i64) -> usize {
    let offset = usize::try_from(position.unsigned_abs()).unwrap_or(usize::MAX);
    if position < 0 {
        len.saturating_sub(offset)
    } else {
        offset.min(len)
    }
}

/// Insert `entries` and then `entry` into a copy of `list`
pub fn insert_entries(
    list: &[JsonValue],
    entry: &JsonValue,
    entries: &[JsonValue],
    position: Option<i64>,
) -> Vec<JsonValue> {
    let mut batch = entries.to_vec();
    if !entry.is_null() {
        batch.push(entry.clone());
    }

    let mut updated = list.to_vec();
    match position {
        Some(position) => {
            let at = splice_index(updated.len(), position);
            updated.splice(at..at, batch);
        }
        None => updated.extend(batch),
    }
    updated
}

#[async_trait]
impl Block for AddToListBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let input: Input = input.parse()?;
        let updated = insert_entries(&input.list, &input.entry, &input.entries, input.position);
        Ok(BlockOutput::single("updated_list", updated))
    }
}
