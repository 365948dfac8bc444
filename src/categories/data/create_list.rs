//! Create List Block
//!
//! Emits `values` as a list. With a positive `max_size` the list is streamed
//! in consecutive chunks of at most that many elements, one `list` event per
//! chunk. Chunks are cut as the consumer pulls them. A `max_size` of zero
//! means no limit.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::{BlockOutput, OutputEvent};
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("a912d5c7-6e00-4542-b2a9-8034136930e4"));

#[derive(Deserialize)]
struct Input {
    values: Vec<JsonValue>,
    max_size: Option<i64>,
}

pub struct CreateListBlock {
    metadata: BlockMetadata,
}

impl CreateListBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: ID,
            name: "CreateListBlock".into(),
            description: "Creates a list with the specified values. \
                          Use this when you know all the values you want to add upfront."
                .into(),
            categories: BTreeSet::from([BlockCategory::Data]),
            input_schema: BlockSchema::new(vec![
                FieldDescriptor::new("values", FieldType::List)
                    .description("A list of values to be combined into a new list.")
                    .placeholder("e.g., ['Alice', 25, True]"),
                FieldDescriptor::new("max_size", FieldType::optional(FieldType::Integer))
                    .description(
                        "Maximum size of the list. If provided, the list will be yielded in chunks of this size.",
                    )
                    .default_value(JsonValue::Null)
                    .advanced(),
            ]),
            output_schema: BlockSchema::new(vec![
                FieldDescriptor::new("list", FieldType::List)
                    .description("The created list containing the specified values."),
                FieldDescriptor::new("error", FieldType::String).description("Error message if list creation failed."),
            ]),
            static_output: false,
            block_type: BlockType::Standard,
            fixtures: vec![
                Fixture::new(json!({"values": ["Alice", 25, true]}), vec![("list", json!(["Alice", 25, true]))]),
                Fixture::new(
                    json!({"values": [1, 2, 3, "four", {"key": "value"}]}),
                    vec![("list", json!([1, 2, 3, "four", {"key": "value"}]))],
                ),
                Fixture::new(
                    json!({"values": [1, 2, 3, 4, 5], "max_size": 2}),
                    vec![("list", json!([1, 2])), ("list", json!([3, 4])), ("list", json!([5]))],
                ),
            ],
        }
    }
}

impl Default for CreateListBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `values` into consecutive chunks of at most `size` elements
pub fn chunked(values: Vec<JsonValue>, size: NonZeroUsize) -> impl Iterator<Item = Vec<JsonValue>> + Send {
    let mut rest = values.into_iter();
    std::iter::from_fn(move || {
        let chunk: Vec<JsonValue> = rest.by_ref().take(size.get()).collect();
        (!chunk.is_empty()).then_some(chunk)
    })
}

#[async_trait]
impl Block for CreateListBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { values, max_size } = input.parse()?;

        if values.is_empty() {
            return Ok(BlockOutput::single("list", values));
        }

        let size = match max_size {
            Some(n) if n < 0 => {
                return Ok(BlockOutput::single(
                    "error",
                    format!("Failed to create list: max_size must not be negative, got {}", n),
                ))
            }
            Some(n) => usize::try_from(n).ok().and_then(NonZeroUsize::new),
            None => None,
        };
        let Some(size) = size else {
            return Ok(BlockOutput::single("list", values));
        };

        Ok(BlockOutput::lazy(
            chunked(values, size).map(|chunk| OutputEvent::new("list", chunk)),
        ))
    }
}
