//! Find In List Block
//!
//! Linear search for the first element equal to `value`. Numbers compare by
//! value, so `3` matches `3.0`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::value::loose_eq;
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("5e2c6d0a-1e37-489f-b1d0-8e1812b23333"));

#[derive(Deserialize)]
struct Input {
    list: Vec<JsonValue>,
    value: JsonValue,
}

pub struct FindInListBlock {
    metadata: BlockMetadata,
}

impl FindInListBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: ID,
                name: "FindInListBlock".into(),
                description: "Finds the index of the value in the list.".into(),
                categories: BTreeSet::from([BlockCategory::Basic]),
                input_schema: BlockSchema::new(vec![
                    FieldDescriptor::new("list", FieldType::List).description("The list to search in."),
                    FieldDescriptor::new("value", FieldType::Any).description("The value to search for."),
                ]),
                output_schema: BlockSchema::new(vec![
                    FieldDescriptor::new("index", FieldType::Integer)
                        .description("The index of the value in the list."),
                    FieldDescriptor::new("found", FieldType::Boolean)
                        .description("Whether the value was found in the list."),
                    FieldDescriptor::new("not_found_value", FieldType::Any)
                        .description("The value that was not found in the list."),
                ]),
                static_output: false,
                block_type: BlockType::Standard,
                fixtures: vec![
                    Fixture::new(
                        json!({"list": [1, 2, 3, 4, 5], "value": 3}),
                        vec![("index", json!(2)), ("found", json!(true))],
                    ),
                    Fixture::new(
                        json!({"list": [1, 2, 3, 4, 5], "value": 6}),
                        vec![("found", json!(false)), ("not_found_value", json!(6))],
                    ),
                ],
            },
        }
    }
}

impl Default for FindInListBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for FindInListBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { list, value } = input.parse()?;
        let output = match list.iter().position(|item| loose_eq(item, &value)) {
            Some(index) => BlockOutput::single("index", index).then("found", true),
            None => BlockOutput::single("found", false).then("not_found_value", value),
        };
        Ok(output)
    }
}
