//! Create Dictionary Block

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("b924ddf4-de4f-4b56-9a85-358930dcbc91"));

#[derive(Deserialize)]
struct Input {
    values: JsonMap<String, JsonValue>,
}

/// Builds a dictionary from pairs known upfront
pub struct CreateDictionaryBlock {
    metadata: BlockMetadata,
}

impl CreateDictionaryBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: ID,
                name: "CreateDictionaryBlock".into(),
                description: "Creates a dictionary with the specified key-value pairs. \
                              Use this when you know all the values you want to add upfront."
                    .into(),
                categories: BTreeSet::from([BlockCategory::Data]),
                input_schema: BlockSchema::new(vec![FieldDescriptor::new("values", FieldType::Dictionary)
                    .description("Key-value pairs to create the dictionary with")
                    .placeholder("e.g., {'name': 'Alice', 'age': 25}")]),
                output_schema: BlockSchema::new(vec![
                    FieldDescriptor::new("dictionary", FieldType::Dictionary)
                        .description("The created dictionary containing the specified key-value pairs"),
                    FieldDescriptor::new("error", FieldType::String)
                        .description("Error message if dictionary creation failed"),
                ]),
                static_output: false,
                block_type: BlockType::Standard,
                fixtures: vec![
                    Fixture::new(
                        json!({"values": {"name": "Alice", "age": 25, "city": "New York"}}),
                        vec![("dictionary", json!({"name": "Alice", "age": 25, "city": "New York"}))],
                    ),
                    Fixture::new(
                        json!({"values": {"numbers": [1, 2, 3], "active": true, "score": 95.5}}),
                        vec![("dictionary", json!({"numbers": [1, 2, 3], "active": true, "score": 95.5}))],
                    ),
                ],
            },
        }
    }
}

impl Default for CreateDictionaryBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for CreateDictionaryBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { values } = input.parse()?;
        Ok(BlockOutput::single("dictionary", values))
    }
}
