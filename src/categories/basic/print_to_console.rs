//! Print To Console Block
//!
//! Debugging aid: logs the given value, passes it through on `output` and
//! then reports `"printed"` on `status`.

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("f3b1c1b2-4c4f-4f0d-8d2f-4c4f0d8d2f4c"));

pub const PRINTED: &str = "printed";

pub struct PrintToConsoleBlock {
    metadata: BlockMetadata,
}

impl PrintToConsoleBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: ID,
                name: "PrintToConsoleBlock".into(),
                description: "Print the given text to the console, this is used for a debugging purpose.".into(),
                categories: BTreeSet::from([BlockCategory::Basic]),
                input_schema: BlockSchema::new(vec![FieldDescriptor::new("text", FieldType::Any)
                    .description("The data to print to the console.")]),
                output_schema: BlockSchema::new(vec![
                    FieldDescriptor::new("output", FieldType::Any).description("The data printed to the console."),
                    FieldDescriptor::new("status", FieldType::String)
                        .description("The status of the print operation."),
                ]),
                static_output: false,
                block_type: BlockType::Standard,
                fixtures: vec![Fixture::new(
                    json!({"text": "Hello, World!"}),
                    vec![("output", json!("Hello, World!")), ("status", json!(PRINTED))],
                )],
            },
        }
    }
}

impl Default for PrintToConsoleBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for PrintToConsoleBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let text = input.get("text").cloned().unwrap_or(JsonValue::Null);
        match &text {
            JsonValue::String(s) => tracing::info!(graph_exec_id = %context.graph_exec_id, "{}", s),
            other => tracing::info!(graph_exec_id = %context.graph_exec_id, "{}", other),
        }
        Ok(BlockOutput::single("output", text).then("status", PRINTED))
    }
}
