//! Universal Type Converter Block
//!
//! Converts a value to string, number, boolean, list or dictionary through
//! the converter of the execution context. Conversion failures are reported
//! on `error` instead of failing the invocation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::conversion::TypeOption;
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("95d1b990-ce13-4d88-9737-ba5c2070c97b"));

#[derive(Deserialize)]
struct Input {
    value: JsonValue,
    #[serde(rename = "type")]
    target: TypeOption,
}

pub struct UniversalTypeConverterBlock {
    metadata: BlockMetadata,
}

impl UniversalTypeConverterBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        let options: Vec<&str> = TypeOption::ALL.iter().map(|o| o.as_str()).collect();
        BlockMetadata {
            id: ID,
            name: "UniversalTypeConverterBlock".into(),
            description: "This block is used to convert a value to a universal type.".into(),
            categories: BTreeSet::from([BlockCategory::Basic]),
            input_schema: BlockSchema::new(vec![
                FieldDescriptor::new("value", FieldType::Any).description("The value to convert to a universal type."),
                FieldDescriptor::new("type", FieldType::one_of(&options))
                    .description("The type to convert the value to."),
            ]),
            output_schema: BlockSchema::new(vec![
                FieldDescriptor::new("value", FieldType::Any).description("The converted value."),
                FieldDescriptor::new("error", FieldType::String)
                    .description("Error message if the conversion failed."),
            ]),
            static_output: false,
            block_type: BlockType::Standard,
            fixtures: vec![
                Fixture::new(json!({"value": "42.5", "type": "number"}), vec![("value", json!(42.5))]),
                Fixture::new(json!({"value": 7, "type": "string"}), vec![("value", json!("7"))]),
                Fixture::new(json!({"value": "no", "type": "boolean"}), vec![("value", json!(false))]),
                Fixture::new(json!({"value": "solo", "type": "list"}), vec![("value", json!(["solo"]))]),
                Fixture::new(
                    json!({"value": "abc", "type": "number"}),
                    vec![("error", json!("Failed to convert value: cannot parse \"abc\" as number"))],
                ),
            ],
        }
    }
}

impl Default for UniversalTypeConverterBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for UniversalTypeConverterBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { value, target } = input.parse()?;
        let output = match context.converter.convert(&value, target) {
            Ok(converted) => BlockOutput::single("value", converted),
            Err(e) => {
                tracing::warn!(graph_exec_id = %context.graph_exec_id, %target, error = %e, "conversion failed");
                BlockOutput::single("error", format!("Failed to convert value: {}", e))
            }
        };
        Ok(output)
    }
}
