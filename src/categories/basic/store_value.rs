//! Store Value Block
//!
//! Provides a constant value without keeping any state. When `data` is set
//! the block emits it; otherwise the triggering `input` is forwarded
//! unchanged. The output is static and can be consumed many times.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::value::is_truthy;
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("1ff065e9-88e8-4358-9d82-8dc91f622ba9"));

#[derive(Deserialize)]
struct Input {
    input: JsonValue,
    data: JsonValue,
}

pub struct StoreValueBlock {
    metadata: BlockMetadata,
}

impl StoreValueBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: ID,
            name: "StoreValueBlock".into(),
            description: "This block forwards an input value as output, allowing reuse without change."
                .into(),
            categories: BTreeSet::from([BlockCategory::Basic]),
            input_schema: Self::build_inputs(),
            output_schema: Self::build_outputs(),
            static_output: true,
            block_type: BlockType::Standard,
            fixtures: vec![
                Fixture::new(
                    serde_json::json!({"input": "Hello, World!"}),
                    vec![("output", "Hello, World!".into())],
                ),
                Fixture::new(
                    serde_json::json!({"input": "Hello, World!", "data": "Existing Data"}),
                    vec![("output", "Existing Data".into())],
                ),
            ],
        }
    }

    fn build_inputs() -> BlockSchema {
        BlockSchema::new(vec![
            FieldDescriptor::new("input", FieldType::Any).description(
                "Trigger the block to produce the output. The value is only used when `data` is empty.",
            ),
            FieldDescriptor::new("data", FieldType::Any)
                .description("The constant data to be retained in the block. This value is passed as `output`.")
                .default_value(JsonValue::Null),
        ])
    }

    fn build_outputs() -> BlockSchema {
        BlockSchema::new(vec![FieldDescriptor::new("output", FieldType::Any)
            .description("The stored data retained in the block.")])
    }
}

impl Default for StoreValueBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for StoreValueBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { input, data } = input.parse()?;
        let value = if is_truthy(&data) { data } else { input };
        Ok(BlockOutput::single("output", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::OutputEvent;
    use serde_json::json;

    async fn run(raw: JsonValue) -> Vec<OutputEvent> {
        let block = StoreValueBlock::new();
        let context = ExecutionContext::new("test-exec");
        block
            .execute(raw.as_object().unwrap(), &context)
            .await
            .unwrap()
            .collect_events()
    }

    #[tokio::test]
    async fn test_forwards_input_without_data() {
        let events = run(json!({"input": {"a": 1}})).await;
        assert_eq!(events, vec![OutputEvent::new("output", json!({"a": 1}))]);
    }

    #[tokio::test]
    async fn test_data_wins_over_input() {
        let events = run(json!({"input": 1, "data": [1, 2]})).await;
        assert_eq!(events, vec![OutputEvent::new("output", json!([1, 2]))]);
    }

    #[tokio::test]
    async fn test_empty_data_falls_back_to_input() {
        for empty in [json!(null), json!(""), json!([]), json!({}), json!(0), json!(false)] {
            let events = run(json!({"input": "trigger", "data": empty})).await;
            assert_eq!(events, vec![OutputEvent::new("output", "trigger")]);
        }
    }

    #[tokio::test]
    async fn test_idempotent() {
        let raw = json!({"input": "x", "data": {"k": "v"}});
        assert_eq!(run(raw.clone()).await, run(raw).await);
    }

    #[tokio::test]
    async fn test_input_is_required() {
        let block = StoreValueBlock::new();
        let context = ExecutionContext::new("test-exec");
        let err = block
            .execute(json!({"data": 1}).as_object().unwrap(), &context)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
    }

    #[test]
    fn test_metadata() {
        let block = StoreValueBlock::new();
        assert_eq!(block.id().to_string(), "1ff065e9-88e8-4358-9d82-8dc91f622ba9");
        assert!(block.metadata().static_output);
    }
}
