//! Note Block
//!
//! Display-only annotation for graph editors. Running it echoes the text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("cc10ff7b-7753-4ff2-9af6-9399b1a7eddc"));

#[derive(Deserialize)]
struct Input {
    text: String,
}

pub struct NoteBlock {
    metadata: BlockMetadata,
}

impl NoteBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: ID,
                name: "NoteBlock".into(),
                description: "This block is used to display a sticky note with the given text.".into(),
                categories: BTreeSet::from([BlockCategory::Basic]),
                input_schema: BlockSchema::new(vec![FieldDescriptor::new("text", FieldType::String)
                    .description("The text to display in the sticky note.")
                    .default_value("")]),
                output_schema: BlockSchema::new(vec![FieldDescriptor::new("output", FieldType::String)
                    .description("The text to display in the sticky note.")]),
                static_output: false,
                block_type: BlockType::Note,
                fixtures: vec![Fixture::new(
                    json!({"text": "Hello, World!"}),
                    vec![("output", json!("Hello, World!"))],
                )],
            },
        }
    }
}

impl Default for NoteBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for NoteBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let Input { text } = input.parse()?;
        Ok(BlockOutput::single("output", text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::OutputEvent;
    use serde_json::Map as JsonMap;

    #[test]
    fn test_is_note_kind() {
        assert_eq!(NoteBlock::new().metadata().block_type, BlockType::Note);
    }

    #[tokio::test]
    async fn test_echoes_text() {
        let events = NoteBlock::new()
            .execute(
                json!({"text": "remember me"}).as_object().unwrap(),
                &ExecutionContext::new("test-exec"),
            )
            .await
            .unwrap()
            .collect_events();
        assert_eq!(events, vec![OutputEvent::new("output", "remember me")]);
    }

    #[tokio::test]
    async fn test_missing_text_defaults_to_empty() {
        let events = NoteBlock::new()
            .execute(&JsonMap::new(), &ExecutionContext::new("test-exec"))
            .await
            .unwrap()
            .collect_events();
        assert_eq!(events, vec![OutputEvent::new("output", "")]);
    }
}
