//! Block trait and related types
//!
//! This module defines the Block trait every variant implements, along with
//! the block metadata, conformance fixtures, the execution context handed to
//! a running block, and error handling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::conversion::{Converter, DefaultConverter};
use super::output::{BlockOutput, OutputEvent};
use super::schema::{BlockSchema, ValidatedInput, ValidationError};
use super::storage::{LocalMediaStore, MediaStore, StorageError};
use super::BlockId;
use crate::categories::BlockCategory;
use crate::config::RuntimeConfig;

/// Core block trait that all blocks must implement
///
/// Blocks are stateless: every invocation works on its own validated input,
/// so one instance can serve any number of concurrent executions.
#[async_trait]
pub trait Block: Send + Sync {
    /// Get block metadata
    fn metadata(&self) -> &BlockMetadata;

    /// Run the block on a validated input
    async fn run(
        &self,
        input: ValidatedInput,
        context: &ExecutionContext,
    ) -> Result<BlockOutput, BlockError>;

    /// Get the stable block id
    fn id(&self) -> BlockId {
        self.metadata().id
    }

    /// Get the input schema
    fn input_schema(&self) -> &BlockSchema {
        &self.metadata().input_schema
    }

    /// Get the output schema
    fn output_schema(&self) -> &BlockSchema {
        &self.metadata().output_schema
    }

    /// Validate a raw input map against the input schema
    fn validate_input(&self, raw: &JsonMap<String, JsonValue>) -> Result<ValidatedInput, ValidationError> {
        self.input_schema().validate(raw)
    }

    /// Validate then run
    async fn execute(
        &self,
        raw: &JsonMap<String, JsonValue>,
        context: &ExecutionContext,
    ) -> Result<BlockOutput, BlockError> {
        let input = self.validate_input(raw)?;
        self.run(input, context).await
    }
}

/// Block metadata
#[derive(Debug, Clone, Serialize)]
pub struct BlockMetadata {
    /// Stable block identifier
    pub id: BlockId,
    /// Human-readable block name
    pub name: String,
    /// Brief description of the block
    pub description: String,
    /// Category tags
    pub categories: BTreeSet<BlockCategory>,
    /// Input fields
    pub input_schema: BlockSchema,
    /// Output fields, the only valid event names
    pub output_schema: BlockSchema,
    /// Output can be reused by several consumers without running again
    pub static_output: bool,
    /// Block kind
    pub block_type: BlockType,
    /// Example inputs with the events they must produce
    pub fixtures: Vec<Fixture>,
}

/// Block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockType {
    /// Regular executable block
    #[default]
    Standard,
    /// Display-only annotation
    Note,
}

/// Conformance fixture: one input and the exact event sequence it produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Raw input map
    pub input: JsonMap<String, JsonValue>,
    /// Expected events, in order
    pub expected: Vec<OutputEvent>,
}

impl Fixture {
    /// Build a fixture from a JSON object literal and `(field, value)` pairs
    ///
    /// A non-object `input` yields an empty input map.
    pub fn new(input: JsonValue, expected: Vec<(&str, JsonValue)>) -> Self {
        let input = match input {
            JsonValue::Object(map) => map,
            _ => JsonMap::new(),
        };
        Self {
            input,
            expected: expected
                .into_iter()
                .map(|(field, value)| OutputEvent::new(field, value))
                .collect(),
        }
    }
}

/// Block execution context
#[derive(Clone)]
pub struct ExecutionContext {
    /// Identifier of the graph execution this invocation belongs to
    pub graph_exec_id: String,
    /// Media storage collaborator
    pub media_store: Arc<dyn MediaStore>,
    /// Value conversion collaborator
    pub converter: Arc<dyn Converter>,
    /// Runtime settings
    pub config: Arc<RuntimeConfig>,
}

impl ExecutionContext {
    /// Context with default collaborators and settings
    pub fn new(graph_exec_id: impl Into<String>) -> Self {
        Self::from_config(graph_exec_id, RuntimeConfig::default())
    }

    /// Context using the media root and flags from `config`
    pub fn from_config(graph_exec_id: impl Into<String>, config: RuntimeConfig) -> Self {
        Self {
            graph_exec_id: graph_exec_id.into(),
            media_store: Arc::new(LocalMediaStore::new(config.media_root.clone())),
            converter: Arc::new(DefaultConverter),
            config: Arc::new(config),
        }
    }

    /// Replace the media store
    pub fn with_media_store(mut self, media_store: Arc<dyn MediaStore>) -> Self {
        self.media_store = media_store;
        self
    }

    /// Replace the converter
    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = converter;
        self
    }

    /// Same collaborators, different execution
    pub fn for_execution(&self, graph_exec_id: impl Into<String>) -> Self {
        Self {
            graph_exec_id: graph_exec_id.into(),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("graph_exec_id", &self.graph_exec_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Block errors
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// Input did not satisfy the input schema
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Validated input could not be read into the block's input record
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Media storage failed
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    /// Block emitted an event its output schema does not declare
    #[error("Block '{block}' emitted undeclared output '{field}'")]
    UnknownOutput { block: String, field: String },

    /// Block emitted a value that does not match the declared output type
    #[error("Block '{block}' emitted an invalid value on '{field}': {reason}")]
    InvalidOutput {
        block: String,
        field: String,
        reason: String,
    },

    /// Execution failed
    #[error("Execution failed: {0}")]
    Execution(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldDescriptor, FieldType};
    use serde_json::json;

    struct EchoBlock {
        metadata: BlockMetadata,
    }

    impl EchoBlock {
        fn new() -> Self {
            Self {
                metadata: BlockMetadata {
                    id: BlockId::random(),
                    name: "EchoBlock".into(),
                    description: "Echoes its text".into(),
                    categories: BTreeSet::from([BlockCategory::Basic]),
                    input_schema: BlockSchema::new(vec![FieldDescriptor::new("text", FieldType::String)]),
                    output_schema: BlockSchema::new(vec![FieldDescriptor::new("output", FieldType::String)]),
                    static_output: false,
                    block_type: BlockType::Standard,
                    fixtures: Vec::new(),
                },
            }
        }
    }

    #[async_trait]
    impl Block for EchoBlock {
        fn metadata(&self) -> &BlockMetadata {
            &self.metadata
        }

        async fn run(
            &self,
            input: ValidatedInput,
            _context: &ExecutionContext,
        ) -> Result<BlockOutput, BlockError> {
            let text = input.get("text").cloned().unwrap_or(JsonValue::Null);
            Ok(BlockOutput::single("output", text))
        }
    }

    #[tokio::test]
    async fn test_execute_validates_then_runs() {
        let block = EchoBlock::new();
        let context = ExecutionContext::new("exec");
        let raw = json!({"text": "hi"}).as_object().cloned().unwrap();

        let events = block.execute(&raw, &context).await.unwrap().collect_events();
        assert_eq!(events, vec![OutputEvent::new("output", "hi")]);
    }

    #[tokio::test]
    async fn test_execute_surfaces_validation_error() {
        let block = EchoBlock::new();
        let context = ExecutionContext::new("exec");

        let err = block.execute(&JsonMap::new(), &context).await.unwrap_err();
        assert!(matches!(err, BlockError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: field 'text' is required");
    }

    #[test]
    fn test_fixture_from_literal() {
        let fixture = Fixture::new(json!({"input": 1}), vec![("output", json!(1))]);
        assert_eq!(fixture.input.len(), 1);
        assert_eq!(fixture.expected, vec![OutputEvent::new("output", 1)]);
    }

    #[test]
    fn test_block_type_wire_names() {
        assert_eq!(serde_json::to_value(BlockType::Note).unwrap(), json!("NOTE"));
        assert_eq!(BlockType::default(), BlockType::Standard);
    }

    #[test]
    fn test_for_execution_keeps_collaborators() {
        let context = ExecutionContext::new("first");
        let other = context.for_execution("second");
        assert_eq!(other.graph_exec_id, "second");
        assert!(Arc::ptr_eq(&context.config, &other.config));
    }

    #[test]
    fn test_metadata_serializes_schemas() {
        let block = EchoBlock::new();
        let json = serde_json::to_value(block.metadata()).unwrap();
        assert_eq!(json["input_schema"][0]["name"], json!("text"));
        assert_eq!(json["categories"], json!(["BASIC"]));
        assert_eq!(json["block_type"], json!("STANDARD"));
    }
}
