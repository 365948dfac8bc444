//! Block runtime
//!
//! This module provides the host-side runner: it resolves blocks through the
//! registry, validates raw input, invokes the routine and checks the emitted
//! events against the output schema.

pub mod fixtures;

pub use fixtures::{run_fixtures, FixtureError};

use serde_json::{Map as JsonMap, Value as JsonValue};
use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::core::block::{Block, BlockError, ExecutionContext};
use crate::core::output::{BlockOutput, OutputEvent};
use crate::core::registry::{BlockRegistry, RegistryError};
use crate::core::schema::FieldIssue;
use crate::core::BlockId;

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Block lookup failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Block invocation failed
    #[error(transparent)]
    Block(#[from] BlockError),
}

/// Block runtime execution engine
pub struct BlockRuntime {
    registry: BlockRegistry,
    context: ExecutionContext,
}

impl BlockRuntime {
    /// Create a runtime over `registry`, cloning `context` for each execution
    pub fn new(registry: BlockRegistry, context: ExecutionContext) -> Self {
        Self { registry, context }
    }

    /// Runtime with every built-in block and default collaborators for `config`
    pub fn with_basic_blocks(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let registry = BlockRegistry::with_basic_blocks()?;
        Ok(Self::new(registry, ExecutionContext::from_config("", config)))
    }

    /// Get the registry
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Get the context template
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Get the runtime settings
    pub fn config(&self) -> &RuntimeConfig {
        &self.context.config
    }

    /// Run a block to completion and return its events in order
    ///
    /// With `strict_outputs` enabled, an event whose name is not declared by
    /// the output schema, or whose value does not match the declared type,
    /// fails the invocation.
    pub async fn execute(
        &self,
        block_id: &BlockId,
        raw: &JsonMap<String, JsonValue>,
        graph_exec_id: &str,
    ) -> Result<Vec<OutputEvent>, RuntimeError> {
        let block = self.registry.get_block(block_id)?;
        let output = self.invoke(&block, raw, graph_exec_id).await?;

        let mut events = Vec::new();
        for event in output {
            if self.config().strict_outputs {
                check_event(&*block, &event)?;
            }
            if self.config().log_events {
                tracing::trace!(
                    block = %block.metadata().name,
                    graph_exec_id,
                    field = %event.field,
                    value = %event.value,
                    "event"
                );
            }
            events.push(event);
        }

        tracing::debug!(
            block = %block.metadata().name,
            graph_exec_id,
            events = events.len(),
            "block completed"
        );
        Ok(events)
    }

    /// Run a block and hand back its lazy event stream unchecked
    pub async fn execute_stream(
        &self,
        block_id: &BlockId,
        raw: &JsonMap<String, JsonValue>,
        graph_exec_id: &str,
    ) -> Result<BlockOutput, RuntimeError> {
        let block = self.registry.get_block(block_id)?;
        Ok(self.invoke(&block, raw, graph_exec_id).await?)
    }

    /// Run the block named `name`
    pub async fn execute_by_name(
        &self,
        name: &str,
        raw: &JsonMap<String, JsonValue>,
        graph_exec_id: &str,
    ) -> Result<Vec<OutputEvent>, RuntimeError> {
        let id = self
            .registry
            .get_by_name(name)
            .map(|block| block.id())
            .ok_or_else(|| {
                BlockError::Execution(format!("no block named '{}' is registered", name))
            })?;
        self.execute(&id, raw, graph_exec_id).await
    }

    async fn invoke(
        &self,
        block: &Arc<dyn Block>,
        raw: &JsonMap<String, JsonValue>,
        graph_exec_id: &str,
    ) -> Result<BlockOutput, BlockError> {
        let context = self.context.for_execution(graph_exec_id);
        tracing::debug!(block = %block.metadata().name, graph_exec_id, "executing block");

        block.execute(raw, &context).await.map_err(|e| {
            tracing::error!(block = %block.metadata().name, graph_exec_id, error = %e, "block failed");
            e
        })
    }
}

/// Check one event against the block's output schema
fn check_event(block: &dyn Block, event: &OutputEvent) -> Result<(), BlockError> {
    let name = &block.metadata().name;
    match block.output_schema().check_value(&event.field, &event.value) {
        Ok(()) => Ok(()),
        Err(FieldIssue::Unknown { field }) => Err(BlockError::UnknownOutput {
            block: name.clone(),
            field,
        }),
        Err(issue) => Err(BlockError::InvalidOutput {
            block: name.clone(),
            field: event.field.clone(),
            reason: issue.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::BlockCategory;
    use crate::core::block::{BlockMetadata, BlockType};
    use crate::core::field::{FieldDescriptor, FieldType};
    use crate::core::schema::{BlockSchema, ValidatedInput};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::BTreeSet;

    /// Emits whatever `emit` says, declared outputs or not
    struct RogueBlock {
        metadata: BlockMetadata,
    }

    impl RogueBlock {
        fn new() -> Self {
            Self {
                metadata: BlockMetadata {
                    id: BlockId::random(),
                    name: "RogueBlock".into(),
                    description: "Emits arbitrary events".into(),
                    categories: BTreeSet::from([BlockCategory::Basic]),
                    input_schema: BlockSchema::new(vec![
                        FieldDescriptor::new("field", FieldType::String),
                        FieldDescriptor::new("value", FieldType::Any),
                    ]),
                    output_schema: BlockSchema::new(vec![FieldDescriptor::new("count", FieldType::Integer)]),
                    static_output: false,
                    block_type: BlockType::Standard,
                    fixtures: Vec::new(),
                },
            }
        }
    }

    #[async_trait]
    impl Block for RogueBlock {
        fn metadata(&self) -> &BlockMetadata {
            &self.metadata
        }

        async fn run(&self, input: ValidatedInput, _context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
            let field = input.get("field").and_then(|v| v.as_str()).unwrap_or_default().to_string();
            let value = input.get("value").cloned().unwrap_or(JsonValue::Null);
            Ok(BlockOutput::single(field, value))
        }
    }

    fn runtime_with_rogue(strict: bool) -> (BlockRuntime, BlockId) {
        let registry = BlockRegistry::new();
        let block = Arc::new(RogueBlock::new());
        let id = block.id();
        registry.register(block).unwrap();
        let config = RuntimeConfig::default().with_strict_outputs(strict);
        (BlockRuntime::new(registry, ExecutionContext::from_config("", config)), id)
    }

    fn raw(value: JsonValue) -> JsonMap<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_execute_registered_block() {
        let runtime = BlockRuntime::with_basic_blocks(RuntimeConfig::default()).unwrap();
        let events = runtime
            .execute_by_name("FindInListBlock", &raw(json!({"list": [1, 2, 3], "value": 3})), "exec-1")
            .await
            .unwrap();
        assert_eq!(
            events,
            vec![OutputEvent::new("index", 2), OutputEvent::new("found", true)]
        );
    }

    #[tokio::test]
    async fn test_unknown_block_id() {
        let runtime = BlockRuntime::with_basic_blocks(RuntimeConfig::default()).unwrap();
        let err = runtime
            .execute(&BlockId::random(), &JsonMap::new(), "exec-1")
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Registry(RegistryError::BlockNotFound(_))));
    }

    #[tokio::test]
    async fn test_validation_error_propagates() {
        let runtime = BlockRuntime::with_basic_blocks(RuntimeConfig::default()).unwrap();
        let err = runtime
            .execute_by_name("FindInListBlock", &raw(json!({"list": "nope"})), "exec-1")
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Block(BlockError::Validation(_))));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_undeclared_output() {
        let (runtime, id) = runtime_with_rogue(true);
        let err = runtime
            .execute(&id, &raw(json!({"field": "surprise", "value": 1})), "exec-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Block(BlockError::UnknownOutput { ref field, .. }) if field == "surprise"
        ));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_mistyped_output() {
        let (runtime, id) = runtime_with_rogue(true);
        let err = runtime
            .execute(&id, &raw(json!({"field": "count", "value": "many"})), "exec-1")
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Block(BlockError::InvalidOutput { .. })));
    }

    #[tokio::test]
    async fn test_lenient_mode_passes_events_through() {
        let (runtime, id) = runtime_with_rogue(false);
        let events = runtime
            .execute(&id, &raw(json!({"field": "surprise", "value": 1})), "exec-1")
            .await
            .unwrap();
        assert_eq!(events, vec![OutputEvent::new("surprise", 1)]);
    }

    #[tokio::test]
    async fn test_execute_stream_is_lazy() {
        let runtime = BlockRuntime::with_basic_blocks(RuntimeConfig::default()).unwrap();
        let id = runtime.registry().get_by_name("CreateListBlock").unwrap().id();

        let mut stream = runtime
            .execute_stream(&id, &raw(json!({"values": [1, 2, 3, 4, 5], "max_size": 2})), "exec-1")
            .await
            .unwrap();
        assert_eq!(stream.first_on("list"), Some(json!([1, 2])));
    }
}
