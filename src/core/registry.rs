//! Block Registry - Central registry of the available blocks
//!
//! This module provides a thread-safe registry keyed by stable block id. It supports:
//! - Block registration and unregistration
//! - Block discovery by id, name, category, or search query
//! - Contract validation at registration time

use crate::categories::{all_blocks, BlockCategory};
use crate::core::{Block, BlockId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Block registry for managing all available blocks
///
/// Concurrent lookups share a read lock; registration takes the write lock.
/// Iteration order follows block ids, so listings are deterministic.
#[derive(Clone)]
pub struct BlockRegistry {
    blocks: Arc<RwLock<BTreeMap<BlockId, Arc<dyn Block>>>>,
}

impl BlockRegistry {
    /// Create a new empty block registry
    ///
    /// # Example
    /// ```
    /// use basic_blocks::core::registry::BlockRegistry;
    ///
    /// let registry = BlockRegistry::new();
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a registry holding every built-in block
    ///
    /// # Example
    /// ```
    /// use basic_blocks::core::registry::BlockRegistry;
    ///
    /// let registry = BlockRegistry::with_basic_blocks().unwrap();
    /// assert!(registry.get_by_name("StoreValueBlock").is_some());
    /// ```
    pub fn with_basic_blocks() -> Result<Self, RegistryError> {
        let registry = Self::new();
        for block in all_blocks() {
            registry.register(block)?;
        }
        Ok(registry)
    }

    /// Register a new block in the registry
    ///
    /// # Returns
    /// * `Ok(())` if registration succeeds
    /// * `Err(RegistryError)` if the id is taken or the block breaks its contract
    pub fn register(&self, block: Arc<dyn Block>) -> Result<(), RegistryError> {
        validate_block(&*block)?;

        let id = block.id();
        let mut blocks = self.blocks.write();

        if blocks.contains_key(&id) {
            return Err(RegistryError::DuplicateBlock(id));
        }

        tracing::debug!(block = %block.metadata().name, %id, "registered block");
        blocks.insert(id, block);
        Ok(())
    }

    /// Unregister a block from the registry
    pub fn unregister(&self, block_id: &BlockId) -> Result<Arc<dyn Block>, RegistryError> {
        let mut blocks = self.blocks.write();

        blocks
            .remove(block_id)
            .ok_or(RegistryError::BlockNotFound(*block_id))
    }

    /// Get a block by its id
    pub fn get_block(&self, id: &BlockId) -> Result<Arc<dyn Block>, RegistryError> {
        let blocks = self.blocks.read();

        blocks
            .get(id)
            .cloned()
            .ok_or(RegistryError::BlockNotFound(*id))
    }

    /// Get a block by its exact name
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Block>> {
        let blocks = self.blocks.read();
        blocks.values().find(|b| b.metadata().name == name).cloned()
    }

    /// Get all registered blocks
    pub fn get_all_blocks(&self) -> Vec<Arc<dyn Block>> {
        let blocks = self.blocks.read();
        blocks.values().cloned().collect()
    }

    /// Get blocks tagged with `category`
    pub fn get_blocks_by_category(&self, category: BlockCategory) -> Vec<Arc<dyn Block>> {
        let blocks = self.blocks.read();

        blocks
            .values()
            .filter(|b| b.metadata().categories.contains(&category))
            .cloned()
            .collect()
    }

    /// Search for blocks by query string
    ///
    /// Matches block name, description and category names, ignoring case.
    pub fn search_blocks(&self, query: &str) -> Vec<Arc<dyn Block>> {
        let blocks = self.blocks.read();
        let query = query.to_lowercase();

        blocks
            .values()
            .filter(|b| {
                let meta = b.metadata();
                meta.name.to_lowercase().contains(&query)
                    || meta.description.to_lowercase().contains(&query)
                    || meta
                        .categories
                        .iter()
                        .any(|c| c.display_name().to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    /// Get the number of registered blocks
    pub fn count(&self) -> usize {
        let blocks = self.blocks.read();
        blocks.len()
    }

    /// Check if a block with the given id exists
    pub fn contains(&self, id: &BlockId) -> bool {
        let blocks = self.blocks.read();
        blocks.contains_key(id)
    }

    /// Clear all registered blocks
    pub fn clear(&self) {
        let mut blocks = self.blocks.write();
        blocks.clear();
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the block contract before registration
///
/// Rejects empty names or descriptions, duplicated field names, shared
/// container literals used as defaults, and fixtures that expect events
/// the output schema does not declare.
fn validate_block(block: &dyn Block) -> Result<(), RegistryError> {
    let meta = block.metadata();
    let invalid = |reason: String| RegistryError::ValidationError {
        block: meta.name.clone(),
        reason,
    };

    if meta.name.trim().is_empty() {
        return Err(invalid("Block name cannot be empty".into()));
    }

    if meta.description.trim().is_empty() {
        return Err(invalid("Block description cannot be empty".into()));
    }

    for (kind, schema) in [("input", &meta.input_schema), ("output", &meta.output_schema)] {
        let mut seen = HashSet::new();
        if let Some(dup) = schema.names().find(|name| !seen.insert(*name)) {
            return Err(invalid(format!("{} field '{}' is declared twice", kind, dup)));
        }
    }

    if let Some(field) = meta
        .input_schema
        .fields()
        .iter()
        .find(|f| f.default.is_container_literal())
    {
        return Err(invalid(format!(
            "input field '{}' uses a container literal as default, use a factory",
            field.name
        )));
    }

    for (index, fixture) in meta.fixtures.iter().enumerate() {
        if let Some(event) = fixture
            .expected
            .iter()
            .find(|event| !meta.output_schema.contains(&event.field))
        {
            return Err(invalid(format!(
                "fixture {} expects undeclared output '{}'",
                index, event.field
            )));
        }
    }

    Ok(())
}

/// Registry error types
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Block with given id was not found
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    /// Attempted to register a block with duplicate id
    #[error("Duplicate block ID: {0}")]
    DuplicateBlock(BlockId),

    /// Block contract validation failed
    #[error("Validation error in block '{block}': {reason}")]
    ValidationError { block: String, reason: String },
}
