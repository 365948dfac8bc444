//! Basic Blocks - Data-shaping blocks for node-based automation graphs
//!
//! This crate provides the block contract (identity, schemas, lazy output
//! event streams), eleven general purpose blocks, a thread-safe registry,
//! and a runner that validates input and checks emitted events.

pub mod config;
pub mod core;
pub mod categories;
pub mod runtime;
mod tests;

// Re-export commonly used types
pub use config::RuntimeConfig;
pub use crate::core::{Block, BlockError, BlockId, BlockMetadata, ExecutionContext};
pub use crate::core::output::{BlockOutput, OutputEvent};
pub use crate::core::registry::BlockRegistry;
pub use categories::BlockCategory;
pub use runtime::BlockRuntime;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
