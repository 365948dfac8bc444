//! Core block abstractions and types
//!
//! This module defines the block contract shared by every variant: stable
//! identifiers, field descriptors and schemas, the output event stream, and
//! the collaborators a block may call while running.

pub mod block;
pub mod conversion;
pub mod field;
pub mod output;
pub mod registry;
pub mod schema;
pub mod storage;
pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext, Fixture};

/// Stable identifier for a block
///
/// Persisted graphs refer to blocks by this id, so it never changes once a
/// block has shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Wrap a fixed UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        BlockId(uuid)
    }

    /// Parse an id from its hyphenated text form
    pub fn parse(text: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(text).map(BlockId)
    }

    /// Generate a fresh random id (for ad-hoc blocks in tests and hosts)
    pub fn random() -> Self {
        BlockId(Uuid::new_v4())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
