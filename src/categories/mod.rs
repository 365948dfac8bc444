//! Block categories and classification
//!
//! Blocks live in one submodule per primary category; a block may carry
//! additional category tags in its metadata.

pub mod basic;
pub mod data;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::Block;

/// Block category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockCategory {
    /// General purpose building blocks
    Basic,
    /// Blocks that assemble structured data
    Data,
    /// Blocks handling files and media
    Multimedia,
}

impl BlockCategory {
    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &str {
        match self {
            BlockCategory::Basic => "Basic",
            BlockCategory::Data => "Data",
            BlockCategory::Multimedia => "Multimedia",
        }
    }
}

impl std::fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One instance of every basic block, in a fixed order
pub fn all_blocks() -> Vec<Arc<dyn Block>> {
    vec![
        Arc::new(basic::StoreValueBlock::new()),
        Arc::new(basic::PrintToConsoleBlock::new()),
        Arc::new(basic::FileStoreBlock::new()),
        Arc::new(basic::FindInDictionaryBlock::new()),
        Arc::new(basic::AddToDictionaryBlock::new()),
        Arc::new(basic::AddToListBlock::new()),
        Arc::new(basic::FindInListBlock::new()),
        Arc::new(basic::UniversalTypeConverterBlock::new()),
        Arc::new(basic::NoteBlock::new()),
        Arc::new(data::CreateDictionaryBlock::new()),
        Arc::new(data::CreateListBlock::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_names() {
        assert_eq!(BlockCategory::Multimedia.to_string(), "Multimedia");
        assert_eq!(BlockCategory::Data.display_name(), "Data");
    }

    #[test]
    fn test_all_blocks_have_unique_ids_and_names() {
        let blocks = all_blocks();
        assert_eq!(blocks.len(), 11);

        let ids: HashSet<_> = blocks.iter().map(|b| b.id()).collect();
        let names: HashSet<_> = blocks.iter().map(|b| b.metadata().name.clone()).collect();
        assert_eq!(ids.len(), 11);
        assert_eq!(names.len(), 11);
    }
}
