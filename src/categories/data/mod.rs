//! Data construction blocks
//!
//! Blocks that assemble dictionaries and lists from values known up front.

pub mod create_dictionary;
pub mod create_list;

pub use create_dictionary::CreateDictionaryBlock;
pub use create_list::CreateListBlock;
