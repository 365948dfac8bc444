//! Basic blocks
//!
//! General purpose blocks for forwarding values, inspecting and updating
//! dictionaries and lists, converting between value types, and annotating
//! graphs.

pub mod add_to_dictionary;
pub mod add_to_list;
pub mod file_store;
pub mod find_in_dictionary;
pub mod find_in_list;
pub mod note;
pub mod print_to_console;
pub mod store_value;
pub mod type_converter;

pub use add_to_dictionary::AddToDictionaryBlock;
pub use add_to_list::AddToListBlock;
pub use file_store::FileStoreBlock;
pub use find_in_dictionary::FindInDictionaryBlock;
pub use find_in_list::FindInListBlock;
pub use note::NoteBlock;
pub use print_to_console::PrintToConsoleBlock;
pub use store_value::StoreValueBlock;
pub use type_converter::UniversalTypeConverterBlock;
