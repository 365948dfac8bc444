//! Fixture conformance for every built-in block
//!
//! Each block carries example inputs with the exact event sequence they must
//! produce. These tests run all of them and check the static contract of the
//! block catalogue.

use std::collections::HashSet;

use crate::categories::all_blocks;
use crate::core::block::{BlockType, ExecutionContext};
use crate::core::field::FieldDefault;
use crate::core::registry::BlockRegistry;
use crate::runtime::run_fixtures;

#[tokio::test]
async fn test_every_block_passes_its_fixtures() {
    let context = ExecutionContext::new("conformance");
    let mut total = 0;

    for block in all_blocks() {
        match run_fixtures(&*block, &context).await {
            Ok(count) => total += count,
            Err(e) => panic!("{}", e),
        }
    }

    // 2 + 1 + 0 + 6 + 3 + 4 + 2 + 5 + 1 + 2 + 3
    assert_eq!(total, 29);
}

#[test]
fn test_stable_ids_are_preserved() {
    let expected = [
        ("StoreValueBlock", "1ff065e9-88e8-4358-9d82-8dc91f622ba9"),
        ("PrintToConsoleBlock", "f3b1c1b2-4c4f-4f0d-8d2f-4c4f0d8d2f4c"),
        ("FileStoreBlock", "cbb50872-625b-42f0-8203-a2ae78242d8a"),
        ("FindInDictionaryBlock", "0e50422c-6dee-4145-83d6-3a5a392f65de"),
        ("AddToDictionaryBlock", "31d1064e-7446-4693-a7d4-65e5ca1180d1"),
        ("AddToListBlock", "aeb08fc1-2fc1-4141-bc8e-f758f183a822"),
        ("FindInListBlock", "5e2c6d0a-1e37-489f-b1d0-8e1812b23333"),
        ("UniversalTypeConverterBlock", "95d1b990-ce13-4d88-9737-ba5c2070c97b"),
        ("NoteBlock", "cc10ff7b-7753-4ff2-9af6-9399b1a7eddc"),
        ("CreateDictionaryBlock", "b924ddf4-de4f-4b56-9a85-358930dcbc91"),
        ("CreateListBlock", "a912d5c7-6e00-4542-b2a9-8034136930e4"),
    ];

    let registry = BlockRegistry::with_basic_blocks().unwrap();
    for (name, id) in expected {
        let block = registry
            .get_by_name(name)
            .unwrap_or_else(|| panic!("{} is not registered", name));
        assert_eq!(block.id().to_string(), id, "id of {}", name);
    }
}

#[test]
fn test_container_defaults_are_factories() {
    for block in all_blocks() {
        for field in block.input_schema().fields() {
            assert!(
                !field.default.is_container_literal(),
                "{}.{} shares a container literal",
                block.metadata().name,
                field.name
            );
            if let FieldDefault::Factory(factory) = &field.default {
                assert!(factory().is_array() || factory().is_object());
            }
        }
    }
}

#[test]
fn test_output_names_are_unique_per_block() {
    for block in all_blocks() {
        let names: Vec<&str> = block.output_schema().names().collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len(), "{}", block.metadata().name);
    }
}

#[test]
fn test_static_output_and_kind_flags() {
    let registry = BlockRegistry::with_basic_blocks().unwrap();
    let flag = |name: &str| registry.get_by_name(name).unwrap().metadata().static_output;

    assert!(flag("StoreValueBlock"));
    assert!(flag("FileStoreBlock"));
    assert!(!flag("AddToListBlock"));

    let notes: Vec<_> = all_blocks()
        .into_iter()
        .filter(|b| b.metadata().block_type == BlockType::Note)
        .map(|b| b.metadata().name.clone())
        .collect();
    assert_eq!(notes, vec!["NoteBlock".to_string()]);
}

#[test]
fn test_metadata_serializes_for_hosts() {
    let registry = BlockRegistry::with_basic_blocks().unwrap();
    let block = registry.get_by_name("AddToListBlock").unwrap();
    let json = serde_json::to_value(block.metadata()).unwrap();

    assert_eq!(json["id"], "aeb08fc1-2fc1-4141-bc8e-f758f183a822");
    let list = &json["input_schema"][0];
    assert_eq!(list["name"], "list");
    assert_eq!(list["default"], serde_json::json!([]));
    assert_eq!(json["input_schema"][2]["advanced"], true);
}
