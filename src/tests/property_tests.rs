//! Property-based tests using proptest.
//!
//! These tests verify invariants that must hold for *any* input, catching
//! edge cases that hand-written tests miss.

use proptest::prelude::*;
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::num::NonZeroUsize;

use crate::categories::basic::add_to_dictionary::merge_entries;
use crate::categories::basic::add_to_list::{insert_entries, splice_index};
use crate::categories::basic::find_in_dictionary::{lookup, LookupKey};
use crate::categories::data::create_list::chunked;
use crate::core::conversion::{Converter, DefaultConverter, TypeOption};
use crate::core::value::loose_eq;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn scalar() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::from),
        any::<i32>().prop_map(JsonValue::from),
        "[a-z]{0,8}".prop_map(JsonValue::from),
    ]
}

fn json_value() -> impl Strategy<Value = JsonValue> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| JsonValue::Object(m.into_iter().collect())),
        ]
    })
}

fn json_map() -> impl Strategy<Value = JsonMap<String, JsonValue>> {
    prop::collection::btree_map("[a-z]{1,4}", json_value(), 0..6).prop_map(|m| m.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Copy-before-mutate
// ---------------------------------------------------------------------------

proptest! {
    /// Merging never changes the caller's dictionary and every batch entry
    /// ends up in the result.
    #[test]
    fn merge_leaves_input_untouched(
        dictionary in json_map(),
        key in "[a-z]{0,4}",
        value in json_value(),
        entries in json_map(),
    ) {
        let before = dictionary.clone();
        let updated = merge_entries(&dictionary, &key, &value, &entries);

        prop_assert_eq!(&dictionary, &before);
        for (k, v) in &entries {
            prop_assert_eq!(updated.get(k), Some(v));
        }
        for (k, v) in &dictionary {
            if !entries.contains_key(k) && !(k == &key && !value.is_null()) {
                prop_assert_eq!(updated.get(k), Some(v));
            }
        }
    }

    /// Insertion never changes the caller's list and grows it by exactly the
    /// batch size.
    #[test]
    fn insert_leaves_input_untouched(
        list in prop::collection::vec(json_value(), 0..8),
        entry in json_value(),
        entries in prop::collection::vec(json_value(), 0..4),
        position in prop::option::of(-12i64..12),
    ) {
        let before = list.clone();
        let updated = insert_entries(&list, &entry, &entries, position);

        prop_assert_eq!(&list, &before);
        let added = entries.len() + usize::from(!entry.is_null());
        prop_assert_eq!(updated.len(), list.len() + added);
    }

    /// The spliced batch sits contiguously at the clamped index, with the
    /// original elements around it in order.
    #[test]
    fn insert_splices_at_clamped_index(
        list in prop::collection::vec(any::<i32>(), 0..8),
        entries in prop::collection::vec(any::<i32>(), 1..4),
        position in -12i64..12,
    ) {
        let list: Vec<JsonValue> = list.into_iter().map(JsonValue::from).collect();
        let entries: Vec<JsonValue> = entries.into_iter().map(JsonValue::from).collect();
        let at = splice_index(list.len(), position);
        prop_assert!(at <= list.len());

        let updated = insert_entries(&list, &JsonValue::Null, &entries, Some(position));
        prop_assert_eq!(&updated[..at], &list[..at]);
        prop_assert_eq!(&updated[at..at + entries.len()], &entries[..]);
        prop_assert_eq!(&updated[at + entries.len()..], &list[at..]);
    }
}

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

proptest! {
    /// Chunks concatenate back to the input, and only the last one may be
    /// shorter than the chunk size.
    #[test]
    fn chunks_concatenate_to_input(
        values in prop::collection::vec(json_value(), 0..40),
        size in 1usize..10,
    ) {
        let chunks: Vec<Vec<JsonValue>> =
            chunked(values.clone(), NonZeroUsize::new(size).unwrap()).collect();

        prop_assert_eq!(chunks.concat(), values.clone());
        prop_assert_eq!(chunks.len(), values.len().div_ceil(size));
        if let Some((last, full)) = chunks.split_last() {
            prop_assert!(full.iter().all(|c| c.len() == size));
            prop_assert!(!last.is_empty() && last.len() <= size);
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

proptest! {
    /// A key present in a dictionary is always found with its exact value.
    #[test]
    fn lookup_finds_present_keys(map in json_map()) {
        let obj = JsonValue::Object(map.clone());
        for (k, v) in &map {
            prop_assert_eq!(lookup(&obj, &LookupKey::Name(k.clone()), true), Some(v.clone()));
        }
    }

    /// In-bounds indexes return the element; out-of-bounds ones miss.
    #[test]
    fn lookup_by_index_matches_get(
        items in prop::collection::vec(json_value(), 0..8),
        index in -4i64..12,
    ) {
        let obj = JsonValue::Array(items.clone());
        let expected = usize::try_from(index).ok().and_then(|i| items.get(i)).cloned();
        prop_assert_eq!(lookup(&obj, &LookupKey::Index(index), true), expected);
    }

    /// Projection over a list of records keeps only records holding the key,
    /// in order.
    #[test]
    fn projection_keeps_order(values in prop::collection::vec(prop::option::of(any::<i32>()), 1..8)) {
        let mut items: Vec<JsonValue> = values
            .iter()
            .map(|v| match v {
                Some(n) => serde_json::json!({"k": n}),
                None => serde_json::json!({"other": 0}),
            })
            .collect();
        // the first element decides the projection rule
        items.insert(0, serde_json::json!({"k": -1}));

        let expected: Vec<JsonValue> = std::iter::once(-1)
            .chain(values.iter().flatten().copied())
            .map(JsonValue::from)
            .collect();
        prop_assert_eq!(
            lookup(&JsonValue::Array(items), &LookupKey::Name("k".into()), false),
            Some(JsonValue::Array(expected))
        );
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

proptest! {
    /// Converting to a type the value already has is the identity for
    /// strings, booleans, lists and dictionaries.
    #[test]
    fn conversion_to_own_type_is_identity(value in json_value()) {
        let target = match &value {
            JsonValue::String(_) => Some(TypeOption::String),
            JsonValue::Bool(_) => Some(TypeOption::Boolean),
            JsonValue::Array(_) => Some(TypeOption::List),
            JsonValue::Object(_) => Some(TypeOption::Dictionary),
            _ => None,
        };
        if let Some(target) = target {
            prop_assert_eq!(DefaultConverter.convert(&value, target), Ok(value.clone()));
        }
    }

    /// Number conversion of an integer keeps its value.
    #[test]
    fn number_conversion_keeps_value(n in any::<i32>()) {
        let converted = DefaultConverter.convert(&JsonValue::from(n), TypeOption::Number).unwrap();
        prop_assert!(loose_eq(&converted, &JsonValue::from(n)));
    }

    /// Every value converts to text and to boolean without error.
    #[test]
    fn text_and_boolean_conversions_are_total(value in json_value()) {
        prop_assert!(DefaultConverter.convert(&value, TypeOption::String).is_ok());
        prop_assert!(DefaultConverter.convert(&value, TypeOption::Boolean).is_ok());
        prop_assert!(DefaultConverter.convert(&value, TypeOption::List).is_ok());
    }
}
