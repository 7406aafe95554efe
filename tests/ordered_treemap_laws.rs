//! Property-based tests for OrderedTreeMap.
//!
//! This module verifies that OrderedTreeMap agrees with the standard
//! library's `BTreeMap` as a reference model, for every insertion order a
//! strategy can produce, including the sorted orders that degenerate the
//! tree into a list.

use duomap::map::OrderedTreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Strategy for generating test data
// =============================================================================

fn arbitrary_key() -> impl Strategy<Value = i32> {
    -1000..1000i32
}

fn arbitrary_value() -> impl Strategy<Value = u8> {
    any::<u8>()
}

fn arbitrary_entries() -> impl Strategy<Value = Vec<(i32, u8)>> {
    prop::collection::vec((arbitrary_key(), arbitrary_value()), 0..60)
}

// =============================================================================
// Get-Insert Law: map.insert(k, v) implies map.get(&k) == Some(&v)
// =============================================================================

proptest! {
    #[test]
    fn prop_get_insert_law(
        entries in arbitrary_entries(),
        key in arbitrary_key(),
        value in arbitrary_value()
    ) {
        let mut map: OrderedTreeMap<i32, u8> = entries.into_iter().collect();
        map.insert(key, value);

        prop_assert_eq!(map.get(&key), Some(&value));
        prop_assert!(map.contains_key(&key));
    }
}

// =============================================================================
// Insert-Other Law: inserting k1 leaves every other key's value alone
// =============================================================================

proptest! {
    #[test]
    fn prop_get_insert_other_law(
        entries in arbitrary_entries(),
        key1 in arbitrary_key(),
        key2 in arbitrary_key(),
        value in arbitrary_value()
    ) {
        prop_assume!(key1 != key2);

        let mut map: OrderedTreeMap<i32, u8> = entries.into_iter().collect();
        let before = map.get(&key2).copied();
        map.insert(key1, value);

        prop_assert_eq!(map.get(&key2).copied(), before);
    }
}

// =============================================================================
// Model Agreement: arbitrary workloads match std BTreeMap
// =============================================================================

proptest! {
    #[test]
    fn prop_agrees_with_std_btreemap(entries in arbitrary_entries()) {
        let mut map: OrderedTreeMap<i32, u8> = OrderedTreeMap::new();
        let mut model: BTreeMap<i32, u8> = BTreeMap::new();

        for (key, value) in entries {
            prop_assert_eq!(map.insert(key, value), model.insert(key, value));
            prop_assert_eq!(map.len(), model.len());
        }

        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
    }
}

// =============================================================================
// Ordered Iteration Law: iteration matches the model's sorted order exactly
// =============================================================================

proptest! {
    #[test]
    fn prop_iteration_is_sorted(entries in arbitrary_entries()) {
        let map: OrderedTreeMap<i32, u8> = entries.clone().into_iter().collect();
        let model: BTreeMap<i32, u8> = entries.into_iter().collect();

        let map_entries: Vec<(i32, u8)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let model_entries: Vec<(i32, u8)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(map_entries, model_entries);
    }
}

// =============================================================================
// Min/Max Law
// =============================================================================

proptest! {
    #[test]
    fn prop_min_max_match_model(entries in arbitrary_entries()) {
        let map: OrderedTreeMap<i32, u8> = entries.clone().into_iter().collect();
        let model: BTreeMap<i32, u8> = entries.into_iter().collect();

        prop_assert_eq!(map.min(), model.first_key_value());
        prop_assert_eq!(map.max(), model.last_key_value());
    }
}

// =============================================================================
// Key Set Law: key_set has len() elements, all of them contained
// =============================================================================

proptest! {
    #[test]
    fn prop_key_set_completeness(entries in arbitrary_entries()) {
        let map: OrderedTreeMap<i32, u8> = entries.into_iter().collect();

        let keys = map.key_set();
        prop_assert_eq!(keys.len(), map.len());
        for key in &keys {
            prop_assert!(map.contains_key(key));
        }
    }
}

// =============================================================================
// Clear Law
// =============================================================================

proptest! {
    #[test]
    fn prop_clear_forgets_everything(entries in arbitrary_entries()) {
        let keys: Vec<i32> = entries.iter().map(|(key, _)| *key).collect();
        let mut map: OrderedTreeMap<i32, u8> = entries.into_iter().collect();

        map.clear();
        prop_assert_eq!(map.len(), 0);
        for key in keys {
            prop_assert_eq!(map.get(&key), None);
        }
    }
}
