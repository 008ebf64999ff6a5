//! Property-based tests using proptest
//!
//! These tests verify the composite ID codec and the map differ
//! using randomized inputs.

use proptest::prelude::*;
use provflex::flex::{diff_maps, expand_resource_id, flatten_resource_id, resource_id_part_count};
use std::collections::HashMap;

/// Generate a non-empty ID part that cannot contain the separator
fn arb_part() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:/_ .-]{1,24}"
}

/// Generate between 2 and 8 parts
fn arb_parts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_part(), 2..8)
}

/// Generate parts where some may be blank
fn arb_parts_with_blanks() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![arb_part(), Just(String::new())], 2..8)
}

/// Generate a small string map with overlapping key space
fn arb_map() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map("[a-f]", "[0-3]", 0..6)
}

proptest! {
    /// Flattening then expanding gives back the original parts
    #[test]
    fn id_round_trip(parts in arb_parts()) {
        let id = flatten_resource_id(&parts, parts.len(), false).unwrap();
        prop_assert_eq!(resource_id_part_count(&id), parts.len());
        prop_assert_eq!(expand_resource_id(&id, parts.len(), false).unwrap(), parts);
    }

    /// Blank parts round-trip when allowed
    #[test]
    fn id_round_trip_with_blanks(parts in arb_parts_with_blanks()) {
        let id = flatten_resource_id(&parts, parts.len(), true).unwrap();
        prop_assert_eq!(expand_resource_id(&id, parts.len(), true).unwrap(), parts);
    }

    /// When blanks are disallowed, the reported indexes are exactly the blank parts
    #[test]
    fn blank_indexes_are_reported(parts in arb_parts_with_blanks()) {
        let expected: Vec<usize> = parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_empty())
            .map(|(i, _)| i)
            .collect();

        match flatten_resource_id(&parts, parts.len(), false) {
            Ok(_) => prop_assert!(expected.is_empty()),
            Err(err) => prop_assert_eq!(err.blank_indexes(), expected.as_slice()),
        }
    }

    /// Any count other than the real one is rejected
    #[test]
    fn wrong_count_is_rejected(parts in arb_parts(), delta in 1usize..4) {
        prop_assert!(flatten_resource_id(&parts, parts.len() + delta, false).is_err());
        let id = parts.join(",");
        prop_assert!(expand_resource_id(&id, parts.len() + delta, false).is_err());
    }

    /// Every old key lands in exactly one of remove/unchanged
    #[test]
    fn old_keys_partitioned(old in arb_map(), new in arb_map()) {
        let delta = diff_maps(&old, &new);
        for (k, v) in &old {
            let in_remove = delta.remove.get(k) == Some(v);
            let in_unchanged = delta.unchanged.get(k) == Some(v);
            prop_assert!(in_remove ^ in_unchanged);
        }
        prop_assert_eq!(delta.remove.len() + delta.unchanged.len(), old.len());
    }

    /// Every new key is either unchanged or still to be added with its new value
    #[test]
    fn new_keys_covered(old in arb_map(), new in arb_map()) {
        let delta = diff_maps(&old, &new);
        for (k, v) in &new {
            if delta.unchanged.contains_key(k) {
                prop_assert!(!delta.add.contains_key(k));
            } else {
                prop_assert_eq!(delta.add.get(k), Some(v));
            }
        }
        prop_assert!(delta.add.keys().all(|k| new.contains_key(k)));
    }

    /// Applying the delta to the old map yields the new map
    #[test]
    fn delta_applies_cleanly(old in arb_map(), new in arb_map()) {
        let delta = diff_maps(&old, &new);
        let mut applied = old.clone();
        for k in delta.remove.keys() {
            applied.remove(k);
        }
        applied.extend(delta.add.clone());
        prop_assert_eq!(applied, new);
    }
}
