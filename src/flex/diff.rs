//! Map and set differencing for reconciliation passes

use crate::error::ValueError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::expand::expand_string_map;

/// Result of comparing an old mapping against a new one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapDelta<K: Eq + Hash, V> {
    /// Entries that must be created
    pub add: HashMap<K, V>,
    /// Entries that must be destroyed, carrying their old values
    pub remove: HashMap<K, V>,
    /// Entries present in both with equal values
    pub unchanged: HashMap<K, V>,
}

impl<K: Eq + Hash, V> MapDelta<K, V> {
    /// True when nothing needs to be added or removed
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Compute the add/remove/unchanged partitions between `old` and `new`
///
/// A key whose value changed appears in `remove` with its old value and in
/// `add` with its new value.
pub fn diff_maps<K, V>(old: &HashMap<K, V>, new: &HashMap<K, V>) -> MapDelta<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    // Start by creating everything we have
    let mut add = new.clone();
    let mut remove = HashMap::new();
    let mut unchanged = HashMap::new();

    for (k, v) in old {
        match add.get(k) {
            Some(current) if current == v => {
                unchanged.insert(k.clone(), v.clone());
                add.remove(k);
            }
            _ => {
                remove.insert(k.clone(), v.clone());
            }
        }
    }

    MapDelta {
        add,
        remove,
        unchanged,
    }
}

/// Diff two attribute maps whose values must all be strings
pub fn diff_string_maps(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
) -> Result<MapDelta<String, String>, ValueError> {
    let old = expand_string_map(old)?;
    let new = expand_string_map(new)?;

    let delta = diff_maps(&old, &new);
    tracing::debug!(
        "map diff: {} to add, {} to remove, {} unchanged",
        delta.add.len(),
        delta.remove.len(),
        delta.unchanged.len()
    );

    Ok(delta)
}

/// Elements of `items` that do not appear in `other`, in `items` order
pub fn difference<T>(items: &[T], other: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let exclude: HashSet<&T> = other.iter().collect();
    items
        .iter()
        .filter(|item| !exclude.contains(item))
        .cloned()
        .collect()
}
