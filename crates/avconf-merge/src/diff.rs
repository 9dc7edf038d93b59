//! Leaf-level diff between two configuration mappings.
//!
//! Nested mappings present on both sides are descended rather than compared
//! whole, so a change deep inside a tree is reported at its full dotted path.
//! A mapping replaced by a non-mapping (or the reverse) is one `Modified`
//! change at the path where the shapes diverge.

use serde::Serialize;

use avconf_types::{ConfigMap, ConfigValue, KeyPath};

/// The result of comparing two mappings.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MapDiff {
    /// Changes ordered by key path.
    pub changes: Vec<MapChange>,
}

impl MapDiff {
    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of added paths.
    pub fn additions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, MapChange::Added { .. }))
            .count()
    }

    /// Number of removed paths.
    pub fn removals(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, MapChange::Removed { .. }))
            .count()
    }

    /// Number of modified paths.
    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, MapChange::Modified { .. }))
            .count()
    }
}

/// A single change between two mappings.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum MapChange {
    /// A path present only in the new mapping.
    Added { path: KeyPath, value: ConfigValue },
    /// A path present only in the old mapping.
    Removed { path: KeyPath, value: ConfigValue },
    /// A path present in both with different values.
    Modified {
        path: KeyPath,
        old: ConfigValue,
        new: ConfigValue,
    },
}

impl MapChange {
    pub fn path(&self) -> &KeyPath {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Modified { path, .. } => path,
        }
    }
}

/// Compute the diff from `old` to `new`.
pub fn diff_maps(old: &ConfigMap, new: &ConfigMap) -> MapDiff {
    let mut changes = Vec::new();
    walk(old, new, &KeyPath::root(), &mut changes);
    changes.sort_by(|a, b| a.path().cmp(b.path()));
    MapDiff { changes }
}

fn walk(old: &ConfigMap, new: &ConfigMap, prefix: &KeyPath, changes: &mut Vec<MapChange>) {
    // Removed and modified paths.
    for (key, old_val) in old {
        let path = prefix.child(key);
        match new.get(key) {
            Some(new_val) => match (old_val, new_val) {
                (ConfigValue::Mapping(old_map), ConfigValue::Mapping(new_map)) => {
                    walk(old_map, new_map, &path, changes);
                }
                _ if old_val != new_val => changes.push(MapChange::Modified {
                    path,
                    old: old_val.clone(),
                    new: new_val.clone(),
                }),
                _ => {}
            },
            None => changes.push(MapChange::Removed {
                path,
                value: old_val.clone(),
            }),
        }
    }

    // Added paths.
    for (key, new_val) in new {
        if !old.contains_key(key) {
            changes.push(MapChange::Added {
                path: prefix.child(key),
                value: new_val.clone(),
            });
        }
    }
}
