//! Deep merge and conflict detection over configuration mappings.
//!
//! Two mappings at the same key are merged recursively. Every other pair of
//! values (scalar vs scalar, mapping vs scalar, sequence vs anything) is a
//! conflict, resolved by letting the incoming value overwrite the existing
//! one.

use std::path::PathBuf;

use tracing::debug;

use avconf_types::{ConfigMap, ConfigValue, Fragment, KeyPath};

use crate::conflict::{Conflict, MergeOutcome};
use crate::error::{MergeError, MergeResult};

/// A colliding leaf: the path plus both sides of the collision.
type Collision<'a> = (KeyPath, &'a ConfigValue, &'a ConfigValue);

/// Report every key path present in both `existing` and `incoming` whose
/// values are not both mappings.
///
/// Keys only present in `incoming` never conflict. Paths are returned in
/// `incoming`'s key order, each at most once.
pub fn detect_conflicts(existing: &ConfigMap, incoming: &ConfigMap) -> Vec<KeyPath> {
    let mut found = Vec::new();
    collect_collisions(existing, incoming, &KeyPath::root(), &mut found);
    found.into_iter().map(|(path, _, _)| path).collect()
}

fn collect_collisions<'a>(
    existing: &'a ConfigMap,
    incoming: &'a ConfigMap,
    prefix: &KeyPath,
    out: &mut Vec<Collision<'a>>,
) {
    for (key, new_val) in incoming {
        let Some(old_val) = existing.get(key) else {
            continue;
        };
        let path = prefix.child(key);
        match (old_val, new_val) {
            (ConfigValue::Mapping(old_map), ConfigValue::Mapping(new_map)) => {
                collect_collisions(old_map, new_map, &path, out);
            }
            _ => out.push((path, old_val, new_val)),
        }
    }
}

/// Deep-merge `source` into `target` in place.
///
/// Mappings on both sides are merged recursively; otherwise the value from
/// `source` replaces whatever `target` held.
pub fn deep_merge(target: &mut ConfigMap, source: &ConfigMap) {
    for (key, incoming) in source {
        if let (Some(ConfigValue::Mapping(existing)), ConfigValue::Mapping(inner)) =
            (target.get_mut(key), incoming)
        {
            deep_merge(existing, inner);
            continue;
        }
        target.insert(key.clone(), incoming.clone());
    }
}

/// Merge `fragments`, in the order given, on top of a copy of `master`.
///
/// Each fragment is checked against the accumulated result before it is
/// applied, so collisions with the master and with earlier fragments are both
/// reported. Neither `master` nor any fragment is modified.
pub fn merge(master: &ConfigMap, fragments: &[Fragment]) -> MergeOutcome {
    let mut merged = master.clone();
    let mut conflicts = Vec::new();

    for fragment in fragments {
        let mut collisions = Vec::new();
        collect_collisions(&merged, &fragment.content, &KeyPath::root(), &mut collisions);
        let found = collisions.len();
        conflicts.extend(collisions.into_iter().map(|(path, existing, incoming)| Conflict {
            source: fragment.source.clone(),
            path,
            existing: existing.clone(),
            incoming: incoming.clone(),
        }));

        deep_merge(&mut merged, &fragment.content);
        debug!(
            fragment = %fragment.source.display(),
            keys = fragment.content.len(),
            conflicts = found,
            "applied fragment"
        );
    }

    MergeOutcome { merged, conflicts }
}

/// Merge untyped values, rejecting any input that is not a top-level mapping.
///
/// `fragments` pairs each value with the path it came from; the master is
/// reported as `"master"` in errors.
pub fn merge_values(
    master: &ConfigValue,
    fragments: &[(PathBuf, ConfigValue)],
) -> MergeResult<MergeOutcome> {
    let master = as_top_level(master, "master")?;
    let fragments = fragments
        .iter()
        .map(|(source, value)| {
            let content = as_top_level(value, &source.display().to_string())?;
            Ok(Fragment::new(source.clone(), content.clone()))
        })
        .collect::<MergeResult<Vec<_>>>()?;
    Ok(merge(master, &fragments))
}

fn as_top_level<'a>(value: &'a ConfigValue, input: &str) -> MergeResult<&'a ConfigMap> {
    value.as_mapping().ok_or_else(|| MergeError::NotAMapping {
        input: input.to_string(),
        found: value.kind(),
    })
}
