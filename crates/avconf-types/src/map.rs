//! String-keyed configuration mapping.
//!
//! Keys are unique per level and kept in a `BTreeMap`, so iteration and
//! serialization order are deterministic regardless of source order.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::path::KeyPath;
use crate::value::ConfigValue;

/// A mapping of string keys to configuration values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap(BTreeMap<String, ConfigValue>);

impl ConfigMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys at this level.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, ConfigValue> {
        self.0.keys()
    }

    /// Resolve a key path by descending through nested mappings.
    ///
    /// The root path resolves to `None`; a path that runs into a non-mapping
    /// value before its last segment also resolves to `None`.
    pub fn get_path(&self, path: &KeyPath) -> Option<&ConfigValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get(segment)?.as_mapping()?;
        }
        current.get(last)
    }

    /// Resolve a dotted path such as `"sensor.lidar.rate"`.
    pub fn get_dotted(&self, dotted: &str) -> Option<&ConfigValue> {
        self.get_path(&KeyPath::parse(dotted))
    }

    /// Total number of leaf (non-mapping) values in the tree.
    pub fn leaf_count(&self) -> usize {
        self.0
            .values()
            .map(|v| match v {
                ConfigValue::Mapping(inner) => inner.leaf_count(),
                _ => 1,
            })
            .sum()
    }
}

impl TryFrom<ConfigValue> for ConfigMap {
    type Error = TypeError;

    fn try_from(value: ConfigValue) -> Result<Self, Self::Error> {
        match value {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(TypeError::NotAMapping { found: other.kind() }),
        }
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigMap {
    fn from(map: BTreeMap<String, ConfigValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, ConfigValue);
    type IntoIter = btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = btree_map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
