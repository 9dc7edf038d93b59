//! Conversion between file bytes and configuration mappings.

use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use avconf_types::{ConfigMap, ConfigValue, Scalar};

/// Errors produced while decoding or encoding a mapping.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The bytes are not valid in the codec's format.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The document parsed, but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },

    /// A mapping key cannot be represented as a string.
    #[error("unsupported mapping key of type {0}")]
    UnsupportedKey(&'static str),

    /// Two distinct keys have the same string form (`1:` and `'1':`).
    #[error("duplicate key after stringification: {0}")]
    DuplicateKey(String),

    /// The mapping could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Parses file bytes into a [`ConfigMap`] and serializes one back.
///
/// The merge engine never sees the on-disk format; implementations are
/// swapped without touching it.
pub trait ConfigCodec: Send + Sync {
    /// Decode a document whose top level must be a mapping.
    ///
    /// An empty document decodes to an empty mapping.
    fn decode(&self, bytes: &[u8]) -> Result<ConfigMap, CodecError>;

    /// Encode a mapping as a complete document.
    fn encode(&self, map: &ConfigMap) -> Result<Vec<u8>, CodecError>;

    /// File extensions (without the dot) this codec reads.
    fn extensions(&self) -> &'static [&'static str];
}

/// YAML codec backed by `serde_yaml`.
///
/// Non-string scalar keys (`1:`, `true:`, `~:`) are converted to their string
/// form; keys that collide once stringified are rejected. YAML tags are
/// dropped and the tagged value is kept. Merge keys (`<<: *anchor`) are
/// expanded before conversion.
///
/// Parsing follows YAML 1.2: `yes`, `no`, `on` and `off` are strings, not
/// booleans. Write `true`/`false` where a boolean is meant.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl ConfigCodec for YamlCodec {
    fn decode(&self, bytes: &[u8]) -> Result<ConfigMap, CodecError> {
        let mut documents = serde_yaml::Deserializer::from_slice(bytes);
        let Some(first) = documents.next() else {
            return Ok(ConfigMap::new());
        };
        let mut doc = YamlValue::deserialize(first).map_err(|e| CodecError::Syntax(e.to_string()))?;
        if documents.next().is_some() {
            return Err(CodecError::Syntax("multiple documents in one file".to_string()));
        }
        doc.apply_merge().map_err(|e| CodecError::Syntax(e.to_string()))?;
        match from_yaml(doc)? {
            ConfigValue::Mapping(map) => Ok(map),
            ConfigValue::Scalar(Scalar::Null) => Ok(ConfigMap::new()),
            other => Err(CodecError::NotAMapping { found: other.kind() }),
        }
    }

    fn encode(&self, map: &ConfigMap) -> Result<Vec<u8>, CodecError> {
        serde_yaml::to_string(map)
            .map(String::into_bytes)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }
}

fn from_yaml(value: YamlValue) -> Result<ConfigValue, CodecError> {
    Ok(match value {
        YamlValue::Null => ConfigValue::null(),
        YamlValue::Bool(b) => ConfigValue::from(b),
        YamlValue::Number(n) => from_number(&n),
        YamlValue::String(s) => ConfigValue::from(s),
        YamlValue::Sequence(items) => ConfigValue::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(entries) => {
            let mut map = ConfigMap::new();
            for (key, value) in entries {
                let key = key_string(key)?;
                if map.contains_key(&key) {
                    return Err(CodecError::DuplicateKey(key));
                }
                map.insert(key, from_yaml(value)?);
            }
            ConfigValue::Mapping(map)
        }
        YamlValue::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn from_number(n: &serde_yaml::Number) -> ConfigValue {
    if let Some(i) = n.as_i64() {
        ConfigValue::from(i)
    } else if let Some(u) = n.as_u64() {
        // Above i64::MAX; keep the magnitude.
        ConfigValue::from(u as f64)
    } else {
        ConfigValue::from(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn key_string(key: YamlValue) -> Result<String, CodecError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => key_string(tagged.value),
        YamlValue::Sequence(_) => Err(CodecError::UnsupportedKey("sequence")),
        YamlValue::Mapping(_) => Err(CodecError::UnsupportedKey("mapping")),
    }
}
