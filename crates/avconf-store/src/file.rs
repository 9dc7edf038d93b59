use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use avconf_types::ConfigMap;

use crate::codec::{ConfigCodec, YamlCodec};
use crate::error::{StoreError, StoreResult};
use crate::traits::MasterStore;

/// Master configuration stored in a single file.
///
/// Saves write a temporary file next to the master and rename it into place,
/// so readers see either the old or the new document, never a partial one.
pub struct FileMasterStore {
    path: PathBuf,
    codec: Arc<dyn ConfigCodec>,
}

impl FileMasterStore {
    /// A YAML master at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_codec(path, Arc::new(YamlCodec))
    }

    pub fn with_codec(path: impl Into<PathBuf>, codec: Arc<dyn ConfigCodec>) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl MasterStore for FileMasterStore {
    fn load(&self) -> StoreResult<ConfigMap> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "master configuration absent, using empty mapping");
                return Ok(ConfigMap::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.codec
            .decode(&bytes)
            .map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, config: &ConfigMap) -> StoreResult<()> {
        let bytes = self.codec.encode(config)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(&bytes).map_err(|e| self.write_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        info!(
            path = %self.path.display(),
            keys = config.len(),
            bytes = bytes.len(),
            "saved master configuration"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl std::fmt::Debug for FileMasterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMasterStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: serde_json::Value) -> ConfigMap {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMasterStore::new(dir.path().join("absent.yaml"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("av_core").join("av_param.yaml");
        let store = FileMasterStore::new(&path);
        let config = map(json!({"lidar": {"rate": 10}, "enabled": true}));

        store.save(&config).unwrap();
        assert!(path.is_file());
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMasterStore::new(dir.path().join("m.yaml"));
        store.save(&map(json!({"old": 1, "shared": {"a": 1}}))).unwrap();
        store.save(&map(json!({"shared": {"b": 2}}))).unwrap();
        assert_eq!(store.load().unwrap(), map(json!({"shared": {"b": 2}})));
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMasterStore::new(dir.path().join("m.yaml"));
        store.save(&map(json!({"a": 1}))).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    /// Decodes YAML but refuses to encode anything.
    struct RejectingCodec;

    impl ConfigCodec for RejectingCodec {
        fn decode(&self, bytes: &[u8]) -> Result<ConfigMap, crate::CodecError> {
            YamlCodec.decode(bytes)
        }

        fn encode(&self, _map: &ConfigMap) -> Result<Vec<u8>, crate::CodecError> {
            Err(crate::CodecError::Encode("rejected".into()))
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["yaml"]
        }
    }

    #[test]
    fn failed_encode_keeps_previous_master() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.yaml");
        let old = map(json!({"lidar": {"rate": 10}}));
        FileMasterStore::new(&path).save(&old).unwrap();

        let store = FileMasterStore::with_codec(&path, Arc::new(RejectingCodec));
        assert!(store.save(&map(json!({"new": 1}))).is_err());
        assert_eq!(store.load().unwrap(), old);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_rename_keeps_target_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.yaml");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "old").unwrap();

        let err = FileMasterStore::new(&path).save(&map(json!({"a": 1}))).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(fs::read_to_string(path.join("keep.txt")).unwrap(), "old");
        // Only the directory itself remains; the temporary file is gone.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn malformed_master_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.yaml");
        fs::write(&path, "- not\n- a mapping\n").unwrap();
        let err = FileMasterStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn location_is_path() {
        let store = FileMasterStore::new("/etc/av/master.yaml");
        assert_eq!(store.location(), "/etc/av/master.yaml");
        assert_eq!(store.path(), Path::new("/etc/av/master.yaml"));
    }
}
