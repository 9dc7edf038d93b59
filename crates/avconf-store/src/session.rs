//! Per-user session state: the selected root, the codec, and the master store.
//!
//! A [`Session`] is passed explicitly to everything that scans, loads, or
//! persists. There is no process-wide "current root".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use avconf_merge::{diff_maps, merge, MapDiff, MergeOutcome};
use avconf_types::{ConfigMap, Fragment, FragmentDescriptor};

use crate::codec::{ConfigCodec, YamlCodec};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::file::FileMasterStore;
use crate::scanner::scan_fragments;
use crate::traits::MasterStore;

/// Read and decode one fragment file.
pub fn load_fragment(codec: &dyn ConfigCodec, path: &Path) -> StoreResult<Fragment> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let content = codec
        .decode(&bytes)
        .map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Fragment::new(path, content))
}

/// A merge computed against the current master, not yet persisted.
#[derive(Clone, Debug, Serialize)]
pub struct Preview {
    /// Fragment paths in the order they were applied.
    pub fragments: Vec<PathBuf>,
    /// Merged mapping and conflicts.
    pub outcome: MergeOutcome,
    /// What saving `outcome.merged` would change in the master.
    pub changes: MapDiff,
}

/// The configured root plus the collaborators that read and write under it.
pub struct Session {
    config: StoreConfig,
    root: Option<PathBuf>,
    codec: Arc<dyn ConfigCodec>,
    master: Arc<dyn MasterStore>,
}

impl Session {
    /// A YAML session with the master file from `config`.
    ///
    /// `config.root` is not applied here; call [`Session::set_root`] so an
    /// invalid root surfaces as an error.
    pub fn new(config: StoreConfig) -> Self {
        let master = Arc::new(FileMasterStore::new(config.master_path.clone()));
        Self::with_parts(config, Arc::new(YamlCodec), master)
    }

    pub fn with_parts(
        config: StoreConfig,
        codec: Arc<dyn ConfigCodec>,
        master: Arc<dyn MasterStore>,
    ) -> Self {
        Self {
            config,
            root: None,
            codec,
            master,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn master_store(&self) -> &Arc<dyn MasterStore> {
        &self.master
    }

    /// Validate and select the root directory for subsequent scans.
    ///
    /// On failure the previous root stays selected.
    pub fn set_root(&mut self, path: impl AsRef<Path>) -> StoreResult<&Path> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(StoreError::InvalidRoot(path.to_path_buf()));
        }
        info!(root = %path.display(), "root directory set");
        Ok(self.root.insert(path.to_path_buf()).as_path())
    }

    /// The fragment directory under the selected root.
    pub fn fragments_dir(&self) -> StoreResult<PathBuf> {
        let root = self.root().ok_or(StoreError::RootNotSet)?;
        Ok(self.config.fragments_dir(root))
    }

    /// List fragment files under the selected root.
    pub fn scan(&self) -> StoreResult<Vec<FragmentDescriptor>> {
        let dir = self.fragments_dir()?;
        Ok(scan_fragments(&dir, self.codec.extensions()))
    }

    /// Decode a single fragment for display.
    pub fn load_fragment(&self, path: &Path) -> StoreResult<Fragment> {
        load_fragment(self.codec.as_ref(), path)
    }

    pub fn load_master(&self) -> StoreResult<ConfigMap> {
        self.master.load()
    }

    /// Replace the master configuration with `config`.
    pub fn save_master(&self, config: &ConfigMap) -> StoreResult<()> {
        self.master.save(config)
    }

    /// Merge the selected fragments on top of the current master.
    ///
    /// Paths are sorted and de-duplicated first, so the result does not
    /// depend on the order the caller listed them in. Any fragment that fails
    /// to load aborts the preview.
    pub fn merge_preview(&self, paths: &[PathBuf]) -> StoreResult<Preview> {
        let mut ordered = paths.to_vec();
        ordered.sort();
        ordered.dedup();

        let fragments = ordered
            .iter()
            .map(|path| self.load_fragment(path))
            .collect::<StoreResult<Vec<_>>>()?;
        let master = self.load_master()?;

        let outcome = merge(&master, &fragments);
        let changes = diff_maps(&master, &outcome.merged);
        debug!(
            fragments = fragments.len(),
            conflicts = outcome.conflicts.len(),
            changes = changes.len(),
            "computed merge preview"
        );

        Ok(Preview {
            fragments: ordered,
            outcome,
            changes,
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("root", &self.root)
            .field("fragments_subdir", &self.config.fragments_subdir)
            .field("master", &self.master.location())
            .finish()
    }
}
