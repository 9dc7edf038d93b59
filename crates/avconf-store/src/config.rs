use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Subdirectory of the root that holds fragment files.
pub const DEFAULT_FRAGMENTS_SUBDIR: &str = "params/nodes";

/// Where the master configuration lives and where fragments are found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// The master configuration file.
    pub master_path: PathBuf,
    /// Fragment directory, relative to the root.
    pub fragments_subdir: PathBuf,
    /// Root to select at startup, if any.
    pub root: Option<PathBuf>,
}

impl StoreConfig {
    /// The fragment directory under `root`.
    pub fn fragments_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.fragments_subdir)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            master_path: default_master_path(),
            fragments_subdir: PathBuf::from(DEFAULT_FRAGMENTS_SUBDIR),
            root: None,
        }
    }
}

/// `<user config dir>/av_core/av_param.yaml`.
pub fn default_master_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("av_core")
        .join("av_param.yaml")
}
