use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::map::ConfigMap;

/// A configuration mapping loaded from exactly one source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// The file the mapping was parsed from.
    pub source: PathBuf,
    /// The parsed top-level mapping.
    pub content: ConfigMap,
}

impl Fragment {
    pub fn new(source: impl Into<PathBuf>, content: ConfigMap) -> Self {
        Self {
            source: source.into(),
            content,
        }
    }

    /// File name used in human-readable conflict reports.
    ///
    /// Falls back to the full path when it has no final component.
    pub fn name(&self) -> String {
        display_name(&self.source)
    }
}

/// Listing entry for a fragment file discovered under the configured root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentDescriptor {
    /// Absolute (or root-joined) path to the file.
    pub path: PathBuf,
    /// Path relative to the scanned fragments directory.
    pub relative_path: String,
    /// Final path component.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
}

/// Final component of `path`, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
