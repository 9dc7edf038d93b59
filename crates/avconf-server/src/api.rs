//! Request and response bodies for the JSON API.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use avconf_merge::{Conflict, MapDiff};
use avconf_types::{ConfigMap, FragmentDescriptor};

/// Generic success/failure acknowledgement; also the error body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub master: String,
    pub fragments_subdir: PathBuf,
    pub root: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SetRootRequest {
    #[serde(default)]
    pub root_path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScanResponse {
    pub files: Vec<FragmentDescriptor>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PreviewQuery {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PreviewFileResponse {
    pub path: PathBuf,
    pub content: ConfigMap,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub file_paths: Vec<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MergeResponse {
    /// The merged mapping, master included.
    pub content: ConfigMap,
    /// `"<file name>: <dotted path>"` lines.
    pub conflicts: Vec<String>,
    pub conflict_details: Vec<Conflict>,
    pub changes: MapDiff,
    /// Fragments in the order they were applied.
    pub fragments: Vec<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SaveRequest {
    pub content: ConfigMap,
}

#[derive(Clone, Debug, Serialize)]
pub struct MasterResponse {
    pub config: ConfigMap,
}
