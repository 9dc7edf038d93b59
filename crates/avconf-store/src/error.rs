use std::path::PathBuf;

use crate::codec::CodecError;

/// Errors from storage and session operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested root does not exist or is not a directory.
    #[error("invalid root directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// A scan was requested before any root was set.
    #[error("no root directory has been set")]
    RootNotSet,

    /// A fragment file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file exists but its content could not be decoded as a mapping.
    #[error("malformed content in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Reading a file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the master configuration failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding a mapping for persistence failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
