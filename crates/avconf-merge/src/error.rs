//! Error types for the merge crate.

/// Errors that can occur when handing untyped values to the merge engine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MergeError {
    /// A merge input was not a mapping at the top level.
    #[error("{input} is not a mapping at the top level (found {found})")]
    NotAMapping { input: String, found: &'static str },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
