use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },
}
