//! Merge engine for avconf.
//!
//! Folds an ordered list of configuration fragments into a master mapping
//! and reports every key path where an incoming value overwrote an existing
//! one. The engine is pure: it never performs I/O and never mutates its
//! inputs. Conflicts are advisory; callers decide whether to persist.
//!
//! # Key Types
//!
//! - [`merge`] / [`MergeOutcome`] -- Deep merge with last-writer-wins leaves
//! - [`detect_conflicts`] / [`Conflict`] -- Colliding key paths
//! - [`diff_maps`] / [`MapDiff`] / [`MapChange`] -- Leaf-level change set between two mappings

pub mod conflict;
pub mod diff;
pub mod engine;
pub mod error;

pub use conflict::{Conflict, MergeOutcome};
pub use diff::{diff_maps, MapChange, MapDiff};
pub use engine::{deep_merge, detect_conflicts, merge, merge_values};
pub use error::{MergeError, MergeResult};
