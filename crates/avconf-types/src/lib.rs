//! Foundation types for avconf.
//!
//! This crate provides the in-memory configuration model shared by the merge
//! engine, the storage collaborators, and the HTTP surface. Every other avconf
//! crate depends on `avconf-types`.
//!
//! # Key Types
//!
//! - [`ConfigValue`] — Tagged value: scalar, sequence, or nested mapping
//! - [`Scalar`] — Null, boolean, integer, float, or string leaf
//! - [`ConfigMap`] — String-keyed mapping of configuration values
//! - [`KeyPath`] — Dotted path addressing a value inside a mapping
//! - [`Fragment`] — A mapping tagged with the file it was loaded from
//! - [`FragmentDescriptor`] — Listing entry for a discoverable fragment file

pub mod error;
pub mod fragment;
pub mod map;
pub mod path;
pub mod value;

pub use error::TypeError;
pub use fragment::{Fragment, FragmentDescriptor};
pub use map::ConfigMap;
pub use path::KeyPath;
pub use value::{ConfigValue, Scalar};
