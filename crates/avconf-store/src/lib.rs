//! Storage collaborators for avconf.
//!
//! Everything around the merge engine that touches the filesystem lives
//! here: decoding fragment files, discovering them under the configured root,
//! and reading and replacing the master configuration.
//!
//! # Components
//!
//! - [`ConfigCodec`] / [`YamlCodec`] -- bytes to [`ConfigMap`](avconf_types::ConfigMap) and back
//! - [`scan_fragments`] -- recursive listing of fragment files
//! - [`MasterStore`] -- load/save of the master configuration, with
//!   [`FileMasterStore`] (atomic replace on disk) and [`InMemoryMasterStore`]
//! - [`Session`] -- the configured root, codec, and master store for one user
//!
//! # Design Rules
//!
//! 1. The master configuration is read fully before use and replaced wholesale.
//! 2. A save never leaves a partially written master file behind.
//! 3. Fragments are decoded fresh on every request; nothing is cached.
//! 4. Malformed fragments are rejected here, before reaching the merge engine.

pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod scanner;
pub mod session;
pub mod traits;

pub use codec::{CodecError, ConfigCodec, YamlCodec};
pub use config::{default_master_path, StoreConfig, DEFAULT_FRAGMENTS_SUBDIR};
pub use error::{StoreError, StoreResult};
pub use file::FileMasterStore;
pub use memory::InMemoryMasterStore;
pub use scanner::scan_fragments;
pub use session::{load_fragment, Preview, Session};
pub use traits::MasterStore;
