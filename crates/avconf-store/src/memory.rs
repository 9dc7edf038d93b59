use std::sync::RwLock;

use avconf_types::ConfigMap;

use crate::error::StoreResult;
use crate::traits::MasterStore;

/// In-memory master configuration.
///
/// Intended for tests and embedding. The mapping is held behind a `RwLock`
/// and cloned on load and save.
#[derive(Debug, Default)]
pub struct InMemoryMasterStore {
    config: RwLock<ConfigMap>,
}

impl InMemoryMasterStore {
    /// Create a store holding an empty master.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `config`.
    pub fn with_config(config: ConfigMap) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl MasterStore for InMemoryMasterStore {
    fn load(&self) -> StoreResult<ConfigMap> {
        Ok(self.config.read().expect("lock poisoned").clone())
    }

    fn save(&self, config: &ConfigMap) -> StoreResult<()> {
        *self.config.write().expect("lock poisoned") = config.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
