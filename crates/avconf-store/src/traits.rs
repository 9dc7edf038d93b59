use avconf_types::ConfigMap;

use crate::error::StoreResult;

/// Persistence for the master configuration.
///
/// All implementations must satisfy these invariants:
/// - `load` returns the whole mapping; a master that was never saved loads
///   as an empty mapping.
/// - `save` replaces the master wholesale. Keys absent from the saved
///   mapping are gone afterwards.
/// - A failed `save` leaves the previous master intact.
pub trait MasterStore: Send + Sync {
    /// Read the current master configuration.
    fn load(&self) -> StoreResult<ConfigMap>;

    /// Replace the master configuration.
    fn save(&self, config: &ConfigMap) -> StoreResult<()>;

    /// Human-readable location, for status output.
    fn location(&self) -> String;
}
