//! Snapshot persistence trait.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Well-known store keys used across cycles.
pub mod keys {
    /// Per-symbol consistency records
    pub const CONSISTENCY: &str = "consistency";
    /// Latest cycle's top signals
    pub const SIGNALS: &str = "signals";
    /// Forward-test trade list
    pub const TRADES: &str = "trades";
    /// Append-only log of high-quality signals
    pub const AUDIT: &str = "audit_log";
}

/// Key-value snapshot store with read-all / replace-all / append-log
/// semantics. No partial-record updates exist: a cycle reads a whole
/// snapshot once at start and replaces it once at end.
///
/// Corrupt or missing data surfaces as an error that load sites degrade
/// to empty state, so the scanner can always cold-start from nothing.
pub trait SnapshotStore: Send + Sync {
    /// Read a whole snapshot. `Ok(None)` means the key has never been
    /// written.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;

    /// Atomically replace a whole snapshot.
    fn replace<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError>;

    /// Append one record to an immutable log.
    fn append<T: Serialize + ?Sized>(&self, key: &str, item: &T) -> Result<(), StoreError>;
}

// Scanner and tracker persist through the same store handle.
impl<S: SnapshotStore> SnapshotStore for std::sync::Arc<S> {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        (**self).read(key)
    }

    fn replace<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        (**self).replace(key, value)
    }

    fn append<T: Serialize + ?Sized>(&self, key: &str, item: &T) -> Result<(), StoreError> {
        (**self).append(key, item)
    }
}
