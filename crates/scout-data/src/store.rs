//! JSON file snapshot store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use scout_core::{SnapshotStore, StoreError};

/// Snapshot store backed by one JSON file per key.
///
/// Replacement writes a temp file in the same directory and renames it
/// over the target, so a crash mid-write never leaves a torn snapshot.
/// Appends go to a `.jsonl` file, one record per line.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn snapshot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn log_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.jsonl"))
    }
}

impl SnapshotStore for JsonStore {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw = match fs::read_to_string(self.snapshot_path(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let value = serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn replace<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.snapshot_path(key))?;
        debug!(key, "snapshot replaced");
        Ok(())
    }

    fn append<T: Serialize + ?Sized>(&self, key: &str, item: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(item).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(key))?;
        writeln!(file, "{json}")?;
        Ok(())
    }
}
