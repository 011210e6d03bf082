use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StorageError;

/// Key-keyed durable JSON store. Each key maps to one file in the bound
/// directory; every write replaces the whole value for that key.
#[derive(Debug)]
pub struct PersistentStore {
    dir: PathBuf,
}

impl PersistentStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Platform data directory for the app, used when no explicit location is
    /// configured.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wallflix")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads the stored value for `key`. A missing or unreadable entry yields
    /// the caller's default instead of an error.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.key_path(key);
        let Ok(raw) = fs::read_to_string(&path) else {
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored '{}' entry is unreadable ({}), using default", key, e);
                default
            }
        }
    }

    /// Persists `value` under `key`, replacing any prior content. The file is
    /// written to a temp path first and renamed so readers never see a
    /// partial write.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let encoded = serde_json::to_vec(value)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, encoded)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}
