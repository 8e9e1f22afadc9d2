use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::errors::StorageError;

/// String key-value storage local to this device.
///
/// Mirrors the semantics of a mobile app's async storage: values are plain
/// strings, a missing key reads as `None`, and removing a missing key is
/// not an error.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, for tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON-file backed store at `~/.ballot/store.json`.
///
/// Every operation reads the file; writes rewrite it whole. The file is a
/// flat JSON object of string values.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, honouring `BALLOT_STORE_FILE`.
    pub fn open_default() -> Self {
        Self::new(store_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                tracing::error!(
                    event = "core.storage.load_failed",
                    path = %self.path.display(),
                    error = %e
                );
                return Err(StorageError::ReadFailed {
                    path: self.path.display().to_string(),
                    source: e,
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            tracing::error!(
                event = "core.storage.json_parse_failed",
                path = %self.path.display(),
                error = %e,
                "Store file exists but contains invalid JSON"
            );
            StorageError::Corrupted {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_failed = |message: String| StorageError::WriteFailed {
            path: self.path.display().to_string(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                write_failed(format!(
                    "Failed to create directory ({}): {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| write_failed(format!("Failed to serialize store: {}", e)))?;
        std::fs::write(&self.path, json).map_err(|e| write_failed(e.to_string()))?;

        tracing::debug!(
            event = "core.storage.saved",
            path = %self.path.display(),
            count = entries.len()
        );
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

fn store_file_path() -> PathBuf {
    // Allow override via env var for testing.
    if let Ok(path_str) = std::env::var("BALLOT_STORE_FILE")
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }

    crate::config::Config::default()
        .ballot_dir
        .join("store.json")
}

/// Test utilities for the file store.
///
/// Public so the CLI crate can use the env lock/guard in its tests.
#[doc(hidden)]
pub mod test_helpers {
    use std::sync::Mutex;

    /// Mutex to serialize tests that modify BALLOT_STORE_FILE env var.
    pub static STORE_FILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    /// RAII guard that removes BALLOT_STORE_FILE env var on drop.
    pub struct StoreFileEnvGuard;

    impl StoreFileEnvGuard {
        pub fn new(path: &std::path::Path) -> Self {
            // SAFETY: Caller must hold STORE_FILE_ENV_LOCK to serialize access
            // from Rust test code. Acceptable in test-only code.
            unsafe { std::env::set_var("BALLOT_STORE_FILE", path) };
            Self
        }
    }

    impl Drop for StoreFileEnvGuard {
        fn drop(&mut self) {
            // SAFETY: Same as above.
            unsafe { std::env::remove_var("BALLOT_STORE_FILE") };
        }
    }
}
