//! Persistence adapters for the watchlist.
//!
//! The store only ever talks to [`PersistenceAdapter`]; swapping the file
//! backend for the in-memory one is how the tests run without a disk.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored payload exists but cannot be parsed
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    /// The backend refused or failed the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

/// Key/value byte storage
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    /// Removing an absent key succeeds
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for Arc<T> {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, bytes).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}

/// One `<key>.json` file per key inside a directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_stem))
    }
}

#[async_trait]
impl PersistenceAdapter for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored data at {:?}", path);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Atomic write: write to temp file, then rename
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, bytes).await?;
        tokio::fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage. Can be switched into a failing mode.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with [`StorageError::Unavailable`]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Store raw bytes directly, bypassing the failing switch
    pub fn insert_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.lock().insert(key.to_string(), bytes.into());
    }

    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("memory storage is in failing mode".to_string()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.check()?;
        Ok(self.lock().get(key).cloned())
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.check()?;
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("watchlist"));

        assert!(storage.read("moviedb-watchlist").await.unwrap().is_none());

        storage.write("moviedb-watchlist", b"[1,2,3]").await.unwrap();
        let bytes = storage.read("moviedb-watchlist").await.unwrap().unwrap();
        assert_eq!(bytes, b"[1,2,3]");

        // No temp file is left behind
        let names: Vec<String> = std::fs::read_dir(storage.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["moviedb-watchlist.json".to_string()]);

        storage.remove("moviedb-watchlist").await.unwrap();
        assert!(storage.read("moviedb-watchlist").await.unwrap().is_none());
        storage.remove("moviedb-watchlist").await.unwrap();
    }

    #[test]
    fn test_file_storage_sanitizes_keys() {
        let storage = FileStorage::new("/tmp/x");
        assert_eq!(storage.path_for("../../etc/passwd"), PathBuf::from("/tmp/x/______etc_passwd.json"));
    }

    #[tokio::test]
    async fn test_memory_storage_failing_mode() {
        let storage = MemoryStorage::new();
        storage.write("k", b"v").await.unwrap();

        storage.set_failing(true);
        assert!(matches!(storage.read("k").await, Err(StorageError::Unavailable(_))));
        assert!(storage.write("k", b"w").await.is_err());
        assert!(storage.remove("k").await.is_err());

        storage.set_failing(false);
        assert_eq!(storage.read("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
