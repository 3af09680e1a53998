//! Durable key/value storage for completion maps.
//!
//! Mirrors what a browser gives a page: string keys, string values, one
//! independent entry per key. Writers are not coordinated; last write wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Storage failure. Callers log these and carry on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// String key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Keys are percent-encoded so any program id maps
    /// to a single file inside `dir`.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", urlencoding::encode(key))))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for tests, with switchable write failures.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::{KeyValueStore, StoreError};

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
        reject_writes: AtomicBool,
        reject_reads: AtomicBool,
    }

    impl MemoryStore {
        pub fn reject_writes(&self, reject: bool) {
            self.reject_writes.store(reject, Ordering::SeqCst);
        }

        pub fn reject_reads(&self, reject: bool) {
            self.reject_reads.store(reject, Ordering::SeqCst);
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn put_raw(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        fn refused(key: &str) -> StoreError {
            StoreError::Io {
                path: key.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "quota exceeded"),
            }
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.reject_reads.load(Ordering::SeqCst) {
                return Err(Self::refused(key));
            }
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.reject_writes.load(Ordering::SeqCst) {
                return Err(Self::refused(key));
            }
            self.put_raw(key, value);
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));
        assert_eq!(store.get("checklist_mit-cs").unwrap(), None);
    }

    #[test]
    fn set_creates_directory_and_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("state"));

        store.set("checklist_mit-cs", r#"{"mit-cs-1":true}"#).unwrap();
        assert_eq!(
            store.get("checklist_mit-cs").unwrap().as_deref(),
            Some(r#"{"mit-cs-1":true}"#)
        );
        assert!(store.dir().join("checklist_mit-cs.json").is_file());

        store.remove("checklist_mit-cs").unwrap();
        store.remove("checklist_mit-cs").unwrap();
        assert_eq!(store.get("checklist_mit-cs").unwrap(), None);
    }

    #[test]
    fn keys_are_independent() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("checklist_a", "1").unwrap();
        store.set("checklist_b", "2").unwrap();
        store.set("checklist_a", "3").unwrap();

        assert_eq!(store.get("checklist_a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("checklist_b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn path_like_keys_stay_inside_the_directory() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        store.set("checklist_../escape", "x").unwrap();
        store.set("checklist_a/b", "y").unwrap();

        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 2);
        assert_eq!(store.get("checklist_a/b").unwrap().as_deref(), Some("y"));
        assert!(matches!(store.set("", "x"), Err(StoreError::InvalidKey(_))));
    }
}
