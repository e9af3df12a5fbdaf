//! File-backed session storage
//!
//! Each session is a directory `<root>/<session id>/` holding one file per key.
//! Reopening the same session id sees the same values; clearing the session
//! removes the directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::SessionStorage;
use crate::core::error::StorageError;

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
    session_id: String,
}

impl FileSessionStorage {
    /// Start a fresh session under `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::resume(root, Uuid::new_v4().to_string())
    }

    /// Reopen an existing session (or start one with this id)
    pub fn resume(root: impl AsRef<Path>, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        Self {
            dir: root.as_ref().join(&session_id),
            session_id,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// One file per key; bytes outside `[A-Za-z0-9-]` become `_XX` so
    /// distinct keys never share a file
    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

fn io_error(key: &str, err: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        message: err.to_string(),
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        // Write then rename so a reader never sees a half-written value
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        debug!(session = %self.session_id, "Ending file session");
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("*", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopening_the_session() {
        let root = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(root.path());
        storage.set_item("inventory", "{\"version\":0}").unwrap();

        let reopened = FileSessionStorage::resume(root.path(), storage.session_id());
        assert_eq!(
            reopened.get_item("inventory").unwrap().as_deref(),
            Some("{\"version\":0}")
        );
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let root = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(root.path());
        let keys = ["a/b", "a_b", "a.b", "a b", "ab"];
        for key in keys {
            storage.set_item(key, key).unwrap();
        }
        for key in keys {
            assert_eq!(storage.get_item(key).unwrap().as_deref(), Some(key));
        }

        storage.remove_item("a/b").unwrap();
        assert_eq!(storage.get_item("a/b").unwrap(), None);
        assert_eq!(storage.get_item("a_b").unwrap().as_deref(), Some("a_b"));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let root = tempfile::tempdir().unwrap();
        let a = FileSessionStorage::new(root.path());
        let b = FileSessionStorage::new(root.path());
        a.set_item("inventory", "[]").unwrap();
        assert_eq!(b.get_item("inventory").unwrap(), None);
    }

    #[test]
    fn test_clear_ends_the_session() {
        let root = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(root.path());
        storage.set_item("inventory", "[]").unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.get_item("inventory").unwrap(), None);
        // Clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn test_missing_key_and_remove() {
        let root = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(root.path());
        assert_eq!(storage.get_item("nothing").unwrap(), None);
        storage.remove_item("nothing").unwrap();
    }
}
