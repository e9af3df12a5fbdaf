//! Session-scoped key/value storage backends
//!
//! A session storage keeps string values for the lifetime of one session: they
//! survive a view being rebuilt, and are gone once the session is cleared.

pub mod file;
pub mod in_memory;

use crate::core::error::StorageError;

pub use file::FileSessionStorage;
pub use in_memory::InMemorySessionStorage;

/// Key/value storage scoped to one session
pub trait SessionStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// End the session: drop every stored value
    fn clear(&self) -> Result<(), StorageError>;
}
