//! Persistence adapters.
//!
//! The streak core only needs a string key-value store ([`KeyValueStore`]).
//! [`Database`] backs it with SQLite on disk; [`MemoryStore`] keeps it in
//! memory for tests and can be told to reject writes.

mod config;
pub mod database;
pub mod memory;

pub use config::{Config, LogConfig, StorageConfig, WatchConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Durable string key-value storage.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Write several keys as one logical write. Implementations that can
    /// make this atomic should override it.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).set_many(entries)
    }
}

/// Returns `~/.config/voidlog[-dev]/` based on VOIDLOG_ENV.
///
/// Set VOIDLOG_ENV=dev to use development data directory, or
/// VOIDLOG_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("VOIDLOG_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("VOIDLOG_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("voidlog-dev")
            } else {
                base_dir.join("voidlog")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
