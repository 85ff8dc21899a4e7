//! Flat string key-value storage.
//!
//! Backends hold opaque strings; [`Repository`] layers typed JSON records
//! on top and turns every storage failure into an empty read or a no-op
//! write.

pub mod file;
pub mod memory;
pub mod repository;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::Repository;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Common trait for storage backends
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Name of the backend for logging
    fn backend_name(&self) -> &'static str;
}

/// Bytes a map would occupy after replacing `key` with `value`
pub(crate) fn size_after_write<'a, I>(entries: I, key: &str, value: &str) -> usize
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let others: usize = entries
        .into_iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    others + key.len() + value.len()
}
