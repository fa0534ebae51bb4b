//! In-memory blob store for testing.

use crate::error::StorageResult;
use crate::store::{validate_table_name, BlobStore};
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory blob store.
///
/// This store keeps every table in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral databases that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use secretdb_storage::{BlobStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// store.store("t", &["a".to_string(), "b".to_string()]).unwrap();
/// assert_eq!(store.load("t").unwrap(), vec!["a", "b"]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one table.
    ///
    /// Useful for testing decode failures against hand-made blobs.
    #[must_use]
    pub fn with_table(table: impl Into<String>, blobs: Vec<String>) -> Self {
        let store = Self::new();
        store.tables.write().insert(table.into(), blobs);
        store
    }

    /// Returns whether `table` has been stored.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.tables.read().contains_key(table)
    }

    /// Clears all tables from the store.
    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

impl BlobStore for InMemoryStore {
    fn load(&self, table: &str) -> StorageResult<Vec<String>> {
        validate_table_name(table)?;
        Ok(self.tables.read().get(table).cloned().unwrap_or_default())
    }

    fn store(&self, table: &str, blobs: &[String]) -> StorageResult<()> {
        validate_table_name(table)?;
        self.tables
            .write()
            .insert(table.to_string(), blobs.to_vec());
        Ok(())
    }

    fn tables(&self) -> StorageResult<Vec<String>> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn remove(&self, table: &str) -> StorageResult<bool> {
        validate_table_name(table)?;
        Ok(self.tables.write().remove(table).is_some())
    }
}
