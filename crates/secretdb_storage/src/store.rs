//! Blob store trait definition.

use crate::error::{StorageError, StorageResult};

/// A whole-table blob store for SecretDB.
///
/// Blob stores are **opaque**: each table is an ordered sequence of strings
/// produced by a record codec, and the store never looks inside them.
///
/// # Invariants
///
/// - `load` returns exactly the sequence passed to the last successful `store`
/// - `load` of a table that was never stored returns an empty sequence
/// - `store` replaces the whole table; there is no append or partial update
/// - Stores must be `Send + Sync` for shared access
///
/// # Concurrency
///
/// Nothing coordinates a `load` with a later `store`. Two writers racing on
/// the same table clobber each other at whole-table granularity; callers that
/// need more must serialize access per table themselves.
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait BlobStore: Send + Sync {
    /// Loads every blob of `table`, in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid, the backing data is
    /// corrupted, or an I/O error occurs. A missing table is not an error.
    fn load(&self, table: &str) -> StorageResult<Vec<String>>;

    /// Replaces the contents of `table` with `blobs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid or an I/O error occurs.
    fn store(&self, table: &str, blobs: &[String]) -> StorageResult<()>;

    /// Lists the names of all tables that have been stored, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be read.
    fn tables(&self) -> StorageResult<Vec<String>>;

    /// Removes a table entirely.
    ///
    /// Returns `true` if the table existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid or an I/O error occurs.
    fn remove(&self, table: &str) -> StorageResult<bool>;
}

/// Checks that `name` can be used as a table name.
///
/// Names must be non-empty and may not contain path separators, NUL, or be
/// a relative path component (`.` / `..`).
///
/// # Errors
///
/// Returns [`StorageError::InvalidTableName`] describing the first violation.
pub fn validate_table_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::invalid_table_name(name, "name is empty"));
    }
    if name == "." || name == ".." {
        return Err(StorageError::invalid_table_name(
            name,
            "name is a path component",
        ));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(StorageError::invalid_table_name(
            name,
            "name contains a path separator or NUL",
        ));
    }
    Ok(())
}
