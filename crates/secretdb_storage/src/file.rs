//! File-based blob store for persistent tables.

use crate::error::{StorageError, StorageResult};
use crate::store::{validate_table_name, BlobStore};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of the per-table files inside a [`FileStore`] root.
pub const TABLE_FILE_EXTENSION: &str = "json";

/// A directory-backed blob store.
///
/// Each table is a single `<table>.json` file under the root directory,
/// holding a JSON array of blob strings. Data survives process restarts.
///
/// # Durability
///
/// `store` writes the whole array to a uniquely named sibling temp file,
/// syncs it and then renames it over the table file. A crash mid-write leaves
/// either the old or the new table on disk, and concurrent writers to one
/// table never share a temp file: the last rename wins with an intact file.
///
/// # Example
///
/// ```no_run
/// use secretdb_storage::{BlobStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::open_with_create_dirs(Path::new("SecretDb")).unwrap();
/// store.store("users", &["eyJhIjoxfQ==".to_string()]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    pretty: bool,
}

impl FileStore {
    /// Opens a file store rooted at an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `root` is not a directory.
    pub fn open(root: &Path) -> StorageResult<Self> {
        if !root.is_dir() {
            return Err(StorageError::NotFound(root.display().to_string()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            pretty: true,
        })
    }

    /// Opens a file store, creating the root directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_with_create_dirs(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        Self::open(root)
    }

    /// Sets whether table files are pretty-printed (two-space indent).
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the file backing `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid.
    pub fn table_path(&self, table: &str) -> StorageResult<PathBuf> {
        validate_table_name(table)?;
        Ok(self
            .root
            .join(format!("{table}.{TABLE_FILE_EXTENSION}")))
    }
}

impl BlobStore for FileStore {
    fn load(&self, table: &str) -> StorageResult<Vec<String>> {
        let path = self.table_path(table)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let blobs: Vec<String> = serde_json::from_str(&text)
            .map_err(|e| StorageError::corrupted(table, e.to_string()))?;
        debug!(table, blobs = blobs.len(), "loaded table file");
        Ok(blobs)
    }

    fn store(&self, table: &str, blobs: &[String]) -> StorageResult<()> {
        let path = self.table_path(table)?;

        let body = if self.pretty {
            serde_json::to_vec_pretty(blobs)
        } else {
            serde_json::to_vec(blobs)
        }
        .map_err(|e| StorageError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        // Dot-prefixed with a random tail; `tables` never lists it.
        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{table}."))
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        temp.write_all(&body)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;

        debug!(table, blobs = blobs.len(), bytes = body.len(), "stored table file");
        Ok(())
    }

    fn tables(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(TABLE_FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, table: &str) -> StorageResult<bool> {
        let path = self.table_path(table)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
