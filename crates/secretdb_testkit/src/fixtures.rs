//! Test fixtures and database helpers.

use secretdb_codec::EncryptionKey;
use secretdb_core::{Config, Database, Record};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        Self {
            db: Database::open_in_memory(),
            _temp_dir: None,
        }
    }

    /// Creates a new file-based test database with the default codec.
    pub fn file() -> Self {
        Self::file_with_config(Config::default())
    }

    /// Creates a new file-based test database that encrypts its records.
    pub fn encrypted() -> Self {
        Self::file_with_config(Config::new().encryption_key(EncryptionKey::generate()))
    }

    /// Creates a new file-based test database with a custom configuration.
    pub fn file_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open_with_config(&temp_dir.path().join("SecretDb"), config)
            .expect("Failed to open file database");
        Self {
            db,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the database directory if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let db = TestDatabase::memory();
    f(&db)
}

/// Runs a test with a temporary file-backed database.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let db = TestDatabase::file();
    f(&db)
}

/// Five people records, as one array ready for `create`.
///
/// Ages are 20, 24, 30, 31 and 45; states are Delhi, Goa, Delhi, Goa, Kerala.
pub fn people_fixture() -> Record {
    json!([
        {"name": "prince", "age": 20, "state": "Delhi", "country": "INDIA"},
        {"name": "asha", "age": 24, "state": "Goa", "country": "INDIA"},
        {"name": "ravi", "age": 30, "state": "Delhi", "country": "INDIA"},
        {"name": "meera", "age": 31, "state": "Goa", "country": "INDIA"},
        {"name": "tom", "age": 45, "state": "Kerala", "country": "UK"},
    ])
}
