//! Database facade.

use crate::config::{Config, DEFAULT_ROOT};
use crate::error::CoreResult;
use crate::table::Table;
use secretdb_codec::Codec;
use secretdb_storage::{BlobStore, FileStore, InMemoryStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// The main database handle.
///
/// A database is a blob store plus the codec every table uses. Tables are
/// obtained with [`Database::table`] and created implicitly by their first
/// write.
///
/// # Opening a Database
///
/// ```rust,no_run
/// use secretdb_core::{Config, Database};
/// use secretdb_codec::EncryptionKey;
/// use std::path::Path;
///
/// let key = EncryptionKey::from_passphrase("correct horse", "app-salt")?;
/// let db = Database::open_with_config(Path::new("SecretDb"), Config::new().encryption_key(key))?;
/// let admins = db.table("Admin")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Concurrency
///
/// `Database` and [`Table`] are `Send + Sync`, but operations on one table
/// are whole-table read-modify-write cycles with no locking. Concurrent
/// writers to the same table must be serialized by the caller.
#[derive(Clone)]
pub struct Database {
    config: Config,
    root: Option<PathBuf>,
    store: Arc<dyn BlobStore>,
    codec: Arc<dyn Codec>,
}

impl Database {
    /// Opens a database in the directory `path` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a database in `./SecretDb`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_default() -> CoreResult<Self> {
        Self::open(Path::new(DEFAULT_ROOT))
    }

    /// Opens a database in the directory `path`.
    ///
    /// Creates the directory when `create_if_missing` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing (and may not be created)
    /// or cannot be created.
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let store = if config.create_if_missing {
            FileStore::open_with_create_dirs(path)?
        } else {
            FileStore::open(path)?
        }
        .pretty(config.pretty);

        info!(path = %path.display(), codec = config.codec.name(), "opened database");
        let codec = config.codec.build();
        Ok(Self {
            config,
            root: Some(path.to_path_buf()),
            store: Arc::new(store),
            codec,
        })
    }

    /// Opens an ephemeral in-memory database with default configuration.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::open_in_memory_with_config(Config::default())
    }

    /// Opens an ephemeral in-memory database.
    #[must_use]
    pub fn open_in_memory_with_config(config: Config) -> Self {
        let codec = config.codec.build();
        Self {
            config,
            root: None,
            store: Arc::new(InMemoryStore::new()),
            codec,
        }
    }

    /// Builds a database over an arbitrary store and codec.
    ///
    /// The codec in `config` is ignored in favor of `codec`.
    #[must_use]
    pub fn with_parts(config: Config, store: Arc<dyn BlobStore>, codec: Arc<dyn Codec>) -> Self {
        Self {
            config,
            root: None,
            store,
            codec,
        }
    }

    /// Returns a handle to the table `name`.
    ///
    /// The table does not need to exist; it is empty until first written.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid table name.
    pub fn table(&self, name: &str) -> CoreResult<Table> {
        Table::new(name, self.store.clone(), self.codec.clone())
    }

    /// Lists the tables that have been written, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    pub fn table_names(&self) -> CoreResult<Vec<String>> {
        Ok(self.store.tables()?)
    }

    /// Deletes a table and all of its records.
    ///
    /// Returns `true` if the table existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the store fails.
    pub fn drop_table(&self, name: &str) -> CoreResult<bool> {
        let existed = self.store.remove(name)?;
        debug!(table = name, existed, "dropped table");
        Ok(existed)
    }

    /// Returns the database directory, or `None` when not file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Returns the configuration the database was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the name of the codec in use.
    #[must_use]
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("root", &self.root)
            .field("codec", &self.codec.name())
            .finish_non_exhaustive()
    }
}
