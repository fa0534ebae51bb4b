//! # SecretDB Storage
//!
//! Blob store trait and implementations for SecretDB.
//!
//! This crate provides the lowest-level persistence abstraction for SecretDB.
//! Blob stores are **opaque string stores** - they do not interpret the blobs
//! they hold. Decoding, filtering and mutation all happen above this layer.
//!
//! ## Design Principles
//!
//! - A table is loaded and stored as a whole: no partial reads or writes
//! - A table that was never written loads as an empty sequence
//! - Stores must be `Send + Sync` so handles can be shared across threads
//! - No locking between `load` and `store`; the last writer wins
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral tables
//! - [`FileStore`] - One JSON file per table inside a directory
//!
//! ## Example
//!
//! ```rust
//! use secretdb_storage::{BlobStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.store("users", &["eyJhIjoxfQ==".to_string()]).unwrap();
//! assert_eq!(store.load("users").unwrap().len(), 1);
//! assert!(store.load("missing").unwrap().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::{FileStore, TABLE_FILE_EXTENSION};
pub use memory::InMemoryStore;
pub use store::{validate_table_name, BlobStore};
