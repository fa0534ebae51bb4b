//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A table file exists but does not hold a JSON array of blob strings.
    #[error("table '{table}' is corrupted: {message}")]
    Corrupted {
        /// The table whose file could not be parsed.
        table: String,
        /// Description of the problem.
        message: String,
    },

    /// The table name cannot be mapped to a storage location.
    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// The storage root does not exist and may not be created.
    #[error("storage root not found: {0}")]
    NotFound(String),
}

impl StorageError {
    /// Creates a corrupted-table error.
    pub fn corrupted(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupted {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-table-name error.
    pub fn invalid_table_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidTableName {
            name: name.into(),
            reason,
        }
    }
}
