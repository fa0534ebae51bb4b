//! Error types for SecretDB core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in SecretDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage collaborator error, surfaced as-is.
    #[error("storage error: {0}")]
    Storage(#[from] secretdb_storage::StorageError),

    /// A stored blob could not be decoded (or a record encoded).
    #[error("codec error: {0}")]
    Codec(#[from] secretdb_codec::CodecError),

    /// The query is malformed.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// The operation requires query fields that were not supplied.
    #[error("unsupported query: {message}")]
    UnsupportedQuery {
        /// What was missing or unusable.
        message: String,
    },
}

impl CoreError {
    /// Creates an unsupported query error.
    pub fn unsupported_query(message: impl Into<String>) -> Self {
        Self::UnsupportedQuery {
            message: message.into(),
        }
    }
}

/// A malformed `where` clause, condition or query.
///
/// Raised while a query is parsed, so it always surfaces before a table is
/// loaded or written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// An `or` operand is not a sequence of conditions.
    #[error("invalid or condition format")]
    InvalidOrCondition,

    /// An `and` operand is not a sequence of conditions.
    #[error("invalid and condition format")]
    InvalidAndCondition,

    /// A `like`/`LIKE` operand is neither a pattern string nor `[prefix, suffix]`.
    #[error("unsupported like format")]
    UnsupportedLikeFormat,

    /// A `like`/`LIKE` pattern string is not a valid regular expression.
    #[error("invalid like pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it failed to compile.
        message: String,
    },

    /// Unknown operator key inside a sub-condition.
    #[error("unsupported sub-condition: {0}")]
    UnsupportedSubCondition(String),

    /// A condition or sub-condition object has no entries.
    #[error("empty condition")]
    EmptyCondition,

    /// The `where` value is not an object.
    #[error("where clause must be an object")]
    InvalidWhere,

    /// The query itself is not well formed.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Description of the problem.
        message: String,
    },
}

impl QueryError {
    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
