//! # SecretDB Core
//!
//! Query engine and table store for SecretDB.
//!
//! This crate provides:
//! - The query model and predicate engine ([`query`])
//! - Table handles with `create` / `find` / `update` / `delete` ([`Table`])
//! - The database facade over a blob store and a record codec ([`Database`])
//!
//! Every table operation loads the whole table, decodes every record,
//! works in memory and writes the whole table back.
//!
//! ## Example
//!
//! ```
//! use secretdb_core::{query::Query, Database};
//! use serde_json::json;
//!
//! let db = Database::open_in_memory();
//! let admins = db.table("Admin")?;
//!
//! admins.create(json!({"name": "prince", "age": 24, "state": "Delhi"}))?;
//! admins.create(json!({"name": "ravi", "age": 31, "state": "Goa"}))?;
//!
//! let updated = admins.update(&Query::from_json(&json!({
//!     "where": {"state": {"LIKE": ["De", "hi"]}},
//!     "data": {"state": "Punjab"}
//! }))?)?;
//! assert_eq!(updated[0]["state"], "Punjab");
//!
//! let deleted = admins.delete(&Query::from_json(&json!({"where": {"age": {"gt": 30}}}))?)?;
//! assert_eq!(deleted, 1);
//! # Ok::<(), secretdb_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
pub mod query;
mod table;

pub use config::{CodecKind, Config, DEFAULT_ROOT};
pub use database::Database;
pub use error::{CoreError, CoreResult, QueryError};
pub use table::{FindResult, Table, SCALAR_FIELD};

pub use secretdb_codec::Record;

/// Version of the core crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
