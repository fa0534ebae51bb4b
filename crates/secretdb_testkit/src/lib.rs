//! # SecretDB Testkit
//!
//! Test utilities for SecretDB.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use secretdb_testkit::prelude::*;
//!
//! with_temp_db(|db| {
//!     let people = db.table("people").unwrap();
//!     people.create(people_fixture()).unwrap();
//!     assert_eq!(people.count().unwrap(), 5);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
