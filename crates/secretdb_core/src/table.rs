//! Table handle: whole-table read-modify-write over a blob store.
//!
//! Every operation loads every blob, decodes every record (a single bad blob
//! aborts the operation), computes its result in memory and, for mutations,
//! stores the complete new sequence. Nothing coordinates concurrent writers:
//! the last `store` wins.

use crate::error::{CoreError, CoreResult};
use crate::query::Query;
use secretdb_codec::{Codec, Record};
use secretdb_storage::{validate_table_name, BlobStore};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Field that holds a scalar passed to [`Table::create`].
pub const SCALAR_FIELD: &str = "data";

/// Result of [`Table::find`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindResult {
    /// Number of records in the whole table, not the number of matches.
    pub count: usize,
    /// Matching records in scan order.
    pub data: Vec<Record>,
}

/// A handle to one named table.
///
/// Cheap to clone; clones share the same store and codec.
///
/// # Example
///
/// ```
/// use secretdb_core::{query::Query, Database};
/// use serde_json::json;
///
/// let db = Database::open_in_memory();
/// let users = db.table("users").unwrap();
///
/// users.create(json!([{"name": "asha", "age": 20}, {"name": "bilal", "age": 30}])).unwrap();
///
/// let query = Query::from_json(&json!({"where": {"age": {"gt": 25}}})).unwrap();
/// let found = users.find(&query).unwrap();
/// assert_eq!(found.count, 2);
/// assert_eq!(found.data, vec![json!({"name": "bilal", "age": 30})]);
/// ```
#[derive(Clone)]
pub struct Table {
    name: String,
    store: Arc<dyn BlobStore>,
    codec: Arc<dyn Codec>,
}

/// A table as loaded: raw blobs and their decoded records, index-aligned.
struct Loaded {
    blobs: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Creates a handle for `name` over the given store and codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is invalid.
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn BlobStore>,
        codec: Arc<dyn Codec>,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_table_name(&name)?;
        Ok(Self { name, store, codec })
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends records and returns `input` unchanged.
    ///
    /// An array adds one record per element, an object adds itself, and a
    /// scalar is stored as `{"data": input}`. Array elements that are not
    /// objects are wrapped the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing table cannot be loaded or decoded,
    /// a record cannot be encoded, or the store fails.
    pub fn create(&self, input: Record) -> CoreResult<Record> {
        let mut loaded = self.load()?;

        let new_records: Vec<Record> = match &input {
            Value::Array(items) => items.iter().cloned().map(normalize).collect(),
            other => vec![normalize(other.clone())],
        };
        for record in &new_records {
            loaded.blobs.push(self.codec.encode(record)?);
        }

        self.store.store(&self.name, &loaded.blobs)?;
        debug!(
            table = %self.name,
            added = new_records.len(),
            total = loaded.blobs.len(),
            "created records"
        );
        Ok(input)
    }

    /// Finds records matching the query.
    ///
    /// `count` is always the size of the whole table. Without a `where`
    /// clause every record is returned and `limit`/`offset` are ignored.
    /// With one, the first `offset` records are skipped before any test,
    /// then records are tested in order until `limit` matches are collected.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded or decoded.
    pub fn find(&self, query: &Query) -> CoreResult<FindResult> {
        let Loaded { records, .. } = self.load()?;
        let count = records.len();

        let Some(filter) = &query.filter else {
            debug!(table = %self.name, count, "find without filter");
            return Ok(FindResult {
                count,
                data: records,
            });
        };

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);

        let data: Vec<Record> = records
            .into_iter()
            .skip(offset)
            .filter(|record| filter.matches(record))
            .take(limit)
            .collect();

        debug!(
            table = %self.name,
            count,
            matched = data.len(),
            offset,
            "find with filter"
        );
        Ok(FindResult { count, data })
    }

    /// Returns every record, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded or decoded.
    pub fn all(&self) -> CoreResult<Vec<Record>> {
        Ok(self.load()?.records)
    }

    /// Returns the number of records without decoding them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn count(&self) -> CoreResult<usize> {
        Ok(self.store.load(&self.name)?.len())
    }

    /// Merges `query.data` into every record matching `query.where`.
    ///
    /// Fields in `data` overwrite, all other fields are kept. Every record is
    /// scanned; `limit` and `offset` are ignored. Length and order of the
    /// table never change. Returns the merged records in scan order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedQuery`] if `where` or `data` is
    /// missing or `data` is not an object, and load/codec/store errors
    /// otherwise.
    pub fn update(&self, query: &Query) -> CoreResult<Vec<Record>> {
        let (Some(filter), Some(data)) = (&query.filter, &query.data) else {
            return Err(CoreError::unsupported_query(
                "update requires both where and data",
            ));
        };
        let Value::Object(patch) = data else {
            return Err(CoreError::unsupported_query("update data must be an object"));
        };

        let mut loaded = self.load()?;
        let mut updated = Vec::new();

        for (blob, record) in loaded.blobs.iter_mut().zip(loaded.records.iter_mut()) {
            if !filter.matches(record) {
                continue;
            }
            merge(record, patch);
            *blob = self.codec.encode(record)?;
            updated.push(record.clone());
        }

        self.store.store(&self.name, &loaded.blobs)?;
        debug!(table = %self.name, updated = updated.len(), "updated records");
        Ok(updated)
    }

    /// Removes every record matching `query.where` and returns how many.
    ///
    /// Every record is scanned; `limit` and `offset` are ignored. The
    /// remaining records keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedQuery`] if `where` is missing, and
    /// load/store errors otherwise.
    pub fn delete(&self, query: &Query) -> CoreResult<usize> {
        let Some(filter) = &query.filter else {
            return Err(CoreError::unsupported_query("delete requires where"));
        };

        let Loaded { blobs, records } = self.load()?;
        let before = blobs.len();

        let kept: Vec<String> = blobs
            .into_iter()
            .zip(&records)
            .filter(|(_, record)| !filter.matches(record))
            .map(|(blob, _)| blob)
            .collect();
        let deleted = before - kept.len();

        self.store.store(&self.name, &kept)?;
        debug!(table = %self.name, deleted, remaining = kept.len(), "deleted records");
        Ok(deleted)
    }

    fn load(&self) -> CoreResult<Loaded> {
        let blobs = self.store.load(&self.name)?;
        let records = blobs
            .iter()
            .enumerate()
            .map(|(index, blob)| {
                self.codec.decode(blob).map_err(|e| {
                    warn!(table = %self.name, index, codec = self.codec.name(), error = %e, "undecodable record");
                    CoreError::from(e)
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Loaded { blobs, records })
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("codec", &self.codec.name())
            .finish_non_exhaustive()
    }
}

/// Objects are stored as-is; anything else is wrapped as `{"data": value}`.
fn normalize(value: Value) -> Record {
    match value {
        Value::Object(_) => value,
        other => {
            let mut map = Map::new();
            map.insert(SCALAR_FIELD.to_string(), other);
            Value::Object(map)
        }
    }
}

/// Shallow merge: `patch` fields win. A non-object record becomes the patch.
fn merge(record: &mut Record, patch: &Map<String, Value>) {
    match record {
        Value::Object(fields) => {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }
        other => *other = Value::Object(patch.clone()),
    }
}
