//! Record commands: create, find, update, delete.

use super::{read_json, Output};
use secretdb_core::query::Query;
use secretdb_core::Database;
use serde_json::{json, Value};
use tracing::info;

/// Runs the create command; prints the input back.
pub fn create(db: &Database, table: &str, data: &str) -> Result<Output, Box<dyn std::error::Error>> {
    let input = read_json(data)?;
    let created = db.table(table)?.create(input)?;
    Ok(Output(created))
}

/// Runs the find command; prints `{"count", "data"}`.
pub fn find(
    db: &Database,
    table: &str,
    query: Option<&str>,
) -> Result<Output, Box<dyn std::error::Error>> {
    let query = match query {
        Some(arg) => Query::from_json(&read_json(arg)?)?,
        None => Query::new(),
    };
    let found = db.table(table)?.find(&query)?;
    Ok(Output(serde_json::to_value(found)?))
}

/// Runs the update command; prints the updated records.
pub fn update(db: &Database, table: &str, query: &str) -> Result<Output, Box<dyn std::error::Error>> {
    let query = Query::from_json(&read_json(query)?)?;
    let updated = db.table(table)?.update(&query)?;
    info!(table, updated = updated.len(), "update finished");
    Ok(Output(Value::Array(updated)))
}

/// Runs the delete command; prints `{"deleted": n}`.
pub fn delete(db: &Database, table: &str, query: &str) -> Result<Output, Box<dyn std::error::Error>> {
    let query = Query::from_json(&read_json(query)?)?;
    let deleted = db.table(table)?.delete(&query)?;
    info!(table, deleted, "delete finished");
    Ok(Output(json!({ "deleted": deleted })))
}
