//! Table commands: list and drop.

use super::Output;
use secretdb_core::Database;
use serde_json::{json, Value};
use tracing::info;

/// Lists the tables of the database.
pub fn list(db: &Database) -> Result<Output, Box<dyn std::error::Error>> {
    let names = db.table_names()?;
    Ok(Output(Value::from(names)))
}

/// Drops a table.
pub fn drop(db: &Database, table: &str) -> Result<Output, Box<dyn std::error::Error>> {
    let dropped = db.drop_table(table)?;
    info!(table, dropped, "drop finished");
    Ok(Output(json!({ "dropped": dropped })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn list_and_drop() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.table("b").unwrap().create(json!({"x": 1})).unwrap();
        db.table("a").unwrap().create(json!({"x": 1})).unwrap();

        assert_eq!(list(&db).unwrap().0, json!(["a", "b"]));
        assert_eq!(drop(&db, "a").unwrap().0, json!({"dropped": true}));
        assert_eq!(drop(&db, "a").unwrap().0, json!({"dropped": false}));
        assert_eq!(list(&db).unwrap().0, json!(["b"]));
    }
}
