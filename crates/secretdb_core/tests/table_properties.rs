//! End-to-end behavior of table operations over real table files.

use secretdb_codec::{AesGcmCodec, Base64Codec, Codec, EncryptionKey, PlainCodec};
use secretdb_core::query::Query;
use secretdb_core::{Config, CoreError, Database, QueryError, Record, Table};
use secretdb_storage::{BlobStore, FileStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn file_db() -> (Database, TempDir) {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path()).unwrap();
    (db, dir)
}

fn q(value: Value) -> Query {
    Query::from_json(&value).unwrap()
}

fn five_people(table: &Table) {
    table
        .create(json!([
            {"name": "A", "age": 20, "state": "Delhi"},
            {"name": "B", "age": 24, "state": "Goa"},
            {"name": "C", "age": 30, "state": "Delhi"},
            {"name": "D", "age": 31, "state": "Goa"},
            {"name": "E", "age": 45, "state": "Kerala"},
        ]))
        .unwrap();
}

fn names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn codec_roundtrip_through_table_file() {
    let codecs: Vec<Arc<dyn Codec>> = vec![
        Arc::new(PlainCodec::new()),
        Arc::new(Base64Codec::new()),
        Arc::new(AesGcmCodec::new(EncryptionKey::generate())),
    ];
    let record = json!({"name": "prince", "nested": {"list": [1, 2.5, "x", null, true]}});

    for codec in codecs {
        let dir = tempdir().unwrap();
        let store: Arc<dyn BlobStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let table = Table::new("t", store, codec).unwrap();
        table.create(record.clone()).unwrap();
        assert_eq!(table.all().unwrap(), vec![record.clone()]);
    }
}

#[test]
fn create_increases_count() {
    let (db, _dir) = file_db();
    let table = db.table("people").unwrap();
    assert_eq!(table.find(&Query::new()).unwrap().count, 0);

    table.create(json!({"name": "solo"})).unwrap();
    assert_eq!(table.find(&Query::new()).unwrap().count, 1);

    table.create(json!([{"a": 1}, {"a": 2}, {"a": 3}])).unwrap();
    assert_eq!(table.find(&Query::new()).unwrap().count, 4);
}

#[test]
fn find_total_is_decoupled_from_matches() {
    let (db, _dir) = file_db();
    let table = db.table("people").unwrap();
    five_people(&table);

    let found = table.find(&q(json!({"where": {"state": "Goa"}}))).unwrap();
    assert_eq!(found.count, 5);
    assert_eq!(found.data.len(), 2);
}

#[test]
fn offset_and_limit_window() {
    let (db, _dir) = file_db();
    let table = db.table("people").unwrap();
    five_people(&table);

    let found = table
        .find(&q(json!({"where": {"age": {"gt": 0}}, "offset": 1, "limit": 2})))
        .unwrap();
    assert_eq!(names(&found.data), vec!["B", "C"]);
}

#[test]
fn or_and_combinators() {
    let (db, _dir) = file_db();
    let table = db.table("ages").unwrap();
    table
        .create(json!([
            {"name": "a", "age": 19},
            {"name": "b", "age": 20},
            {"name": "c", "age": 25},
            {"name": "d", "age": 30},
            {"name": "e", "age": 31},
        ]))
        .unwrap();

    let any = table
        .find(&q(json!({"where": {"or": [{"age": {"eq": 20}}, {"age": {"eq": 30}}]}})))
        .unwrap();
    assert_eq!(names(&any.data), vec!["b", "d"]);

    let all = table
        .find(&q(json!({"where": {"and": [{"age": {"gte": 20}}, {"age": {"lte": 30}}]}})))
        .unwrap();
    assert_eq!(names(&all.data), vec!["b", "c", "d"]);
}

#[test]
fn like_is_anchored_and_case_aware() {
    let (db, _dir) = file_db();
    let table = db.table("names").unwrap();
    table
        .create(json!([{"name": "prince"}, {"name": "princex"}, {"name": "PRINCE"}]))
        .unwrap();

    let sensitive = table
        .find(&q(json!({"where": {"name": {"LIKE": ["pr", "ce"]}}})))
        .unwrap();
    assert_eq!(names(&sensitive.data), vec!["prince"]);

    let insensitive = table
        .find(&q(json!({"where": {"name": {"like": ["pr", "ce"]}}})))
        .unwrap();
    assert_eq!(names(&insensitive.data), vec!["prince", "PRINCE"]);
}

#[test]
fn update_merges_without_changing_shape() {
    let (db, _dir) = file_db();
    let table = db.table("people").unwrap();
    five_people(&table);
    let before = table.all().unwrap();

    let updated = table
        .update(&q(json!({"where": {"state": "Delhi"}, "data": {"state": "X"}})))
        .unwrap();
    assert_eq!(names(&updated), vec!["A", "C"]);

    let after = table.all().unwrap();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old["name"], new["name"]);
        assert_eq!(old["age"], new["age"]);
        if old["state"] == "Delhi" {
            assert_eq!(new["state"], "X");
        } else {
            assert_eq!(old["state"], new["state"]);
        }
    }
}

#[test]
fn delete_removes_exactly_the_matches() {
    let (db, _dir) = file_db();
    let table = db.table("people").unwrap();
    five_people(&table);

    let deleted = table.delete(&q(json!({"where": {"state": "Goa"}}))).unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(names(&table.all().unwrap()), vec!["A", "C", "E"]);
}

#[test]
fn malformed_combinator_fails_closed() {
    let (db, dir) = file_db();
    let table = db.table("people").unwrap();
    five_people(&table);
    let file = dir.path().join("people.json");
    let before = std::fs::read(&file).unwrap();

    let err = "{\"where\": {\"or\": \"not-an-array\"}}"
        .parse::<Query>()
        .unwrap_err();
    assert_eq!(err, QueryError::InvalidOrCondition);

    let err = serde_json::from_value::<Query>(json!({"where": {"and": 7}})).unwrap_err();
    assert!(err.to_string().contains("invalid and condition format"));

    let err = Query::from_json(&json!({
        "where": {"and": [{"or": [{"name": "A"}, {"name": "B"}]}]}
    }))
    .unwrap_err();
    assert_eq!(err, QueryError::InvalidOrCondition);

    assert_eq!(std::fs::read(&file).unwrap(), before);
}

#[test]
fn corrupt_table_file_is_not_silently_emptied() {
    let (db, dir) = file_db();
    std::fs::write(dir.path().join("broken.json"), "[\"eyJhIjoxfQ==\", \"@@@\"]").unwrap();

    let table = db.table("broken").unwrap();
    assert!(matches!(table.find(&Query::new()), Err(CoreError::Codec(_))));
    assert!(matches!(table.create(json!({"b": 1})), Err(CoreError::Codec(_))));

    std::fs::write(dir.path().join("garbled.json"), "not json").unwrap();
    let table = db.table("garbled").unwrap();
    assert!(matches!(table.find(&Query::new()), Err(CoreError::Storage(_))));
}

#[test]
fn reads_tables_written_in_the_historical_layout() {
    let dir = tempdir().unwrap();
    // Pretty-printed array of base64 JSON blobs.
    std::fs::write(
        dir.path().join("Admin.json"),
        "[\n  \"eyJuYW1lIjoicHJpbmNlIiwiYWdlIjoyNH0=\"\n]",
    )
    .unwrap();

    let db = Database::open_with_config(dir.path(), Config::new()).unwrap();
    let found = db.table("Admin").unwrap().find(&Query::new()).unwrap();
    assert_eq!(found.data, vec![json!({"name": "prince", "age": 24})]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn ages() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(0i64..100, 0..40)
    }

    proptest! {
        #[test]
        fn find_window_follows_offset_then_limit(
            ages in ages(),
            threshold in 0i64..100,
            offset in 0usize..50,
            limit in 0usize..50,
        ) {
            let db = Database::open_in_memory();
            let table = db.table("ages").unwrap();
            let records: Vec<Value> = ages.iter().map(|age| json!({"age": age})).collect();
            table.create(Value::Array(records.clone())).unwrap();

            let found = table
                .find(&q(json!({
                    "where": {"age": {"gte": threshold}},
                    "offset": offset,
                    "limit": limit
                })))
                .unwrap();

            let expected: Vec<Value> = records
                .into_iter()
                .skip(offset)
                .filter(|r| r["age"].as_i64().unwrap() >= threshold)
                .take(limit)
                .collect();
            prop_assert_eq!(found.count, ages.len());
            prop_assert_eq!(found.data, expected);
        }

        #[test]
        fn eq_and_ne_partition_present_fields(ages in ages(), target in 0i64..100) {
            let db = Database::open_in_memory();
            let table = db.table("ages").unwrap();
            let records: Vec<Value> = ages.iter().map(|age| json!({"age": age})).collect();
            table.create(Value::Array(records)).unwrap();

            let eq = table.find(&q(json!({"where": {"age": {"eq": target}}}))).unwrap();
            let ne = table.find(&q(json!({"where": {"age": {"ne": target}}}))).unwrap();
            prop_assert_eq!(eq.data.len() + ne.data.len(), ages.len());
        }

        #[test]
        fn delete_removes_exactly_the_matches(ages in ages(), threshold in 0i64..100) {
            let db = Database::open_in_memory();
            let table = db.table("ages").unwrap();
            let records: Vec<Value> = ages.iter().map(|age| json!({"age": age})).collect();
            table.create(Value::Array(records)).unwrap();

            let deleted = table.delete(&q(json!({"where": {"age": {"lt": threshold}}}))).unwrap();
            let remaining = table.all().unwrap();

            prop_assert_eq!(deleted, ages.iter().filter(|a| **a < threshold).count());
            prop_assert_eq!(deleted + remaining.len(), ages.len());
            prop_assert!(remaining.iter().all(|r| r["age"].as_i64().unwrap() >= threshold));
        }
    }
}
