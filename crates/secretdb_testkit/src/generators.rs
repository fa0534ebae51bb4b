//! Property-based test generators using proptest.

use proptest::prelude::*;
use secretdb_core::Record;
use serde_json::{Map, Number, Value};

/// Strategy for valid table names.
pub fn table_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,31}").expect("Invalid regex")
}

/// Strategy for scalar JSON values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        any::<f64>()
            .prop_filter_map("finite", Number::from_f64)
            .prop_map(Value::Number),
        "[ -~]{0,16}".prop_map(Value::String),
    ]
}

/// Strategy for arbitrary JSON values up to a small depth.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Strategy for object records with an integer `age` and a string `name`.
pub fn person_strategy() -> impl Strategy<Value = Record> {
    ("[a-z]{1,8}", 0i64..100, value_strategy()).prop_map(|(name, age, extra)| {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(name));
        map.insert("age".to_string(), Value::Number(age.into()));
        map.insert("extra".to_string(), extra);
        Value::Object(map)
    })
}

/// Strategy for a batch of people.
pub fn people_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(person_strategy(), 0..=max)
}
