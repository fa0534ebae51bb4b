//! Value comparisons used by conditions.
//!
//! - Equality is strict: no coercion between types. Numbers compare by
//!   numeric value (`1 == 1.0`); arrays and objects compare structurally.
//! - Ordering exists only between two numbers, two strings (code point
//!   order) or two booleans (`false < true`). Every other pairing, including
//!   an absent field or `null`, is unordered and fails every comparison.
//! - Pattern operators see strings as-is and numbers/booleans as their JSON
//!   text; anything else never matches.

use serde_json::{Number, Value};
use std::cmp::Ordering;

pub(crate) fn strict_eq(field: Option<&Value>, expected: &Value) -> bool {
    field.is_some_and(|actual| values_equal(actual, expected))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

pub(crate) fn compare(field: Option<&Value>, operand: &Value) -> Option<Ordering> {
    match (field?, operand) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

pub(crate) fn pattern_text(field: Option<&Value>) -> Option<String> {
    match field? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
