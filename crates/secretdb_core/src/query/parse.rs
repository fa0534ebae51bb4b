//! JSON query syntax.

use super::{Clause, Condition, ConditionGroup, FieldPredicate, Pattern, Query, SubCondition, WhereClause};
use crate::error::QueryError;
use serde_json::{Map, Value};

const OR: &str = "or";
const AND: &str = "and";

pub(super) fn parse_query(value: &Value) -> Result<Query, QueryError> {
    let map = match value {
        Value::Null => return Ok(Query::default()),
        Value::Object(map) => map,
        _ => return Err(QueryError::invalid_query("query must be an object")),
    };

    let mut query = Query::default();
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "where" => query.filter = Some(parse_where(value)?),
            "limit" => query.limit = Some(parse_count(key, value)?),
            "offset" => query.offset = Some(parse_count(key, value)?),
            "data" => query.data = Some(value.clone()),
            other => {
                return Err(QueryError::invalid_query(format!(
                    "unknown query field: {other}"
                )))
            }
        }
    }
    Ok(query)
}

fn parse_count(key: &str, value: &Value) -> Result<usize, QueryError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| QueryError::invalid_query(format!("{key} must be a non-negative integer")))
}

pub(super) fn parse_where(value: &Value) -> Result<WhereClause, QueryError> {
    let map = value.as_object().ok_or(QueryError::InvalidWhere)?;

    let mut clauses = Vec::with_capacity(map.len());
    for (key, value) in map {
        let clause = match key.as_str() {
            OR => Clause::Any(parse_groups(value, QueryError::InvalidOrCondition)?),
            AND => Clause::All(parse_groups(value, QueryError::InvalidAndCondition)?),
            field => Clause::Field(FieldPredicate::new(field, parse_condition(value)?)),
        };
        clauses.push(clause);
    }
    Ok(WhereClause { clauses })
}

fn parse_groups(value: &Value, shape_error: QueryError) -> Result<Vec<ConditionGroup>, QueryError> {
    let items = value.as_array().ok_or_else(|| shape_error.clone())?;
    items
        .iter()
        .map(|item| {
            let map = item.as_object().ok_or_else(|| shape_error.clone())?;
            parse_group(map)
        })
        .collect()
}

fn parse_group(map: &Map<String, Value>) -> Result<ConditionGroup, QueryError> {
    if map.is_empty() {
        return Err(QueryError::EmptyCondition);
    }
    let predicates = map
        .iter()
        .map(|(field, value)| match field.as_str() {
            // Combinators only nest one level: inside a group they are errors,
            // not field names.
            OR => Err(QueryError::InvalidOrCondition),
            AND => Err(QueryError::InvalidAndCondition),
            _ => Ok(FieldPredicate::new(field.as_str(), parse_condition(value)?)),
        })
        .collect::<Result<Vec<_>, QueryError>>()?;
    Ok(ConditionGroup { predicates })
}

fn parse_condition(value: &Value) -> Result<Condition, QueryError> {
    let map = match value {
        Value::Object(map) => map,
        // An array reads as an operator object keyed by position, and no
        // operator is named "0".
        Value::Array(items) if items.is_empty() => return Err(QueryError::EmptyCondition),
        Value::Array(_) => return Err(QueryError::UnsupportedSubCondition("0".to_string())),
        literal => return Ok(Condition::Equals(literal.clone())),
    };
    if map.is_empty() {
        return Err(QueryError::EmptyCondition);
    }

    if let Some(alternatives) = map.get(OR) {
        if map.len() > 1 {
            return Err(QueryError::InvalidOrCondition);
        }
        let items = alternatives
            .as_array()
            .ok_or(QueryError::InvalidOrCondition)?;
        let subs = items
            .iter()
            .map(parse_single_sub_condition)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Condition::AnyOf(subs));
    }

    let subs = map
        .iter()
        .map(|(op, operand)| parse_sub_condition(op, operand))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Condition::Operators(subs))
}

/// Parses one element of a field-level `or`, which carries exactly one operator.
fn parse_single_sub_condition(value: &Value) -> Result<SubCondition, QueryError> {
    let map = value.as_object().ok_or(QueryError::InvalidOrCondition)?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((op, operand)), None) => parse_sub_condition(op, operand),
        (None, _) => Err(QueryError::EmptyCondition),
        (Some(_), Some(_)) => Err(QueryError::InvalidOrCondition),
    }
}

fn parse_sub_condition(op: &str, operand: &Value) -> Result<SubCondition, QueryError> {
    let sub = match op {
        "eq" => SubCondition::Eq(operand.clone()),
        "ne" => SubCondition::Ne(operand.clone()),
        "gte" => SubCondition::Gte(operand.clone()),
        "lte" => SubCondition::Lte(operand.clone()),
        "gt" => SubCondition::Gt(operand.clone()),
        "lt" => SubCondition::Lt(operand.clone()),
        "like" => SubCondition::Like(parse_pattern(operand, false)?),
        "LIKE" => SubCondition::LikeCaseSensitive(parse_pattern(operand, true)?),
        other => return Err(QueryError::UnsupportedSubCondition(other.to_string())),
    };
    Ok(sub)
}

fn parse_pattern(operand: &Value, case_sensitive: bool) -> Result<Pattern, QueryError> {
    match operand {
        Value::String(source) => Pattern::regex(source, case_sensitive),
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(prefix)] => Pattern::affix(prefix, "", case_sensitive),
            [Value::String(prefix), Value::String(suffix)] => {
                Pattern::affix(prefix, suffix, case_sensitive)
            }
            _ => Err(QueryError::UnsupportedLikeFormat),
        },
        _ => Err(QueryError::UnsupportedLikeFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn where_of(value: Value) -> Result<WhereClause, QueryError> {
        parse_where(&value)
    }

    #[test]
    fn literal_becomes_equality() {
        let clause = where_of(json!({"name": "prince"})).unwrap();
        assert_eq!(
            clause,
            WhereClause::new().field("name", Condition::equals("prince"))
        );
    }

    #[test]
    fn scalars_and_null_are_literals() {
        let clause = where_of(json!({"age": 24, "admin": true, "nick": null})).unwrap();
        assert_eq!(clause.clauses().len(), 3);
        for c in clause.clauses() {
            assert!(matches!(
                c,
                Clause::Field(FieldPredicate {
                    condition: Condition::Equals(_),
                    ..
                })
            ));
        }
    }

    #[test]
    fn array_condition_is_rejected() {
        assert_eq!(
            where_of(json!({"tags": ["a", "b"]})),
            Err(QueryError::UnsupportedSubCondition("0".to_string()))
        );
        assert_eq!(where_of(json!({"tags": []})), Err(QueryError::EmptyCondition));
        assert_eq!(
            where_of(json!({"or": [{"tags": ["a"]}]})),
            Err(QueryError::UnsupportedSubCondition("0".to_string()))
        );
    }

    #[test]
    fn nested_combinators_are_rejected() {
        assert_eq!(
            where_of(json!({"and": [{"or": [{"a": 1}, {"b": 2}]}]})),
            Err(QueryError::InvalidOrCondition)
        );
        assert_eq!(
            where_of(json!({"or": [{"and": [{"a": 1}]}]})),
            Err(QueryError::InvalidAndCondition)
        );
        assert_eq!(
            where_of(json!({"or": [{"a": 1, "or": {"eq": 1}}]})),
            Err(QueryError::InvalidOrCondition)
        );
    }

    #[test]
    fn operator_object_becomes_operators() {
        let clause = where_of(json!({"age": {"gte": 20, "lte": 30}})).unwrap();
        let Clause::Field(predicate) = &clause.clauses()[0] else {
            panic!("expected field clause");
        };
        let Condition::Operators(subs) = &predicate.condition else {
            panic!("expected operators");
        };
        let ops: Vec<_> = subs.iter().map(SubCondition::operator).collect();
        assert_eq!(ops, vec!["gte", "lte"]);
    }

    #[test]
    fn field_level_or_becomes_any_of() {
        let clause = where_of(json!({"age": {"or": [{"eq": 20}, {"eq": 30}]}})).unwrap();
        assert_eq!(
            clause,
            WhereClause::new().field(
                "age",
                Condition::any_of(vec![SubCondition::eq(20), SubCondition::eq(30)])
            )
        );
    }

    #[test]
    fn top_level_combinators() {
        let clause = where_of(json!({
            "or": [{"age": {"eq": 20}}, {"age": {"eq": 30}}],
            "and": [{"age": {"gte": 20}}, {"age": {"lte": 30}}],
            "state": "Delhi"
        }))
        .unwrap();
        assert_eq!(clause.clauses().len(), 3);
        assert!(clause.clauses().iter().any(|c| matches!(c, Clause::Any(g) if g.len() == 2)));
        assert!(clause.clauses().iter().any(|c| matches!(c, Clause::All(g) if g.len() == 2)));
    }

    #[test]
    fn or_must_be_a_sequence() {
        assert_eq!(
            where_of(json!({"or": "not-an-array"})),
            Err(QueryError::InvalidOrCondition)
        );
        assert_eq!(
            where_of(json!({"or": ["not-an-object"]})),
            Err(QueryError::InvalidOrCondition)
        );
        assert_eq!(
            where_of(json!({"age": {"or": {"eq": 1}}})),
            Err(QueryError::InvalidOrCondition)
        );
        assert_eq!(
            where_of(json!({"age": {"or": [{"eq": 1}], "gt": 0}})),
            Err(QueryError::InvalidOrCondition)
        );
    }

    #[test]
    fn and_must_be_a_sequence() {
        assert_eq!(
            where_of(json!({"and": {"age": 1}})),
            Err(QueryError::InvalidAndCondition)
        );
    }

    #[test]
    fn unknown_operator_is_rejected() {
        assert_eq!(
            where_of(json!({"age": {"between": [1, 2]}})),
            Err(QueryError::UnsupportedSubCondition("between".to_string()))
        );
        assert_eq!(
            where_of(json!({"age": {"or": [{"nope": 1}]}})),
            Err(QueryError::UnsupportedSubCondition("nope".to_string()))
        );
    }

    #[test]
    fn like_shapes() {
        assert!(where_of(json!({"name": {"like": "^pr"}})).is_ok());
        assert!(where_of(json!({"name": {"LIKE": ["pr", "ce"]}})).is_ok());
        assert!(where_of(json!({"name": {"like": ["pr"]}})).is_ok());
        for bad in [json!(42), json!([]), json!(["a", "b", "c"]), json!([1, 2]), json!({"a": 1})] {
            assert_eq!(
                where_of(json!({"name": {"like": bad}})),
                Err(QueryError::UnsupportedLikeFormat)
            );
        }
    }

    #[test]
    fn bad_regex_is_rejected() {
        assert!(matches!(
            where_of(json!({"name": {"LIKE": "(["}})),
            Err(QueryError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn empty_objects_are_rejected() {
        assert_eq!(where_of(json!({"age": {}})), Err(QueryError::EmptyCondition));
        assert_eq!(where_of(json!({"or": [{}]})), Err(QueryError::EmptyCondition));
        assert_eq!(
            where_of(json!({"age": {"or": [{}]}})),
            Err(QueryError::EmptyCondition)
        );
    }

    #[test]
    fn where_must_be_an_object() {
        assert_eq!(where_of(json!([1, 2])), Err(QueryError::InvalidWhere));
        assert_eq!(where_of(json!("age")), Err(QueryError::InvalidWhere));
    }

    #[test]
    fn query_fields() {
        let query = parse_query(&json!({
            "where": {"age": 24},
            "limit": 2,
            "offset": 1,
            "data": {"state": "X"}
        }))
        .unwrap();
        assert!(query.filter.is_some());
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.offset, Some(1));
        assert_eq!(query.data, Some(json!({"state": "X"})));
    }

    #[test]
    fn null_fields_are_absent() {
        let query = parse_query(&json!({"where": null, "limit": null})).unwrap();
        assert_eq!(query, Query::default());
        assert_eq!(parse_query(&Value::Null).unwrap(), Query::default());
    }

    #[test]
    fn query_rejects_bad_shapes() {
        assert!(matches!(
            parse_query(&json!({"limit": -1})),
            Err(QueryError::InvalidQuery { .. })
        ));
        assert!(matches!(
            parse_query(&json!({"offset": 1.5})),
            Err(QueryError::InvalidQuery { .. })
        ));
        assert!(matches!(
            parse_query(&json!({"wher": {}})),
            Err(QueryError::InvalidQuery { .. })
        ));
        assert!(matches!(
            parse_query(&json!([])),
            Err(QueryError::InvalidQuery { .. })
        ));
    }
}
