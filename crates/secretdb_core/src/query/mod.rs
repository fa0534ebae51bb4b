//! Query model and predicate engine.
//!
//! A [`Query`] carries an optional [`WhereClause`] plus `limit`, `offset` and
//! an update patch. Where clauses are a tree of tagged variants:
//!
//! ```text
//! WhereClause    = [Clause]                       (all clauses AND-ed)
//! Clause         = Field(FieldPredicate)
//!                | Any([ConditionGroup])          (top-level `or`)
//!                | All([ConditionGroup])          (top-level `and`)
//! ConditionGroup = [FieldPredicate]               (all AND-ed)
//! Condition      = Equals(value) | Operators([SubCondition]) | AnyOf([SubCondition])
//! ```
//!
//! Queries are usually written as JSON and parsed with [`Query::from_json`]
//! or `serde`. Parsing validates every shape and compiles every pattern, so
//! evaluation itself cannot fail.
//!
//! ```
//! use secretdb_core::query::Query;
//! use serde_json::json;
//!
//! let query = Query::from_json(&json!({
//!     "where": {"or": [{"age": {"eq": 20}}, {"age": {"eq": 30}}]},
//!     "limit": 10
//! })).unwrap();
//!
//! let filter = query.filter.as_ref().unwrap();
//! assert!(filter.matches(&json!({"age": 30})));
//! assert!(!filter.matches(&json!({"age": 25})));
//! ```

mod eval;
mod parse;
mod pattern;

pub use pattern::Pattern;

use crate::error::QueryError;
use secretdb_codec::Record;
use serde::Deserialize;
use serde_json::Value;

/// A request against one table.
///
/// `limit` and `offset` are honored only by `find`; `data` is used only by
/// `update`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Query {
    /// The `where` clause. `None` selects every record.
    pub filter: Option<WhereClause>,
    /// Maximum number of matches returned by `find`.
    pub limit: Option<usize>,
    /// Number of leading records `find` skips before testing the filter.
    pub offset: Option<usize>,
    /// Fields merged into each matching record by `update`.
    pub data: Option<Record>,
}

impl Query {
    /// Creates an empty query that selects every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query from its JSON form.
    ///
    /// Recognized keys are `where`, `limit`, `offset` and `data`. A `null`
    /// value counts as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for any malformed shape, unknown operator,
    /// unknown key or uncompilable pattern.
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        parse::parse_query(value)
    }

    /// Sets the `where` clause.
    #[must_use]
    pub fn filter(mut self, filter: WhereClause) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the `limit`.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the `offset`.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the update patch.
    #[must_use]
    pub fn data(mut self, data: Record) -> Self {
        self.data = Some(data);
        self
    }
}

impl TryFrom<Value> for Query {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl std::str::FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| QueryError::invalid_query(e.to_string()))?;
        Self::from_json(&value)
    }
}

/// The predicate tree of a query. Every clause must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    clauses: Vec<Clause>,
}

impl WhereClause {
    /// Creates an empty clause, which matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `where` object.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] if the value is not a valid where clause.
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        parse::parse_where(value)
    }

    /// Adds a condition on one field.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses
            .push(Clause::Field(FieldPredicate::new(field, condition)));
        self
    }

    /// Adds a disjunction: at least one group must hold.
    #[must_use]
    pub fn any(mut self, groups: Vec<ConditionGroup>) -> Self {
        self.clauses.push(Clause::Any(groups));
        self
    }

    /// Adds a conjunction: every group must hold.
    #[must_use]
    pub fn all(mut self, groups: Vec<ConditionGroup>) -> Self {
        self.clauses.push(Clause::All(groups));
        self
    }

    /// Returns the clauses in evaluation order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns `true` if the clause has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Tests a record against every clause.
    ///
    /// Read-only and safe to call from many threads at once.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

impl TryFrom<Value> for WhereClause {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

/// One top-level entry of a [`WhereClause`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// A plain `field: condition` entry.
    Field(FieldPredicate),
    /// Top-level `or`: any group holds.
    Any(Vec<ConditionGroup>),
    /// Top-level `and`: every group holds.
    All(Vec<ConditionGroup>),
}

impl Clause {
    /// Tests a record against this clause.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Clause::Field(predicate) => predicate.matches(record),
            Clause::Any(groups) => groups.iter().any(|g| g.matches(record)),
            Clause::All(groups) => groups.iter().all(|g| g.matches(record)),
        }
    }
}

/// One element of an `or`/`and` sequence: field conditions that all hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroup {
    predicates: Vec<FieldPredicate>,
}

impl ConditionGroup {
    /// Creates a group holding one field condition.
    #[must_use]
    pub fn new(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            predicates: vec![FieldPredicate::new(field, condition)],
        }
    }

    /// Adds another field condition to the group.
    #[must_use]
    pub fn and(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.predicates.push(FieldPredicate::new(field, condition));
        self
    }

    /// Returns the predicates of this group.
    #[must_use]
    pub fn predicates(&self) -> &[FieldPredicate] {
        &self.predicates
    }

    /// Tests a record against every predicate of the group.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

/// A condition bound to a field name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    /// The top-level record field the condition reads.
    pub field: String,
    /// The condition applied to that field's value.
    pub condition: Condition,
}

impl FieldPredicate {
    /// Creates a predicate.
    #[must_use]
    pub fn new(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    /// Tests `record[field]` against the condition.
    ///
    /// A missing field (or a non-object record) is passed on as absent.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.condition.matches(record.get(&self.field))
    }
}

/// What a field's value must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A literal: strict equality.
    Equals(Value),
    /// An operator object: every operator holds.
    Operators(Vec<SubCondition>),
    /// A field-level `or`: any operator holds.
    AnyOf(Vec<SubCondition>),
}

impl Condition {
    /// Strict equality with a literal.
    #[must_use]
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::Equals(value.into())
    }

    /// A single operator.
    #[must_use]
    pub fn op(sub: SubCondition) -> Self {
        Self::Operators(vec![sub])
    }

    /// Field-level disjunction of operators.
    #[must_use]
    pub fn any_of(subs: Vec<SubCondition>) -> Self {
        Self::AnyOf(subs)
    }

    /// Tests a field value (`None` when absent).
    #[must_use]
    pub fn matches(&self, field: Option<&Value>) -> bool {
        match self {
            Condition::Equals(expected) => eval::strict_eq(field, expected),
            Condition::Operators(subs) => subs.iter().all(|s| s.matches(field)),
            Condition::AnyOf(subs) => subs.iter().any(|s| s.matches(field)),
        }
    }
}

/// A single operator with its operand.
#[derive(Debug, Clone, PartialEq)]
pub enum SubCondition {
    /// `eq`: strict equality.
    Eq(Value),
    /// `ne`: strict inequality.
    Ne(Value),
    /// `gte`: greater than or equal.
    Gte(Value),
    /// `lte`: less than or equal.
    Lte(Value),
    /// `gt`: greater than.
    Gt(Value),
    /// `lt`: less than.
    Lt(Value),
    /// `like`: case-insensitive pattern match.
    Like(Pattern),
    /// `LIKE`: case-sensitive pattern match.
    LikeCaseSensitive(Pattern),
}

impl SubCondition {
    /// `eq` operator.
    #[must_use]
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::Eq(value.into())
    }

    /// `ne` operator.
    #[must_use]
    pub fn ne(value: impl Into<Value>) -> Self {
        Self::Ne(value.into())
    }

    /// `gte` operator.
    #[must_use]
    pub fn gte(value: impl Into<Value>) -> Self {
        Self::Gte(value.into())
    }

    /// `lte` operator.
    #[must_use]
    pub fn lte(value: impl Into<Value>) -> Self {
        Self::Lte(value.into())
    }

    /// `gt` operator.
    #[must_use]
    pub fn gt(value: impl Into<Value>) -> Self {
        Self::Gt(value.into())
    }

    /// `lt` operator.
    #[must_use]
    pub fn lt(value: impl Into<Value>) -> Self {
        Self::Lt(value.into())
    }

    /// `like` with a regular expression, searched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if the regex does not compile.
    pub fn like(pattern: &str) -> Result<Self, QueryError> {
        Pattern::regex(pattern, false).map(Self::Like)
    }

    /// `LIKE` with a regular expression, searched case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if the regex does not compile.
    pub fn like_case_sensitive(pattern: &str) -> Result<Self, QueryError> {
        Pattern::regex(pattern, true).map(Self::LikeCaseSensitive)
    }

    /// `like` with `[prefix, suffix]`, compiled as `^prefix.*suffix$`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if the anchored pattern cannot
    /// be built.
    pub fn like_affix(prefix: &str, suffix: &str) -> Result<Self, QueryError> {
        Pattern::affix(prefix, suffix, false).map(Self::Like)
    }

    /// `LIKE` with `[prefix, suffix]`, compared case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if the anchored pattern cannot
    /// be built.
    pub fn like_case_sensitive_affix(prefix: &str, suffix: &str) -> Result<Self, QueryError> {
        Pattern::affix(prefix, suffix, true).map(Self::LikeCaseSensitive)
    }

    /// The operator key as written in JSON.
    #[must_use]
    pub fn operator(&self) -> &'static str {
        match self {
            SubCondition::Eq(_) => "eq",
            SubCondition::Ne(_) => "ne",
            SubCondition::Gte(_) => "gte",
            SubCondition::Lte(_) => "lte",
            SubCondition::Gt(_) => "gt",
            SubCondition::Lt(_) => "lt",
            SubCondition::Like(_) => "like",
            SubCondition::LikeCaseSensitive(_) => "LIKE",
        }
    }

    /// Tests a field value (`None` when absent).
    #[must_use]
    pub fn matches(&self, field: Option<&Value>) -> bool {
        use std::cmp::Ordering;

        match self {
            SubCondition::Eq(v) => eval::strict_eq(field, v),
            SubCondition::Ne(v) => !eval::strict_eq(field, v),
            SubCondition::Gte(v) => matches!(
                eval::compare(field, v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            SubCondition::Lte(v) => matches!(
                eval::compare(field, v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            SubCondition::Gt(v) => eval::compare(field, v) == Some(Ordering::Greater),
            SubCondition::Lt(v) => eval::compare(field, v) == Some(Ordering::Less),
            SubCondition::Like(p) | SubCondition::LikeCaseSensitive(p) => {
                eval::pattern_text(field).is_some_and(|text| p.is_match(&text))
            }
        }
    }
}
