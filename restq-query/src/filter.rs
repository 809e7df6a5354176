//! Filter clauses for building the `q` part of a collection read.
//!
//! A [`FilterClause`] is a `(field, operation, value)` triple. Clauses are
//! sent to the endpoint exactly as accumulated: no deduplication, no
//! validation of field names or operations, insertion order preserved.
//!
//! The [`Where`] type is the argument of
//! [`QueryBuilder::r#where`](crate::QueryBuilder::r#where) and covers its
//! three call shapes:
//!
//! ```rust
//! use restq_query::{FilterClause, Where};
//!
//! // (field, value): the operation defaults to "="
//! let w: Where = ("name", "alice").into();
//! assert_eq!(w.into_clauses(), vec![FilterClause::new("name", "=", "alice")]);
//!
//! // (field, operation, value)
//! let w: Where = ("age", ">", 18).into();
//! assert_eq!(w.into_clauses(), vec![FilterClause::new("age", ">", 18)]);
//!
//! // map of field -> value or [operation, value]
//! let w = Where::from_json(serde_json::json!({ "a": 1, "b": ["!=", 2] })).unwrap();
//! assert_eq!(
//!     w.into_clauses(),
//!     vec![FilterClause::new("a", "=", 1), FilterClause::new("b", "!=", 2)]
//! );
//! ```

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{QueryError, QueryResult};

/// The operation used when a clause does not name one.
pub const DEFAULT_OPERATION: &str = "=";

/// A filter value that can be used in comparisons.
///
/// Values are untyped as far as the builder is concerned; they serialize to
/// the plain JSON value they hold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<FilterValue>),
    /// Any other JSON value (objects, out-of-range numbers).
    Json(Value),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert into the JSON value sent on the wire.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(v) => Value::Bool(*v),
            Self::Int(v) => Value::from(*v),
            Self::Float(v) => Value::from(*v),
            Self::String(v) => Value::String(v.clone()),
            Self::List(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            Self::Json(v) => v.clone(),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::List(values) => values.serialize(serializer),
            Self::Json(v) => v.serialize(serializer),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FilterValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<Value> for FilterValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(f)) if n.is_f64() => Self::Float(f),
                _ => Self::Json(Value::Number(n)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            object @ Value::Object(_) => Self::Json(object),
        }
    }
}

/// A single `(field, operation, value)` filter directive.
///
/// Serializes as a three-element array: `["age", ">", 18]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Field name, passed through unchecked.
    pub field: String,
    /// Operation string, passed through unchecked.
    pub operation: String,
    /// Comparison value.
    pub value: FilterValue,
}

impl FilterClause {
    /// Create a clause with an explicit operation.
    pub fn new(
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operation: operation.into(),
            value: value.into(),
        }
    }

    /// Create an equality clause.
    pub fn equals(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, DEFAULT_OPERATION, value)
    }
}

impl Serialize for FilterClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.field)?;
        tuple.serialize_element(&self.operation)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

/// One entry of a [`Where::Map`].
#[derive(Debug, Clone, PartialEq)]
pub enum WhereEntry {
    /// Plain value compared with `=`.
    Value(FilterValue),
    /// Explicit `[operation, value]` pair.
    Op(String, FilterValue),
}

impl WhereEntry {
    /// Create an entry with an explicit operation.
    pub fn op(operation: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Op(operation.into(), value.into())
    }

    fn into_clause(self, field: String) -> FilterClause {
        match self {
            Self::Value(value) => FilterClause::equals(field, value),
            Self::Op(operation, value) => FilterClause::new(field, operation, value),
        }
    }
}

macro_rules! where_entry_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for WhereEntry {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )+
    };
}

where_entry_from!(FilterValue, bool, i32, i64, u32, f64, String, &str);

impl From<Value> for WhereEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(mut pair) if pair.len() == 2 && pair[0].is_string() => {
                let value = pair.pop().unwrap_or(Value::Null);
                match pair.pop() {
                    Some(Value::String(operation)) => Self::Op(operation, value.into()),
                    _ => Self::Value(FilterValue::Null),
                }
            }
            other => Self::Value(other.into()),
        }
    }
}

/// Argument of `where`: a single clause or a field map.
///
/// The variant is chosen by the caller's argument shape, never by looking
/// at the value: a two-element tuple is always `(field, value)`, a
/// three-element tuple is always `(field, operation, value)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// A single resolved clause.
    Clause(FilterClause),
    /// Field map, expanded in insertion order.
    Map(IndexMap<String, WhereEntry>),
}

impl Where {
    /// Build a map-shaped filter from a JSON object.
    ///
    /// Entries that are two-element arrays starting with a string are read as
    /// `[operation, value]`; everything else is an equality value. Other
    /// arrays, such as `[1, 2]` or `["in", 1, 2]`, are not pairs: they are
    /// compared with `=` as a whole list.
    pub fn from_json(value: Value) -> QueryResult<Self> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(QueryError::invalid_filter(format!(
                "expected a JSON object of filters, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Start an empty field map.
    pub fn map() -> Self {
        Self::Map(IndexMap::new())
    }

    /// Add an entry to a field map. A clause is first turned into a map.
    pub fn and(self, field: impl Into<String>, entry: impl Into<WhereEntry>) -> Self {
        let mut map = match self {
            Self::Map(map) => map,
            Self::Clause(clause) => {
                let mut map = IndexMap::new();
                map.insert(clause.field, WhereEntry::Op(clause.operation, clause.value));
                map
            }
        };
        map.insert(field.into(), entry.into());
        Self::Map(map)
    }

    /// Resolve into clauses in the order they will be sent.
    pub fn into_clauses(self) -> Vec<FilterClause> {
        match self {
            Self::Clause(clause) => vec![clause],
            Self::Map(map) => map
                .into_iter()
                .map(|(field, entry)| entry.into_clause(field))
                .collect(),
        }
    }
}

impl From<FilterClause> for Where {
    fn from(clause: FilterClause) -> Self {
        Self::Clause(clause)
    }
}

impl<F, V> From<(F, V)> for Where
where
    F: Into<String>,
    V: Into<FilterValue>,
{
    fn from((field, value): (F, V)) -> Self {
        Self::Clause(FilterClause::equals(field, value))
    }
}

impl<F, O, V> From<(F, O, V)> for Where
where
    F: Into<String>,
    O: Into<String>,
    V: Into<FilterValue>,
{
    fn from((field, operation, value): (F, O, V)) -> Self {
        Self::Clause(FilterClause::new(field, operation, value))
    }
}

impl From<IndexMap<String, WhereEntry>> for Where {
    fn from(map: IndexMap<String, WhereEntry>) -> Self {
        Self::Map(map)
    }
}

impl From<serde_json::Map<String, Value>> for Where {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self::Map(
            map.into_iter()
                .map(|(field, value)| (field, WhereEntry::from(value)))
                .collect(),
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
