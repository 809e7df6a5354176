//! Ordering types and the read payload.

use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::fmt;

use crate::filter::FilterClause;

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// Get the wire keyword for this sort order.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Normalize a numeric direction: `-1` is descending, anything else ascending.
    pub fn from_number(direction: i64) -> Self {
        if direction == -1 { Self::Desc } else { Self::Asc }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<i32> for SortOrder {
    fn from(direction: i32) -> Self {
        Self::from_number(direction as i64)
    }
}

impl From<i64> for SortOrder {
    fn from(direction: i64) -> Self {
        Self::from_number(direction)
    }
}

impl From<&str> for SortOrder {
    fn from(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

impl From<String> for SortOrder {
    fn from(direction: String) -> Self {
        Self::from(direction.as_str())
    }
}

impl<T: Into<SortOrder>> From<Option<T>> for SortOrder {
    fn from(direction: Option<T>) -> Self {
        direction.map(Into::into).unwrap_or_default()
    }
}

/// A single `(field, direction)` ordering directive.
///
/// Serializes as a two-element array: `["name", "asc"]`.
///
/// ```rust
/// use restq_query::{SortClause, SortOrder};
///
/// let clause: SortClause = "name".into();
/// assert_eq!(clause.order, SortOrder::Asc);
///
/// let clause: SortClause = ("created_at", -1).into();
/// assert_eq!(clause.order, SortOrder::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    /// The field to order by.
    pub field: String,
    /// The normalized direction.
    pub order: SortOrder,
}

impl SortClause {
    /// Create a new sort clause.
    pub fn new(field: impl Into<String>, order: impl Into<SortOrder>) -> Self {
        Self {
            field: field.into(),
            order: order.into(),
        }
    }

    /// Ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

impl Serialize for SortClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.field)?;
        tuple.serialize_element(&self.order)?;
        tuple.end()
    }
}

impl From<&str> for SortClause {
    fn from(field: &str) -> Self {
        Self::asc(field)
    }
}

impl From<String> for SortClause {
    fn from(field: String) -> Self {
        Self::asc(field)
    }
}

impl<F, D> From<(F, D)> for SortClause
where
    F: Into<String>,
    D: Into<SortOrder>,
{
    fn from((field, direction): (F, D)) -> Self {
        Self::new(field, direction)
    }
}

/// Options accepted by a collection read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Page size; sent as `p`. Zero counts as unset.
    pub paginate: Option<u32>,
    /// Page number; sent as `page`.
    pub page: Option<u32>,
}

impl GetOptions {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn paginate(mut self, per_page: u32) -> Self {
        self.paginate = Some(per_page);
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// The query object sent with a collection read.
///
/// Keys are only present when they carry something: an empty builder
/// produces `{}`, never empty arrays.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Query {
    /// Filter clauses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<Vec<FilterClause>>,
    /// Sort clauses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<Vec<SortClause>>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Query {
    /// Build a query from accumulated clauses and read options.
    pub fn build(filters: Vec<FilterClause>, ordering: Vec<SortClause>, options: GetOptions) -> Self {
        Self {
            q: (!filters.is_empty()).then_some(filters),
            s: (!ordering.is_empty()).then_some(ordering),
            p: options.paginate.filter(|&n| n > 0),
            page: options.page,
        }
    }

    /// Check if no key would be sent.
    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.s.is_none() && self.p.is_none() && self.page.is_none()
    }

    /// The JSON object form of this query.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_numeric_direction_normalization() {
        assert_eq!(SortOrder::from(-1), SortOrder::Desc);
        assert_eq!(SortOrder::from(1), SortOrder::Asc);
        assert_eq!(SortOrder::from(0), SortOrder::Asc);
        assert_eq!(SortOrder::from(-2), SortOrder::Asc);
    }

    #[test]
    fn test_string_direction_normalization() {
        assert_eq!(SortOrder::from("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::from("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from(""), SortOrder::Asc);
    }

    #[test]
    fn test_missing_direction_is_asc() {
        assert_eq!(SortOrder::from(None::<i32>), SortOrder::Asc);
        assert_eq!(SortOrder::from(Some(-1)), SortOrder::Desc);
    }

    #[test]
    fn test_sort_clause_serializes_as_pair() {
        let clause = SortClause::desc("score");
        assert_eq!(serde_json::to_value(&clause).unwrap(), json!(["score", "desc"]));
    }

    #[test]
    fn test_empty_query_is_empty_object() {
        let query = Query::build(Vec::new(), Vec::new(), GetOptions::new());
        assert!(query.is_empty());
        assert_eq!(query.to_json(), json!({}));
    }

    #[test]
    fn test_zero_page_size_is_unset() {
        let query = Query::build(Vec::new(), Vec::new(), GetOptions::new().paginate(0));
        assert_eq!(query.p, None);
    }

    #[test]
    fn test_full_query_shape() {
        let query = Query::build(
            vec![FilterClause::new("age", ">", 18)],
            vec![SortClause::asc("name")],
            GetOptions::new().paginate(20).page(2),
        );
        assert_eq!(
            query.to_json(),
            json!({
                "q": [["age", ">", 18]],
                "s": [["name", "asc"]],
                "p": 20,
                "page": 2
            })
        );
    }
}
