//! # restq-query
//!
//! Clause-accumulating query builder for REST collection endpoints.
//!
//! This crate provides:
//! - [`QueryBuilder`]: filter and sort accumulation over a named collection
//! - Finalizers: `get`, `create`, `paginate`
//! - [`Pagination`]: a page cursor that re-reads through the builder
//! - The [`Client`] capability the builder delegates every request to
//!
//! Transport is not part of this crate; `restq-http` provides a `reqwest`
//! implementation of [`Client`].
//!
//! ## Filters
//!
//! ```rust
//! use restq_query::{FilterClause, Where};
//!
//! let clauses = Where::from(("age", ">", 18)).into_clauses();
//! assert_eq!(clauses, vec![FilterClause::new("age", ">", 18)]);
//! ```
//!
//! ## Sorting
//!
//! ```rust
//! use restq_query::{SortClause, SortOrder};
//!
//! assert_eq!(SortClause::from(("name", -1)).order, SortOrder::Desc);
//! assert_eq!(SortClause::from("name").order, SortOrder::Asc);
//! ```
//!
//! ## Read payload
//!
//! ```rust
//! use restq_query::{FilterClause, GetOptions, Query, SortClause};
//!
//! let query = Query::build(
//!     vec![FilterClause::new("age", ">", 18)],
//!     vec![SortClause::asc("name")],
//!     GetOptions::new(),
//! );
//! assert_eq!(
//!     query.to_json(),
//!     serde_json::json!({ "q": [["age", ">", 18]], "s": [["name", "asc"]] })
//! );
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use restq_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::page_out_of_range(9, 3);
//! assert_eq!(err.code, ErrorCode::PageOutOfRange);
//! ```

pub mod defaults;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pagination;
pub mod query;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use defaults::Defaults;
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use filter::{FilterClause, FilterValue, Where, WhereEntry};
pub use pagination::{Page, Pagination};
pub use query::QueryBuilder;
pub use traits::{BoxFuture, Client, Queryable, Response, ResponseFuture};
pub use types::{GetOptions, Query, SortClause, SortOrder};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, init_with_level, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::filter::{FilterClause, FilterValue, Where, WhereEntry};
    pub use crate::pagination::{Page, Pagination};
    pub use crate::query::QueryBuilder;
    pub use crate::traits::{Client, Queryable, Response};
    pub use crate::types::{GetOptions, SortClause, SortOrder};
}
