//! The collection query builder.

use std::future::IntoFuture;

use futures::FutureExt;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::defaults;
use crate::error::{QueryError, QueryResult};
use crate::filter::{FilterClause, Where};
use crate::pagination::Pagination;
use crate::traits::{BoxFuture, Client, Queryable, Response, ResponseFuture};
use crate::types::{GetOptions, Query, SortClause};

/// Path prefix shared by every collection endpoint.
pub const COLLECTION_PREFIX: &str = "collection/";

/// Accumulates filter and sort clauses for one named collection.
///
/// Clause methods append and return `&mut Self` for chaining. Finalizers
/// send the accumulated state through the client:
/// [`get`](QueryBuilder::get) snapshots and clears both accumulators before
/// the request goes out, [`create`](QueryBuilder::create) leaves them alone.
///
/// `&mut QueryBuilder` is awaitable; each `.await` is a fresh `get()`.
///
/// # Example
///
/// ```rust,ignore
/// let mut users = QueryBuilder::new(client, "users");
///
/// let adults = users
///     .r#where(("age", ">", 18))
///     .order_by("name")
///     .await?;
/// ```
#[derive(Clone)]
pub struct QueryBuilder<C: Client + Clone> {
    client: C,
    name: String,
    filters: Vec<FilterClause>,
    ordering: Vec<SortClause>,
}

impl<C: Client + Clone> QueryBuilder<C> {
    /// Create a builder for the collection `name`.
    pub fn new(client: C, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            filters: Vec::new(),
            ordering: Vec::new(),
        }
    }

    /// The collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The endpoint path, `collection/{name}`.
    pub fn path(&self) -> String {
        format!("{}{}", COLLECTION_PREFIX, self.name)
    }

    /// The client capability this builder delegates to.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Filter clauses accumulated so far.
    pub fn filters(&self) -> &[FilterClause] {
        &self.filters
    }

    /// Sort clauses accumulated so far.
    pub fn ordering(&self) -> &[SortClause] {
        &self.ordering
    }

    /// Create a record: `POST collection/{name}` with body `{"data": data}`.
    ///
    /// Accumulated clauses are not touched. If `data` cannot be serialized
    /// the future resolves to a serialization error and nothing is sent.
    pub fn create<T: Serialize + ?Sized>(&self, data: &T) -> ResponseFuture {
        let path = self.path();
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(e) => {
                let err = QueryError::serialization(e.to_string())
                    .with_collection(&self.name)
                    .with_path(path);
                return futures::future::ready(Err(err)).boxed();
            }
        };

        debug!(collection = %self.name, path = %path, "Creating record");
        self.client.post(&path, json!({ "data": data }))
    }

    /// Add filter clauses.
    ///
    /// Accepts `(field, value)`, `(field, operation, value)`, a
    /// [`FilterClause`], or a field map (see [`Where`]). Clauses are appended
    /// in order; nothing is validated or deduplicated.
    pub fn r#where(&mut self, filter: impl Into<Where>) -> &mut Self {
        for clause in filter.into().into_clauses() {
            crate::restq_debug!(
                collection = %self.name,
                field = %clause.field,
                operation = %clause.operation,
                "Adding filter clause"
            );
            self.filters.push(clause);
        }
        self
    }

    /// Add a sort clause.
    ///
    /// A bare field name sorts ascending; `(field, direction)` accepts `-1`
    /// or `"desc"` for descending, anything else is ascending.
    pub fn order_by(&mut self, clause: impl Into<SortClause>) -> &mut Self {
        self.ordering.push(clause.into());
        self
    }

    /// Clear the filter clauses. Ordering is kept.
    pub fn reset(&mut self) -> &mut Self {
        self.filters.clear();
        self
    }

    /// Preview the query object a `get` with these options would send.
    ///
    /// Nothing is cleared.
    pub fn build_query(&self, options: GetOptions) -> Query {
        Query::build(self.filters.clone(), self.ordering.clone(), options)
    }

    /// Read the collection: `GET collection/{name}`.
    ///
    /// Both accumulators are cleared before the request is issued, whether or
    /// not it later succeeds. A builder with no clauses and no options sends
    /// an empty query object.
    pub fn get(&mut self, options: GetOptions) -> ResponseFuture {
        let filters = std::mem::take(&mut self.filters);
        let ordering = std::mem::take(&mut self.ordering);
        let query = Query::build(filters, ordering, options);
        let path = self.path();

        debug!(
            collection = %self.name,
            filters = query.q.as_ref().map_or(0, Vec::len),
            sorts = query.s.as_ref().map_or(0, Vec::len),
            per_page = ?query.p,
            page = ?query.page,
            "Reading collection"
        );

        self.client.get(&path, &query)
    }

    /// Read the first page and return a cursor over it.
    ///
    /// `per_page` falls back to the process-wide default. The read is issued
    /// before this returns; the cursor is not loaded until
    /// [`Pagination::ready`] resolves. The cursor keeps a copy of the
    /// clauses so later pages use the same filters and ordering.
    pub fn paginate(&mut self, per_page: impl Into<Option<u32>>) -> Pagination<C> {
        let per_page = per_page
            .into()
            .filter(|&n| n > 0)
            .unwrap_or_else(defaults::per_page);

        let snapshot = self.clone();
        let fetch = self.get(GetOptions::new().paginate(per_page));
        Pagination::new(snapshot, per_page, fetch)
    }

    /// Paginate, then hand the loaded cursor to `callback`.
    ///
    /// The first read is issued immediately; the returned future resolves
    /// once the page is loaded and the callback has run. The callback is not
    /// called when the read fails.
    pub fn paginate_with<F>(
        &mut self,
        per_page: impl Into<Option<u32>>,
        callback: F,
    ) -> BoxFuture<'static, QueryResult<Pagination<C>>>
    where
        C: 'static,
        F: FnOnce(&Pagination<C>) + Send + 'static,
    {
        let mut cursor = self.paginate(per_page);
        async move {
            cursor.ready().await?;
            callback(&cursor);
            Ok(cursor)
        }
        .boxed()
    }

    /// Update a single record. Not supported: always fails without a request.
    pub fn update<T: Serialize + ?Sized>(
        &self,
        id: impl Into<String>,
        _data: &T,
    ) -> QueryResult<ResponseFuture> {
        let id = id.into();
        Err(QueryError::not_implemented("update")
            .with_collection(&self.name)
            .with_path(format!("{}/{}", self.path(), id)))
    }

    /// Update every record matching the filters. Not supported: always fails
    /// without a request.
    pub fn update_all<T: Serialize + ?Sized>(&self, _data: &T) -> QueryResult<ResponseFuture> {
        Err(QueryError::not_implemented("update_all").with_collection(&self.name))
    }
}

impl<C: Client + Clone> Queryable for QueryBuilder<C> {
    fn get(&mut self, options: GetOptions) -> ResponseFuture {
        QueryBuilder::get(self, options)
    }
}

impl<C: Client + Clone> IntoFuture for &mut QueryBuilder<C> {
    type Output = QueryResult<Response>;
    type IntoFuture = ResponseFuture;

    fn into_future(self) -> Self::IntoFuture {
        self.get(GetOptions::default())
    }
}

impl<C: Client + Clone> std::fmt::Debug for QueryBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("name", &self.name)
            .field("filters", &self.filters)
            .field("ordering", &self.ordering)
            .finish_non_exhaustive()
    }
}
