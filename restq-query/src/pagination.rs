//! Page cursor over a paginated collection read.
//!
//! [`QueryBuilder::paginate`](crate::QueryBuilder::paginate) issues the first
//! read and returns a [`Pagination`] right away. The cursor becomes loaded
//! once [`Pagination::ready`] resolves, and can then move between pages; each
//! move is a new `get` carrying `p` (page size) and `page`.
//!
//! Responses are read as a page envelope:
//!
//! ```json
//! { "data": [...], "current_page": 2, "last_page": 5, "per_page": 20, "total": 93, "from": 21, "to": 40 }
//! ```
//!
//! Missing metadata is derived from what is present, and a bare JSON array
//! is accepted as a single page holding every item.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::query::QueryBuilder;
use crate::traits::{Client, Response, ResponseFuture};
use crate::types::GetOptions;

/// One fetched page and its position in the result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The items on this page.
    pub items: Vec<Value>,
    /// 1-based index of this page.
    pub current_page: u32,
    /// Index of the last available page (at least 1).
    pub last_page: u32,
    /// Page size reported for this page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// 1-based position of the first item on this page, if any.
    pub from: Option<u64>,
    /// 1-based position of the last item on this page, if any.
    pub to: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Vec<Value>,
    current_page: Option<u32>,
    last_page: Option<u32>,
    per_page: Option<u32>,
    total: Option<u64>,
    from: Option<u64>,
    to: Option<u64>,
}

impl Page {
    /// Parse a page from an endpoint response.
    ///
    /// `requested_per_page` is used when the response does not report one.
    pub fn from_response(response: Response, requested_per_page: u32) -> QueryResult<Self> {
        let envelope = match response {
            Value::Array(items) => Envelope {
                data: items,
                current_page: Some(1),
                last_page: Some(1),
                per_page: None,
                total: None,
                from: None,
                to: None,
            },
            object @ Value::Object(_) => serde_json::from_value(object)
                .map_err(|e| QueryError::deserialization(e.to_string()))?,
            other => {
                return Err(QueryError::deserialization(format!(
                    "expected a page object or an array, got `{}`",
                    other
                )));
            }
        };

        let per_page = envelope.per_page.filter(|&n| n > 0).unwrap_or(requested_per_page.max(1));
        let current_page = envelope.current_page.unwrap_or(1).max(1);
        let total = envelope.total.unwrap_or_else(|| {
            (current_page as u64 - 1) * per_page as u64 + envelope.data.len() as u64
        });
        let last_page = envelope
            .last_page
            .unwrap_or_else(|| u32::try_from(total.div_ceil(per_page as u64)).unwrap_or(u32::MAX))
            .max(1);

        let (from, to) = match (envelope.from, envelope.to) {
            (Some(from), Some(to)) => (Some(from), Some(to)),
            _ if envelope.data.is_empty() => (None, None),
            _ => {
                let from = (current_page as u64 - 1) * per_page as u64 + 1;
                (Some(from), Some(from + envelope.data.len() as u64 - 1))
            }
        };

        Ok(Self {
            items: envelope.data,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        })
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Whether a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Cursor over the pages of one collection read.
///
/// Holds a copy of the originating builder with the clauses it had when
/// `paginate` was called, the page size, and the last loaded page.
pub struct Pagination<C: Client + Clone> {
    query: QueryBuilder<C>,
    per_page: u32,
    page: Option<Page>,
    pending: Option<ResponseFuture>,
}

impl<C: Client + Clone> Pagination<C> {
    /// Wrap an in-flight first read.
    pub fn new(query: QueryBuilder<C>, per_page: u32, fetch: ResponseFuture) -> Self {
        Self {
            query,
            per_page,
            page: None,
            pending: Some(fetch),
        }
    }

    /// Wait for the in-flight read, if any, and return the loaded page.
    pub async fn ready(&mut self) -> QueryResult<&Page> {
        if let Some(fetch) = self.pending.take() {
            let response = fetch.await?;
            self.fetch_complete(response)?;
        }
        self.page.as_ref().ok_or_else(QueryError::cursor_not_ready)
    }

    /// Whether a page has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.page.is_some()
    }

    /// Whether a read is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The last loaded page.
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Items of the last loaded page (empty until loaded).
    pub fn items(&self) -> &[Value] {
        self.page.as_ref().map(|page| page.items.as_slice()).unwrap_or_default()
    }

    /// Page size used for every read of this cursor.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Index of the loaded page, 0 until loaded.
    pub fn current_page(&self) -> u32 {
        self.page.as_ref().map_or(0, |page| page.current_page)
    }

    /// Index of the last page, 0 until loaded.
    pub fn last_page(&self) -> u32 {
        self.page.as_ref().map_or(0, |page| page.last_page)
    }

    /// Total number of items, 0 until loaded.
    pub fn total(&self) -> u64 {
        self.page.as_ref().map_or(0, |page| page.total)
    }

    /// Whether a page follows the loaded one.
    pub fn has_next(&self) -> bool {
        self.page.as_ref().is_some_and(Page::has_next)
    }

    /// Whether a page precedes the loaded one.
    pub fn has_previous(&self) -> bool {
        self.page.as_ref().is_some_and(Page::has_previous)
    }

    /// The builder snapshot pages are read through.
    pub fn query(&self) -> &QueryBuilder<C> {
        &self.query
    }

    /// Load the page after the current one.
    pub async fn next_page(&mut self) -> QueryResult<&Page> {
        let page = self.ready().await?;
        let (current, last_page) = (page.current_page, page.last_page);
        match current.checked_add(1) {
            Some(next) => self.go_to(next).await,
            None => Err(QueryError::page_out_of_range(current, last_page)
                .with_collection(self.query.name())),
        }
    }

    /// Load the page before the current one.
    pub async fn previous_page(&mut self) -> QueryResult<&Page> {
        let current = self.ready().await?.current_page;
        self.go_to(current.saturating_sub(1)).await
    }

    /// Load page `number` (1-based).
    ///
    /// Fails without a request when `number` is outside `1..=last_page`.
    pub async fn go_to(&mut self, number: u32) -> QueryResult<&Page> {
        let last_page = self.ready().await?.last_page;
        if number == 0 || number > last_page {
            return Err(QueryError::page_out_of_range(number, last_page)
                .with_collection(self.query.name()));
        }

        debug!(
            collection = %self.query.name(),
            page = number,
            per_page = self.per_page,
            "Fetching page"
        );

        let mut query = self.query.clone();
        let fetch = query.get(GetOptions::new().paginate(self.per_page).page(number));
        let response = fetch.await?;
        self.fetch_complete(response)?;
        self.page.as_ref().ok_or_else(QueryError::cursor_not_ready)
    }

    fn fetch_complete(&mut self, response: Response) -> QueryResult<()> {
        let page = Page::from_response(response, self.per_page)?;
        debug!(
            collection = %self.query.name(),
            page = page.current_page,
            last_page = page.last_page,
            items = page.items.len(),
            "Page loaded"
        );
        self.page = Some(page);
        Ok(())
    }
}

impl<C: Client + Clone> std::fmt::Debug for Pagination<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pagination")
            .field("collection", &self.query.name())
            .field("per_page", &self.per_page)
            .field("page", &self.page)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
