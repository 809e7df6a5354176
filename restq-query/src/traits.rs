//! Capability traits the builder is written against.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::types::{GetOptions, Query};

/// A boxed future, as returned by client capabilities.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The decoded body of an endpoint response.
pub type Response = Value;

/// The future every finalizer hands back.
pub type ResponseFuture = BoxFuture<'static, QueryResult<Response>>;

/// The networking collaborator a [`QueryBuilder`](crate::QueryBuilder) delegates to.
///
/// Both methods are called synchronously by the finalizers: the request is
/// issued at call time and the returned future only resolves it. The future
/// must own everything it needs, so it can outlive the borrow of `self`.
pub trait Client: Send + Sync {
    /// Issue a read against `path` with the given query object.
    fn get(&self, path: &str, query: &Query) -> ResponseFuture;

    /// Issue a write against `path` with the given JSON body.
    fn post(&self, path: &str, body: Value) -> ResponseFuture;
}

impl<C: Client + ?Sized> Client for Arc<C> {
    fn get(&self, path: &str, query: &Query) -> ResponseFuture {
        (**self).get(path, query)
    }

    fn post(&self, path: &str, body: Value) -> ResponseFuture {
        (**self).post(path, body)
    }
}

/// Something that can be read, and awaited like a promise.
///
/// `then` is a convenience over [`get`](Queryable::get): it issues a fresh
/// read on every call, runs the matching handler when the read settles, and
/// resolves to the read's own outcome rather than the handler's.
///
/// The handlers run only when the returned future is polled. Dropping it
/// unpolled skips both handlers, and with a lazily sending client such as
/// `HttpClient` the request is never sent.
pub trait Queryable {
    /// Issue a read with the given options.
    fn get(&mut self, options: GetOptions) -> ResponseFuture;

    /// Issue a read and attach fulfillment and rejection handlers.
    fn then<F, R>(&mut self, on_fulfilled: F, on_rejected: R) -> ResponseFuture
    where
        F: FnOnce(&Response) + Send + 'static,
        R: FnOnce(&QueryError) + Send + 'static,
    {
        use futures::FutureExt;

        self.get(GetOptions::default())
            .inspect(move |result| match result {
                Ok(response) => on_fulfilled(response),
                Err(err) => on_rejected(err),
            })
            .boxed()
    }
}
