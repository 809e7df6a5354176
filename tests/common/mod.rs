//! Shared test helpers: a client that records every request it receives.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use futures::FutureExt;
use futures::channel::oneshot;
use parking_lot::Mutex;
use restq::{Client, Query, QueryBuilder, QueryError, ResponseFuture};
use serde_json::{Value, json};

/// A request seen by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Get { path: String, query: Value },
    Post { path: String, body: Value },
}

/// Client that records requests and replays queued responses.
///
/// When the queue is empty every request resolves to the fallback response.
#[derive(Debug)]
pub struct RecordingClient {
    requests: Mutex<Vec<Request>>,
    queued: Mutex<VecDeque<Result<Value, String>>>,
    fallback: Value,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Self::with_fallback(json!({ "ok": true }))
    }

    pub fn with_fallback(fallback: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            queued: Mutex::new(VecDeque::new()),
            fallback,
        })
    }

    /// Queue a successful response.
    pub fn respond(&self, value: Value) {
        self.queued.lock().push_back(Ok(value));
    }

    /// Queue a transport failure.
    pub fn fail(&self, message: &str) {
        self.queued.lock().push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn gets(&self) -> Vec<(String, Value)> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| match r {
                Request::Get { path, query } => Some((path.clone(), query.clone())),
                Request::Post { .. } => None,
            })
            .collect()
    }

    pub fn last_query(&self) -> Option<Value> {
        self.gets().pop().map(|(_, query)| query)
    }

    fn next_reply(&self) -> ResponseFuture {
        let reply = self
            .queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));
        async move { reply.map_err(QueryError::transport) }.boxed()
    }
}

impl Client for RecordingClient {
    fn get(&self, path: &str, query: &Query) -> ResponseFuture {
        self.requests.lock().push(Request::Get {
            path: path.to_string(),
            query: query.to_json(),
        });
        self.next_reply()
    }

    fn post(&self, path: &str, body: Value) -> ResponseFuture {
        self.requests.lock().push(Request::Post {
            path: path.to_string(),
            body,
        });
        self.next_reply()
    }
}

/// Client whose reads stay pending until released.
#[derive(Debug, Default)]
pub struct GatedClient {
    gates: Mutex<Vec<oneshot::Sender<Value>>>,
    reads: Mutex<usize>,
}

impl GatedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock()
    }

    /// Resolve the oldest pending read with `value`.
    pub fn release(&self, value: Value) {
        let mut gates = self.gates.lock();
        if !gates.is_empty() {
            let _ = gates.remove(0).send(value);
        }
    }
}

impl Client for GatedClient {
    fn get(&self, _path: &str, _query: &Query) -> ResponseFuture {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push(tx);
        *self.reads.lock() += 1;
        async move { rx.await.map_err(|_| QueryError::transport("gate dropped")) }.boxed()
    }

    fn post(&self, _path: &str, body: Value) -> ResponseFuture {
        async move { Ok(body) }.boxed()
    }
}

pub fn users<C: Client + Clone>(client: C) -> QueryBuilder<C> {
    QueryBuilder::new(client, "users")
}
