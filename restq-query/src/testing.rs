//! Recording client used by the unit tests.

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::QueryError;
use crate::traits::{Client, ResponseFuture};
use crate::types::Query;

#[derive(Debug, Clone)]
pub(crate) struct GetRequest {
    pub path: String,
    pub query: Value,
}

#[derive(Debug, Clone)]
pub(crate) struct PostRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Debug)]
pub(crate) struct MockClient {
    response: Mutex<Value>,
    failure: Option<String>,
    gets: Mutex<Vec<GetRequest>>,
    posts: Mutex<Vec<PostRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::with_response(json!({ "ok": true }))
    }

    pub fn with_response(response: Value) -> Self {
        Self {
            response: Mutex::new(response),
            failure: None,
            gets: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn set_response(&self, response: Value) {
        *self.response.lock() = response;
    }

    pub fn response(&self) -> Value {
        self.response.lock().clone()
    }

    pub fn gets(&self) -> Vec<GetRequest> {
        self.gets.lock().clone()
    }

    pub fn posts(&self) -> Vec<PostRequest> {
        self.posts.lock().clone()
    }

    pub fn last_get(&self) -> Option<GetRequest> {
        self.gets.lock().last().cloned()
    }

    pub fn last_post(&self) -> Option<PostRequest> {
        self.posts.lock().last().cloned()
    }

    fn reply(&self) -> ResponseFuture {
        let result = match &self.failure {
            Some(message) => Err(QueryError::transport(message.clone())),
            None => Ok(self.response()),
        };
        Box::pin(async move { result })
    }
}

impl Client for MockClient {
    fn get(&self, path: &str, query: &Query) -> ResponseFuture {
        self.gets.lock().push(GetRequest {
            path: path.to_string(),
            query: query.to_json(),
        });
        self.reply()
    }

    fn post(&self, path: &str, body: Value) -> ResponseFuture {
        self.posts.lock().push(PostRequest {
            path: path.to_string(),
            body,
        });
        self.reply()
    }
}
