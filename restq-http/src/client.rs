//! reqwest-backed collection client.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use restq_query::{Client, Query, QueryBuilder, QueryError, Response, ResponseFuture};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{HttpConfig, HttpConfigBuilder};
use crate::error::{HttpError, HttpResult};

/// An HTTP client for collection endpoints.
///
/// Cloning is cheap: the underlying `reqwest::Client` pools connections
/// and the configuration is shared.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    config: Arc<HttpConfig>,
}

impl HttpClient {
    /// Create a new client from configuration.
    pub fn new(config: HttpConfig) -> HttpResult<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::config(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| HttpError::config(format!("invalid value for header {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms(),
            "HTTP client created"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Create a client for a base URL with default settings.
    pub fn from_url(url: &str) -> HttpResult<Self> {
        Self::new(HttpConfig::from_url(url)?)
    }

    /// Create a client configured from `RESTQ_URL` and `RESTQ_TIMEOUT_MS`.
    pub fn from_env() -> HttpResult<Self> {
        Self::new(HttpConfig::from_env()?)
    }

    /// Create a builder for the client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a query against a named collection.
    pub fn collection(&self, name: impl Into<String>) -> QueryBuilder<Self> {
        QueryBuilder::new(self.clone(), name)
    }

    /// Get the configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve a collection path against the base URL.
    pub fn url_for(&self, path: &str) -> HttpResult<Url> {
        Ok(self.config.base_url.join(path.trim_start_matches('/'))?)
    }

    fn dispatch(&self, request: HttpResult<reqwest::RequestBuilder>, path: &str) -> ResponseFuture {
        let request = match request {
            Ok(request) => request,
            Err(e) => return future::ready(Err(QueryError::from(e).with_path(path))).boxed(),
        };
        let path = path.to_string();
        let timeout_ms = self.config.timeout_ms();

        async move {
            let result = execute(request, &path, timeout_ms).await;
            result.map_err(|e| QueryError::from(e).with_path(path))
        }
        .boxed()
    }
}

impl Client for HttpClient {
    fn get(&self, path: &str, query: &Query) -> ResponseFuture {
        let request = encode_query(query).and_then(|params| {
            debug!(path = %path, params = params.len(), "GET");
            Ok(self.http.get(self.url_for(path)?).query(&params))
        });
        self.dispatch(request, path)
    }

    fn post(&self, path: &str, body: Value) -> ResponseFuture {
        debug!(path = %path, "POST");
        let request = self.url_for(path).map(|url| self.http.post(url).json(&body));
        self.dispatch(request, path)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

/// Encode a read query as URL parameters.
///
/// `q` and `s` are sent as JSON text, `p` and `page` as decimal integers.
/// Absent keys produce no parameter.
pub fn encode_query(query: &Query) -> HttpResult<Vec<(String, String)>> {
    let mut params = Vec::with_capacity(4);

    if let Some(filters) = &query.q {
        let text = serde_json::to_string(filters).map_err(|e| HttpError::Decode(e.to_string()))?;
        params.push(("q".to_string(), text));
    }
    if let Some(ordering) = &query.s {
        let text = serde_json::to_string(ordering).map_err(|e| HttpError::Decode(e.to_string()))?;
        params.push(("s".to_string(), text));
    }
    if let Some(per_page) = query.p {
        params.push(("p".to_string(), per_page.to_string()));
    }
    if let Some(page) = query.page {
        params.push(("page".to_string(), page.to_string()));
    }

    Ok(params)
}

async fn execute(request: reqwest::RequestBuilder, path: &str, timeout_ms: u64) -> HttpResult<Response> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            HttpError::Timeout(timeout_ms)
        } else {
            HttpError::Request(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(path = %path, status = %status, "Request failed with non-success status");
        return Err(HttpError::status(status.as_u16(), body));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
}

/// Builder for the HTTP client.
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpConfigBuilder,
}

impl HttpClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.timeout(duration);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(agent);
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.header(name, value);
        self
    }

    /// Build the client.
    pub fn build(self) -> HttpResult<HttpClient> {
        HttpClient::new(self.config.build()?)
    }
}
