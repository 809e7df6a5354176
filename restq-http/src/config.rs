//! HTTP client configuration.

use std::time::Duration;

use restq_query::defaults::{EnvSource, StdEnvSource};
use url::Url;

use crate::error::{HttpError, HttpResult};

/// Environment variable holding the API base URL.
pub const URL_ENV: &str = "RESTQ_URL";

/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "RESTQ_TIMEOUT_MS";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL that collection paths are joined onto. Always ends with `/`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl HttpConfig {
    /// Create a configuration from a base URL.
    pub fn from_url(url: &str) -> HttpResult<Self> {
        Self::builder().base_url(url).build()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> HttpResult<Self> {
        Self::from_source(&StdEnvSource)
    }

    /// Load configuration from an environment source.
    ///
    /// `RESTQ_URL` is required; `RESTQ_TIMEOUT_MS` is optional.
    pub fn from_source(source: &dyn EnvSource) -> HttpResult<Self> {
        let url = source
            .get(URL_ENV)
            .ok_or_else(|| HttpError::MissingConfig(URL_ENV.to_string()))?;

        let mut builder = Self::builder().base_url(url);

        if let Some(raw) = source.get(TIMEOUT_ENV) {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                HttpError::config(format!("{} must be a number of milliseconds, got {:?}", TIMEOUT_ENV, raw))
            })?;
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Create a builder for configuration.
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }

    /// Timeout in whole milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Builder for HTTP configuration.
#[derive(Debug, Default)]
pub struct HttpConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HttpResult<HttpConfig> {
        let raw = self
            .base_url
            .ok_or_else(|| HttpError::config("base url is required"))?;

        let mut base_url = Url::parse(raw.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::config(format!("{} cannot be used as a base url", raw)));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(HttpError::config("timeout must be greater than zero"));
        }

        Ok(HttpConfig {
            base_url,
            timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| format!("restq/{}", env!("CARGO_PKG_VERSION"))),
            headers: self.headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restq_query::defaults::MapEnvSource;

    #[test]
    fn test_config_from_url() {
        let config = HttpConfig::from_url("https://api.example.com/v1").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("restq/"));
    }

    #[test]
    fn test_config_keeps_trailing_slash() {
        let config = HttpConfig::from_url("https://api.example.com/v1/").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::builder()
            .base_url("http://localhost:8080")
            .timeout(Duration::from_millis(1500))
            .user_agent("test-agent")
            .header("authorization", "Bearer token")
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout_ms(), 1500);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(
            config.headers,
            vec![("authorization".to_string(), "Bearer token".to_string())]
        );
    }

    #[test]
    fn test_config_builder_missing_url() {
        let result = HttpConfig::builder().build();
        assert!(matches!(result, Err(HttpError::Config(_))));
    }

    #[test]
    fn test_config_builder_invalid_url() {
        let result = HttpConfig::from_url("not a url");
        assert!(matches!(result, Err(HttpError::Url(_))));

        let result = HttpConfig::from_url("mailto:someone@example.com");
        assert!(matches!(result, Err(HttpError::Config(_))));
    }

    #[test]
    fn test_config_builder_zero_timeout() {
        let result = HttpConfig::builder()
            .base_url("http://localhost")
            .timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_source() {
        let env = MapEnvSource::new()
            .set("RESTQ_URL", "https://api.example.com")
            .set("RESTQ_TIMEOUT_MS", "2500");

        let config = HttpConfig::from_source(&env).unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_config_from_source_requires_url() {
        let env = MapEnvSource::new().set("RESTQ_TIMEOUT_MS", "2500");
        let err = HttpConfig::from_source(&env).unwrap_err();
        assert!(matches!(&err, HttpError::MissingConfig(key) if key == URL_ENV));

        let err = restq_query::QueryError::from(err);
        assert_eq!(err.code, restq_query::ErrorCode::MissingConfiguration);
    }

    #[test]
    fn test_config_from_source_rejects_bad_timeout() {
        let env = MapEnvSource::new()
            .set("RESTQ_URL", "https://api.example.com")
            .set("RESTQ_TIMEOUT_MS", "soon");
        assert!(matches!(HttpConfig::from_source(&env), Err(HttpError::Config(_))));
    }
}
