//! # restq-http
//!
//! HTTP transport for restq, built on `reqwest`.
//!
//! This crate provides:
//! - [`HttpClient`], an implementation of the [`restq_query::Client`] capability
//! - Configuration from code or from `RESTQ_URL` / `RESTQ_TIMEOUT_MS`
//! - Query encoding: `q` and `s` as JSON text, `p` and `page` as integers
//!
//! ## Example
//!
//! ```rust,no_run
//! use restq_http::HttpClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::from_url("https://api.example.com/")?;
//!
//! let mut users = client.collection("users");
//! let adults = users
//!     .r#where(("age", ">", 18))
//!     .order_by(("name", "asc"))
//!     .await?;
//! println!("{}", adults);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{HttpClient, HttpClientBuilder, encode_query};
pub use config::{HttpConfig, HttpConfigBuilder};
pub use error::{HttpError, HttpResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::{HttpClient, HttpClientBuilder};
    pub use crate::config::{HttpConfig, HttpConfigBuilder};
    pub use crate::error::{HttpError, HttpResult};
}
