//! # restq
//!
//! A fluent query builder for REST-style collection endpoints.
//!
//! restq provides:
//! - Filter and sort accumulation with several input shapes
//! - Finalizers that issue reads and writes through an injected client
//! - A page cursor over paginated reads
//! - An HTTP client built on `reqwest` (default `http` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use restq::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::from_url("https://api.example.com/")?;
//!     let mut users = client.collection("users");
//!
//!     let adults = users
//!         .r#where(("age", ">=", 18))
//!         .order_by(("name", "asc"))
//!         .get(GetOptions::new())
//!         .await?;
//!     println!("{}", adults);
//!
//!     let mut pages = users.r#where(("active", true)).paginate(20);
//!     while pages.ready().await?.has_next() {
//!         pages.next_page().await?;
//!     }
//!
//!     users.create(&serde_json::json!({ "name": "Alice" })).await?;
//!     Ok(())
//! }
//! ```
//!
//! Any type implementing [`Client`] can stand in for the HTTP client, which
//! is how the builder is tested without a network.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use restq_query::*;

/// HTTP transport.
#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub mod http {
    pub use restq_http::*;
}

#[cfg(feature = "http")]
pub use restq_http::{HttpClient, HttpConfig, HttpError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use restq_query::prelude::*;

    #[cfg(feature = "http")]
    pub use restq_http::prelude::*;
}
