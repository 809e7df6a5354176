//! Logging setup for restq.
//!
//! Call sites use the standard `tracing` macros. This module only decides
//! whether and how a subscriber is installed, driven by environment variables:
//!
//! - `RESTQ_DEBUG=true|1|yes` - enable debug logging
//! - `RESTQ_LOG_LEVEL=trace|debug|info|warn|error` - set a specific level
//! - `RESTQ_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! The subscriber is only installed with the `tracing-subscriber` feature;
//! without it, applications bring their own.
//!
//! ```rust,no_run
//! restq_query::logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `RESTQ_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("RESTQ_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `RESTQ_LOG_LEVEL`.
///
/// Defaults to "debug" if `RESTQ_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("RESTQ_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `RESTQ_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("RESTQ_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize logging once. Later calls are no-ops.
///
/// Nothing is installed unless `RESTQ_DEBUG` or `RESTQ_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("RESTQ_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "restq={},restq_query={},restq_http={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let installed = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if installed.is_ok() {
                tracing::info!(level = level, format = get_log_format(), "restq logging initialized");
            }
        }
    });
}

/// Initialize logging with a specific level.
///
/// This sets `RESTQ_LOG_LEVEL`, so call it at startup before spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: intended for program startup, before other threads read the environment.
    unsafe {
        env::set_var("RESTQ_LOG_LEVEL", level);
    }
    init();
}

/// Debug log that only fires when `RESTQ_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! restq_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}
