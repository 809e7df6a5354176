//! Process-wide defaults.
//!
//! The only tunable today is the page size used by
//! [`QueryBuilder::paginate`](crate::QueryBuilder::paginate) when the caller
//! does not pass one.
//!
//! ```rust
//! use restq_query::defaults::{Defaults, MapEnvSource};
//!
//! let env = MapEnvSource::new().set("RESTQ_PER_PAGE", "25");
//! let defaults = Defaults::from_source(&env).unwrap();
//! assert_eq!(defaults.per_page, 25);
//! ```

use std::collections::HashMap;

use parking_lot::{RwLock, const_rwlock};
use tracing::info;

use crate::error::{QueryError, QueryResult};

/// Page size used when nothing else is configured.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Environment variable holding the default page size.
pub const PER_PAGE_ENV: &str = "RESTQ_PER_PAGE";

static DEFAULTS: RwLock<Defaults> = const_rwlock(Defaults {
    per_page: DEFAULT_PER_PAGE,
});

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get an environment variable value.
    fn get(&self, name: &str) -> Option<String>;
}

/// Default environment source using std::env.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a HashMap.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create a new map-based environment source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Tunables shared by every builder in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    /// Page size for `paginate` calls that do not name one.
    pub per_page: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Defaults {
    /// Read defaults from the process environment.
    pub fn from_env() -> QueryResult<Self> {
        Self::from_source(&StdEnvSource)
    }

    /// Read defaults from an environment source. Unset keys keep their default.
    pub fn from_source(source: &dyn EnvSource) -> QueryResult<Self> {
        let mut defaults = Self::default();

        if let Some(raw) = source.get(PER_PAGE_ENV) {
            let per_page: u32 = raw.trim().parse().map_err(|_| {
                QueryError::invalid_configuration(format!(
                    "{} must be a positive integer, got {:?}",
                    PER_PAGE_ENV, raw
                ))
            })?;
            if per_page == 0 {
                return Err(QueryError::invalid_configuration(format!(
                    "{} must be greater than zero",
                    PER_PAGE_ENV
                )));
            }
            defaults.per_page = per_page;
        }

        Ok(defaults)
    }

    /// Make these the process-wide defaults.
    pub fn install(self) {
        *DEFAULTS.write() = self;
        info!(per_page = self.per_page, "restq defaults installed");
    }

    /// The currently installed defaults.
    pub fn current() -> Self {
        *DEFAULTS.read()
    }
}

/// The process-wide default page size.
#[inline]
pub fn per_page() -> u32 {
    DEFAULTS.read().per_page
}

/// Replace the process-wide default page size. Zero is ignored.
pub fn set_per_page(per_page: u32) {
    if per_page > 0 {
        DEFAULTS.write().per_page = per_page;
    }
}
