//! Memoized construction of connection handles.

use crate::{Cache, Database, Options, Result, Target, cache::DEFAULT_TTL};
use std::{sync::Arc, time::Duration};

/// Builds connection handles and reuses them for the cache window.
pub struct Connector {
    cache: Cache<Target, Database>,
    options: Options,
}

impl Connector {
    /// Create a connector with the default two hour window.
    pub fn new(options: Options) -> Self {
        Self::with_ttl(options, DEFAULT_TTL)
    }

    /// Create a connector with a custom reuse window.
    pub fn with_ttl(options: Options, ttl: Duration) -> Self {
        Self {
            cache: Cache::new(ttl),
            options,
        }
    }

    /// Return the handle for `target`, opening it if no live one exists.
    ///
    /// Remote targets with blank fields fail before anything is opened.
    pub async fn configure(&self, target: &Target) -> Result<Arc<Database>> {
        target.validate()?;
        if let Some(database) = self.cache.get(target) {
            tracing::debug!(uri = %target.redacted(), "reusing connection");
            return Ok(database);
        }

        self.cache
            .get_or_try_insert_with(target, || async {
                tracing::info!(uri = %target.redacted(), "opening connection");
                Database::open(target, &self.options).await
            })
            .await
    }

    /// The shared handle cache.
    pub fn cache(&self) -> &Cache<Target, Database> {
        &self.cache
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
