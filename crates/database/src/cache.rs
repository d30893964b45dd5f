//! Time-bounded memoization of shared handles.

use parking_lot::Mutex;
use std::{
    collections::HashMap,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

/// How long a connection handle is reused.
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

struct Entry<V> {
    value: Arc<V>,
    created: Instant,
}

/// A map of handles that expire `ttl` after they were built.
///
/// Lookups expire stale entries, then read or rebuild. The lock is never held
/// while a value is being built.
pub struct Cache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> {
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live entry for `key`.
    ///
    /// Every expired entry is dropped first, whatever its key.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut entries = self.entries.lock();
        self.expire(&mut entries);
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, stamped now.
    pub fn insert(&self, key: K, value: Arc<V>) -> Arc<V> {
        let mut entries = self.entries.lock();
        self.expire(&mut entries);
        entries.insert(
            key,
            Entry {
                value: value.clone(),
                created: Instant::now(),
            },
        );
        value
    }

    /// Return the live entry or build, store and return a new one.
    ///
    /// Failed builds leave the cache untouched.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &K, build: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = Arc::new(build().await?);
        Ok(self.insert(key.clone(), value))
    }

    /// Number of stored entries, expired ones included until the next
    /// lookup or insert.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<K, V> Cache<K, V> {
    fn expire(&self, entries: &mut HashMap<K, Entry<V>>) {
        entries.retain(|_, entry| entry.created.elapsed() < self.ttl);
    }
}

impl<K: Eq + Hash + Clone, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
