//! In-memory TTL caching for fetcher results.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

/// Default time-to-live for cached fetch results.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Defines the behavior of the in-memory cache for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present;
    /// otherwise fetch upstream and write the result to the cache. (Default)
    #[default]
    Use,
    /// Always fetch upstream, bypassing any cached entry,
    /// and write the new result to the cache.
    Refresh,
    /// Always fetch upstream and do not read from or write to the cache.
    Bypass,
}

/// Value returned by [`TtlCache::get_or_fill`] along with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<V> {
    pub value: V,
    pub cache_hit: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner<V> {
    map: HashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> CacheInner<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Inserts `value` and drops every entry that has already expired.
    fn put(&mut self, key: String, value: V) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
        self.map.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }
}

type FillLocks = HashMap<String, Arc<Mutex<()>>>;

/// Thread-safe in-memory cache with a fixed time-to-live.
///
/// Misses are filled under a lock held per key: concurrent callers asking for the same key
/// wait for the first fill and then read its stored value, while fills for other keys
/// proceed independently. Expired entries are swept whenever a new value is stored.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<RwLock<CacheInner<V>>>,
    fill_locks: Arc<Mutex<FillLocks>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            fill_locks: Arc::clone(&self.fill_locks),
        }
    }
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    /// A zero `ttl` disables storage.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                map: HashMap::new(),
                ttl,
            })),
            fill_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached value when present and not expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Stores a value under `key`. No-op when the cache is disabled.
    pub async fn put(&self, key: impl Into<String>, value: V) {
        let mut store = self.inner.write().await;
        if store.ttl == Duration::ZERO {
            return;
        }
        store.put(key.into(), value);
    }

    /// Returns the cached value for `key` or runs `fill` to produce one and stores it.
    pub async fn get_or_fill<F, Fut>(&self, key: &str, mode: CacheMode, fill: F) -> Lookup<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if mode == CacheMode::Bypass {
            return Lookup {
                value: fill().await,
                cache_hit: false,
            };
        }

        if mode == CacheMode::Use {
            if let Some(value) = self.get(key).await {
                return Lookup {
                    value,
                    cache_hit: true,
                };
            }
        }

        let key_lock = self.key_lock(key).await;
        let guard = key_lock.lock().await;

        // Another caller may have filled the entry while this one waited.
        let cached = if mode == CacheMode::Use {
            self.get(key).await
        } else {
            None
        };

        let lookup = match cached {
            Some(value) => Lookup {
                value,
                cache_hit: true,
            },
            None => {
                let value = fill().await;
                self.put(key, value.clone()).await;
                Lookup {
                    value,
                    cache_hit: false,
                }
            }
        };

        drop(guard);
        self.release_key_lock(key, key_lock).await;
        lookup
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fill_locks.lock().await;
        Arc::clone(locks.entry(key.to_owned()).or_default())
    }

    /// Forgets the key's lock once no other caller holds or waits on it.
    async fn release_key_lock(&self, key: &str, key_lock: Arc<Mutex<()>>) {
        let mut locks = self.fill_locks.lock().await;
        // One reference lives in the map, the other is ours.
        if Arc::strong_count(&key_lock) <= 2 {
            locks.remove(key);
        }
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Number of entries held, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
