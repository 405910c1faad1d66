// crates/infra/src/cache.rs
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use repo_lines_ports::Clock;
use repo_lines_shared_kernel::{AccountId, RepoRef};
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

const SHARD_COUNT: usize = 16;

/// What a cached value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Account,
    Repo,
    Badge,
}

impl CacheKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Repo => "repo",
            Self::Badge => "badge",
        }
    }
}

/// `kind:id` with the id case-folded, so `OctoCat` and `octocat` share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: CacheKind,
    id: String,
}

impl CacheKey {
    pub fn new(kind: CacheKind, id: &str) -> Self {
        Self { kind, id: id.to_lowercase() }
    }

    pub fn account(account: &AccountId) -> Self {
        Self { kind: CacheKind::Account, id: account.normalized() }
    }

    pub fn repo(repo: &RepoRef) -> Self {
        Self { kind: CacheKind::Repo, id: repo.normalized() }
    }

    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    fn shard(&self, shards: usize) -> usize {
        let hash = xxh3_64(self.to_string().as_bytes());
        (hash % shards as u64) as usize
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.id)
    }
}

/// A cache hit together with when it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub keys: usize,
}

struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

type Shard<V> = RwLock<HashMap<CacheKey, Entry<V>>>;

/// In-memory TTL cache shared by concurrent requests.
///
/// Keys hash onto independent shards; a write only locks its own shard.
/// Expiry is judged on the injected clock, lazily on read and in bulk by
/// [`ResultCache::purge_expired`].
pub struct ResultCache<V> {
    shards: Vec<Shard<V>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(clock: Arc<dyn Clock>, default_ttl: Duration) -> Self {
        let shards = (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect();
        Self { shards, clock, default_ttl, hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn get(&self, key: &CacheKey) -> Option<Cached<V>> {
        let now = self.clock.now();
        let shard = self.shard(key);
        {
            let map = shard.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            match map.get(key) {
                Some(entry) if now < entry.expires_at => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(Cached { value: entry.value.clone(), stored_at: entry.stored_at });
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        let mut map = shard.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        // another writer may have refreshed the entry meanwhile
        if map.get(key).is_some_and(|entry| now >= entry.expires_at) {
            map.remove(key);
        }
        match map.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Cached { value: entry.value.clone(), stored_at: entry.stored_at })
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn set(&self, key: CacheKey, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: CacheKey, value: V, ttl: Duration) {
        let stored_at = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| stored_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let shard = self.shard(&key);
        shard
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, Entry { value, stored_at, expires_at });
    }

    /// Returns whether an entry was removed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.shard(key).write().unwrap_or_else(|poisoned| poisoned.into_inner()).remove(key).is_some()
    }

    pub fn flush(&self) {
        for shard in &self.shards {
            shard.write().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let keys = self.shards.iter().map(|shard| shard.read().map_or(0, |map| map.len())).sum();
        CacheStats { hits: self.hits.load(Ordering::Relaxed), misses: self.misses.load(Ordering::Relaxed), keys }
    }

    fn shard(&self, key: &CacheKey) -> &Shard<V> {
        &self.shards[key.shard(self.shards.len())]
    }
}

/// Anything holding entries that expire.
pub trait Expiring: Send + Sync {
    /// Drop every expired entry; returns how many were removed.
    fn purge_expired(&self) -> usize;

    /// `false` once a writer panicked while holding a lock.
    fn is_healthy(&self) -> bool;
}

impl<V: Clone + Send + Sync> Expiring for ResultCache<V> {
    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        for shard in &self.shards {
            let mut map = shard.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            let before = map.len();
            map.retain(|_, entry| now < entry.expires_at);
            removed += before - map.len();
        }
        removed
    }

    fn is_healthy(&self) -> bool {
        self.shards.iter().all(|shard| !shard.is_poisoned())
    }
}
