//! Time-bounded session cache with a background eviction task.
//!
//! Entries are replaced wholesale on insert and expire `ttl` after they were
//! written. Expired entries are never returned by [`SessionCache::get`]; the
//! eviction task only reclaims their memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::session::{SessionKey, SessionResponse};

/// Shortest period the eviction task will tick at.
pub const MIN_EVICTION_INTERVAL: Duration = Duration::from_millis(100);

struct CacheEntry {
    value: Arc<SessionResponse>,
    expires_at: Instant,
}

type EntryMap = Mutex<HashMap<SessionKey, CacheEntry>>;

/// Thread-safe TTL map from [`SessionKey`] to the upstream session response.
#[derive(Clone)]
pub struct SessionCache {
    entries: Arc<EntryMap>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the live entry for `key`, if any.
    pub fn get(&self, key: &SessionKey) -> Option<Arc<SessionResponse>> {
        let entries = lock(&self.entries);
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Store `value` under `key` with the cache TTL, replacing any previous entry.
    pub fn insert(&self, key: SessionKey, value: Arc<SessionResponse>) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        lock(&self.entries).insert(key, entry);
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn remove_expired(&self) -> usize {
        remove_expired(&self.entries)
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the periodic eviction task.
    ///
    /// The task holds only a weak reference to the entries and stops on its
    /// own once every clone of the cache is gone; dropping the returned
    /// handle stops it immediately. Periods below [`MIN_EVICTION_INTERVAL`]
    /// are raised to it. Returns `None` outside a Tokio runtime.
    pub fn start_eviction(&self, every: Duration) -> Option<EvictionTask> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        if every < MIN_EVICTION_INTERVAL {
            tracing::warn!(
                requested_ms = every.as_millis() as u64,
                min_ms = MIN_EVICTION_INTERVAL.as_millis() as u64,
                "eviction interval too short, using minimum"
            );
        }
        let every = every.max(MIN_EVICTION_INTERVAL);
        let entries = Arc::downgrade(&self.entries);
        let handle = runtime.spawn(eviction_loop(entries, every));
        Some(EvictionTask {
            handle: Some(handle),
        })
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}

async fn eviction_loop(entries: Weak<EntryMap>, every: Duration) {
    let mut ticker = time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(entries) = entries.upgrade() else {
            break;
        };
        let removed = remove_expired(&entries);
        if removed > 0 {
            tracing::debug!(removed, "evicted expired sessions");
        }
    }
}

fn remove_expired(entries: &EntryMap) -> usize {
    let now = Instant::now();
    let mut entries = lock(entries);
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    before - entries.len()
}

fn lock(entries: &EntryMap) -> MutexGuard<'_, HashMap<SessionKey, CacheEntry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the background eviction task; aborts the task on drop.
#[derive(Debug)]
pub struct EvictionTask {
    handle: Option<JoinHandle<()>>,
}

impl EvictionTask {
    /// Stop the task and wait until it has fully wound down.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for EvictionTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
