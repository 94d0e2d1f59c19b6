//! Per-user projection cache keyed by a staleness fingerprint

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::model::{SimulationResponse, UserId};

/// Identifies the inputs a cached projection was computed from
///
/// Built from the assumptions' last update time and the newest goal update
/// time, each rendered as ISO-8601 or `none` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub const NONE: &'static str = "none";

    pub fn new(
        assumptions_updated_at: Option<Timestamp>,
        latest_goal_update: Option<Timestamp>,
    ) -> Self {
        fn part(ts: Option<Timestamp>) -> String {
            ts.map_or_else(|| Fingerprint::NONE.to_string(), |ts| ts.to_string())
        }
        Self(format!(
            "{}:{}",
            part(assumptions_updated_at),
            part(latest_goal_update)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub result: Arc<SimulationResponse>,
}

/// Storage for the latest projection of each user
///
/// Implementations must tolerate concurrent access from many users.
pub trait ResultCache: Send + Sync {
    fn get(&self, user_id: &UserId) -> Option<CacheEntry>;
    fn set(&self, user_id: &UserId, entry: CacheEntry);
}

/// Process-local cache, one entry per user
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<FxHashMap<UserId, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the entry for one user
    pub fn invalidate(&self, user_id: &UserId) -> Option<CacheEntry> {
        self.write().remove(user_id)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so
    // poisoned guards are still usable.
    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<UserId, CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<UserId, CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ResultCache for InMemoryCache {
    fn get(&self, user_id: &UserId) -> Option<CacheEntry> {
        self.read().get(user_id).cloned()
    }

    fn set(&self, user_id: &UserId, entry: CacheEntry) {
        self.write().insert(user_id.clone(), entry);
    }
}

/// Cache that never holds anything; every run recomputes
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl ResultCache for NullCache {
    fn get(&self, _user_id: &UserId) -> Option<CacheEntry> {
        None
    }

    fn set(&self, _user_id: &UserId, _entry: CacheEntry) {}
}
