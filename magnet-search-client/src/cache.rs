use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::error::Error;
use crate::torrent::Torrent;

/// Key→timestamped-results store consulted before any upstream call.
/// Implementations must be safe for concurrent use; freshness is judged by
/// the caller against its own maximum age.
pub trait TorrentCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CachedSearch>, Error>;
    fn set(&self, key: &str, torrents: &[Torrent]) -> Result<(), Error>;
}

/// Thread-safe handle to a cache backend.
pub type SharedTorrentCache = Arc<dyn TorrentCache>;

/// A stored result list plus the moment it was stored. An empty list is a
/// valid value: the query ran and nothing matched.
#[derive(Clone, Debug)]
pub struct CachedSearch {
    pub torrents: Vec<Torrent>,
    pub created_at: DateTime<Utc>,
}

impl CachedSearch {
    pub fn new(torrents: Vec<Torrent>) -> Self {
        Self {
            torrents,
            created_at: Utc::now(),
        }
    }

    pub fn is_fresh(&self, max_age: Duration) -> bool {
        Utc::now() - self.created_at <= max_age
    }
}

/// In-memory cache backend with a bounded entry count.
pub struct MemoryCache {
    entries: DashMap<String, CachedSearch>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes the oldest quarter of entries to make room for new ones.
    fn evict_oldest(&self) {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        entries.sort_by_key(|(_, created_at)| *created_at);

        let to_remove = (self.max_entries / 4).max(1);
        for (key, _) in entries.into_iter().take(to_remove) {
            self.entries.remove(&key);
        }
        log::debug!("Evicted {} oldest cache entries", to_remove);
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl TorrentCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CachedSearch>, Error> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, torrents: &[Torrent]) -> Result<(), Error> {
        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }
        self.entries
            .insert(key.to_string(), CachedSearch::new(torrents.to_vec()));
        Ok(())
    }
}
