//! Process-lifetime memo of resolved rank levels.
//!
//! Two independent namespaces, one for identifier lookups and one for name
//! lookups, so that a name and an identifier that collide textually never
//! share a slot. Failures are cached as `None` and never expire: a
//! transient outage during the first lookup of a key sticks for the
//! lifetime of the cache.
//!
//! The lock is held only for a single map read or insert, never across a
//! network call, so concurrent lookups for the same key may both go to the
//! network. The last writer wins.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::normalize::{normalize_issn, normalize_name};
use crate::ranking::RankLevel;

/// Which key space a cache entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    Issn,
    Name,
}

impl CacheNamespace {
    /// The canonical key for a raw identifier or name in this namespace.
    pub fn key(self, raw: &str) -> String {
        match self {
            CacheNamespace::Issn => normalize_issn(raw),
            CacheNamespace::Name => normalize_name(raw),
        }
    }
}

/// Entry counts per namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub issn_entries: usize,
    pub name_entries: usize,
}

/// Memoized lookup results, keyed by normalized identifier or name.
#[derive(Debug, Default)]
pub struct LookupCache {
    issn: RwLock<HashMap<String, Option<RankLevel>>>,
    name: RwLock<HashMap<String, Option<RankLevel>>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, namespace: CacheNamespace) -> &RwLock<HashMap<String, Option<RankLevel>>> {
        match namespace {
            CacheNamespace::Issn => &self.issn,
            CacheNamespace::Name => &self.name,
        }
    }

    /// Look up a key.
    ///
    /// The outer `Option` is hit/miss; the inner one is the cached outcome,
    /// where `None` means the lookup was made and found nothing.
    pub async fn get(&self, namespace: CacheNamespace, raw: &str) -> Option<Option<RankLevel>> {
        let key = namespace.key(raw);
        self.slot(namespace).read().await.get(&key).copied()
    }

    /// Record the outcome of a lookup. Overwrites any previous entry.
    pub async fn set(&self, namespace: CacheNamespace, raw: &str, value: Option<RankLevel>) {
        let key = namespace.key(raw);
        self.slot(namespace).write().await.insert(key, value);
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            issn_entries: self.issn.read().await.len(),
            name_entries: self.name.read().await.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = LookupCache::new();
        assert_eq!(cache.get(CacheNamespace::Issn, "1758-4078").await, None);

        cache
            .set(CacheNamespace::Issn, "1758-4078", RankLevel::new(2))
            .await;
        assert_eq!(
            cache.get(CacheNamespace::Issn, "17584078").await,
            Some(RankLevel::new(2))
        );
    }

    #[tokio::test]
    async fn test_negative_entries_are_hits() {
        let cache = LookupCache::new();
        cache.set(CacheNamespace::Name, "Unknown Venue", None).await;
        assert_eq!(cache.get(CacheNamespace::Name, "unknown  venue").await, Some(None));
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let cache = LookupCache::new();
        cache.set(CacheNamespace::Issn, "12345678", RankLevel::new(1)).await;

        // Same text, other namespace: still a miss.
        assert_eq!(cache.get(CacheNamespace::Name, "12345678").await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.issn_entries, 1);
        assert_eq!(stats.name_entries, 0);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let cache = LookupCache::new();
        cache.set(CacheNamespace::Issn, "1758-4078", None).await;
        cache.set(CacheNamespace::Issn, "1758-4078", RankLevel::new(3)).await;
        assert_eq!(
            cache.get(CacheNamespace::Issn, "1758-4078").await,
            Some(RankLevel::new(3))
        );
    }
}
