//! Rank resolution for a single identifier or a single venue name.
//!
//! Both lookups are memoized in the shared [`LookupCache`], failures
//! included. Service errors are logged and treated as "no match"; nothing
//! here returns an error.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheNamespace, LookupCache};
use crate::normalize::{collapse_whitespace, hyphenate_issn, normalize_issn, normalize_name};
use crate::ranking::{RankLevel, RankRecord, RankingService};

/// Resolves rank levels through the ranking service.
pub struct RankResolver {
    ranking: Arc<dyn RankingService>,
    cache: Arc<LookupCache>,
    debug: bool,
}

impl RankResolver {
    pub fn new(ranking: Arc<dyn RankingService>, cache: Arc<LookupCache>, debug: bool) -> Self {
        Self {
            ranking,
            cache,
            debug,
        }
    }

    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }

    /// Resolve the level of the venue behind one identifier.
    ///
    /// The service is queried with the identifier as given, then in its
    /// hyphenated form, then bare, until one of them yields a level.
    pub async fn resolve_issn(&self, issn: &str) -> Option<RankLevel> {
        let normalized = normalize_issn(issn);
        if normalized.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(CacheNamespace::Issn, &normalized).await {
            if self.debug {
                debug!("ISSN cache hit: {} -> {:?}", normalized, cached);
            }
            return cached;
        }

        let mut level = None;
        for query in issn_query_variants(issn) {
            level = self.try_issn_query(&query, &normalized).await;
            if level.is_some() {
                break;
            }
        }

        self.cache.set(CacheNamespace::Issn, &normalized, level).await;
        level
    }

    async fn try_issn_query(&self, query: &str, normalized: &str) -> Option<RankLevel> {
        let records = match self.ranking.search_by_issn(query).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Ranking search by ISSN '{}' failed: {}", query, e);
                return None;
            }
        };

        if self.debug {
            debug!("Ranking search by ISSN '{}': {} record(s)", query, records.len());
        }

        for record in exact_issn_first(records, normalized) {
            let Some(link) = self.ranking.detail_link(&record) else {
                continue;
            };
            if let Some(level) = self.detail_level(&link).await {
                return Some(level);
            }
        }
        None
    }

    async fn detail_level(&self, link: &str) -> Option<RankLevel> {
        match self.ranking.fetch_detail(link).await {
            Ok(records) => {
                let level = records.first().and_then(RankRecord::rank_level);
                if self.debug {
                    debug!("Ranking detail '{}' -> {:?}", link, level);
                }
                level
            }
            Err(e) => {
                warn!("Ranking detail fetch '{}' failed: {}", link, e);
                None
            }
        }
    }

    /// Resolve the level of a venue by its free-text name.
    ///
    /// Among the returned records, the one whose normalized name length is
    /// closest to the query's wins.
    pub async fn resolve_name(&self, name: &str) -> Option<RankLevel> {
        let query = collapse_whitespace(name);
        if normalize_name(&query).is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(CacheNamespace::Name, &query).await {
            if self.debug {
                debug!("Name cache hit: '{}' -> {:?}", query, cached);
            }
            return cached;
        }

        let level = match self.ranking.search_by_name(&query).await {
            Ok(records) => {
                if self.debug {
                    debug!("Ranking search by name '{}': {} record(s)", query, records.len());
                }
                closest_name_first(records, &query)
                    .iter()
                    .find_map(RankRecord::rank_level)
            }
            Err(e) => {
                warn!("Ranking search by name '{}' failed: {}", query, e);
                None
            }
        };

        self.cache.set(CacheNamespace::Name, &query, level).await;
        level
    }
}

/// Distinct query forms for an identifier: as given, hyphenated, bare.
fn issn_query_variants(issn: &str) -> Vec<String> {
    let as_given = issn.trim().to_string();
    let mut variants = vec![as_given];
    for variant in [hyphenate_issn(issn), Some(normalize_issn(issn))]
        .into_iter()
        .flatten()
    {
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

/// Stable reorder: records whose own identifier equals the query come first.
fn exact_issn_first(mut records: Vec<RankRecord>, normalized: &str) -> Vec<RankRecord> {
    records.sort_by_key(|record| {
        let own = record.issn.as_deref().map(normalize_issn).unwrap_or_default();
        own != normalized
    });
    records
}

/// Stable reorder by distance between normalized name lengths.
fn closest_name_first(mut records: Vec<RankRecord>, query: &str) -> Vec<RankRecord> {
    let query_len = normalize_name(query).chars().count();
    records.sort_by_key(|record| {
        let len = record
            .name
            .as_deref()
            .map(normalize_name)
            .unwrap_or_default()
            .chars()
            .count();
        len.abs_diff(query_len)
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::RankingError;
    use crate::testing::MockRankingService;

    fn resolver(ranking: &Arc<MockRankingService>) -> RankResolver {
        RankResolver::new(ranking.clone(), Arc::new(LookupCache::new()), true)
    }

    fn record(issn: &str, id: &str) -> RankRecord {
        RankRecord {
            issn: Some(issn.to_string()),
            venue_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_issn_query_variants() {
        assert_eq!(
            issn_query_variants("17584078"),
            vec!["17584078".to_string(), "1758-4078".to_string()]
        );
        assert_eq!(
            issn_query_variants(" 1758-4078 "),
            vec!["1758-4078".to_string(), "17584078".to_string()]
        );
    }

    #[test]
    fn test_exact_issn_first_is_stable() {
        let ordered = exact_issn_first(
            vec![record("9999-9999", "a"), record("1758-4078", "b"), record("8888-8888", "c")],
            "17584078",
        );
        let ids: Vec<_> = ordered.iter().map(|r| r.venue_id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_closest_name_first() {
        let named = |name: &str| RankRecord {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let ordered = closest_name_first(
            vec![
                named("Journal of Documentation and Information Science Studies"),
                named("Journal of Documentation"),
                named("Documentation"),
            ],
            "Journal of Documentation",
        );
        assert_eq!(ordered[0].name.as_deref(), Some("Journal of Documentation"));
    }

    #[tokio::test]
    async fn test_resolve_issn_level() {
        let ranking = Arc::new(MockRankingService::new());
        ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;

        let resolver = resolver(&ranking);
        assert_eq!(resolver.resolve_issn("1758-4078").await, RankLevel::new(2));
    }

    #[tokio::test]
    async fn test_empty_issn_makes_no_call() {
        let ranking = Arc::new(MockRankingService::new());
        let resolver = resolver(&ranking);

        assert_eq!(resolver.resolve_issn("").await, None);
        assert_eq!(resolver.resolve_issn(" - ").await, None);
        assert_eq!(ranking.query_count().await, 0);
        assert_eq!(resolver.cache().stats().await.issn_entries, 0);
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_network() {
        let ranking = Arc::new(MockRankingService::new());
        ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;
        let resolver = resolver(&ranking);

        assert_eq!(resolver.resolve_issn("1758-4078").await, RankLevel::new(2));
        let calls = ranking.query_count().await;

        assert_eq!(resolver.resolve_issn("17584078").await, RankLevel::new(2));
        assert_eq!(resolver.resolve_issn("1758-4078 ").await, RankLevel::new(2));
        assert_eq!(ranking.query_count().await, calls);
        assert_eq!(ranking.issn_queries().await, vec!["1758-4078"]);
    }

    #[tokio::test]
    async fn test_exact_match_record_tried_first() {
        let ranking = Arc::new(MockRankingService::new());
        ranking.push_issn_record("1758-4078", record("9999-9999", "other")).await;
        ranking.push_issn_record("1758-4078", record("1758-4078", "exact")).await;
        ranking
            .set_detail(
                "mock://jufo/kanava/exact",
                vec![RankRecord {
                    level: Some("3".to_string()),
                    ..Default::default()
                }],
            )
            .await;

        let resolver = resolver(&ranking);
        assert_eq!(resolver.resolve_issn("1758-4078").await, RankLevel::new(3));
        assert_eq!(
            ranking.detail_fetches().await,
            vec!["mock://jufo/kanava/exact"]
        );
    }

    #[tokio::test]
    async fn test_falls_through_records_without_level() {
        let ranking = Arc::new(MockRankingService::new());
        ranking.push_issn_record("1758-4078", record("1758-4078", "first")).await;
        ranking.push_issn_record("1758-4078", record("1111-1111", "second")).await;
        ranking
            .set_detail(
                "mock://jufo/kanava/first",
                vec![RankRecord {
                    level: Some("N/A".to_string()),
                    ..Default::default()
                }],
            )
            .await;
        ranking
            .set_detail(
                "mock://jufo/kanava/second",
                vec![RankRecord {
                    level: Some("1".to_string()),
                    ..Default::default()
                }],
            )
            .await;

        let resolver = resolver(&ranking);
        assert_eq!(resolver.resolve_issn("1758-4078").await, RankLevel::new(1));
    }

    #[tokio::test]
    async fn test_no_records_is_cached_unavailable() {
        let ranking = Arc::new(MockRankingService::new());
        let resolver = resolver(&ranking);

        assert_eq!(resolver.resolve_issn("0000-0000").await, None);
        let calls = ranking.query_count().await;
        assert_eq!(calls, 2); // hyphenated as given, then bare

        assert_eq!(resolver.resolve_issn("00000000").await, None);
        assert_eq!(ranking.query_count().await, calls);
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_unavailable() {
        let ranking = Arc::new(MockRankingService::new());
        ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;
        ranking.set_offline(true).await;

        let resolver = resolver(&ranking);
        assert_eq!(resolver.resolve_issn("1758-4078").await, None);

        // Negative result sticks for the lifetime of the cache.
        ranking.set_offline(false).await;
        assert_eq!(resolver.resolve_issn("1758-4078").await, None);
    }

    #[tokio::test]
    async fn test_second_variant_used_after_error() {
        let ranking = Arc::new(MockRankingService::new());
        ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;
        ranking
            .set_next_error(RankingError::ParseError("truncated".to_string()))
            .await;

        let resolver = resolver(&ranking);
        assert_eq!(resolver.resolve_issn("1758-4078").await, RankLevel::new(2));
        assert_eq!(ranking.issn_queries().await, vec!["1758-4078", "17584078"]);
    }

    #[tokio::test]
    async fn test_resolve_name() {
        let ranking = Arc::new(MockRankingService::new());
        ranking
            .push_name_record(
                "Journal of Documentation",
                RankRecord {
                    name: Some("Journal of Documentation and Something Much Longer".to_string()),
                    level: Some("1".to_string()),
                    ..Default::default()
                },
            )
            .await;
        ranking
            .push_name_record(
                "Journal of Documentation",
                RankRecord {
                    name: Some("Journal of Documentation".to_string()),
                    level: Some("2".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let resolver = resolver(&ranking);
        assert_eq!(
            resolver.resolve_name("  Journal of   Documentation ").await,
            RankLevel::new(2)
        );
        assert_eq!(ranking.name_queries().await, vec!["Journal of Documentation"]);

        // Cached under the normalized name.
        assert_eq!(
            resolver.resolve_name("journal of documentation").await,
            RankLevel::new(2)
        );
        assert_eq!(ranking.query_count().await, 1);
    }

    #[tokio::test]
    async fn test_resolve_name_skips_levelless_records() {
        let ranking = Arc::new(MockRankingService::new());
        ranking
            .push_name_record(
                "Venue",
                RankRecord {
                    name: Some("Venue".to_string()),
                    level: Some("N/A".to_string()),
                    ..Default::default()
                },
            )
            .await;
        ranking
            .push_name_record(
                "Venue",
                RankRecord {
                    name: Some("Venue of Things".to_string()),
                    level: Some("1".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let resolver = resolver(&ranking);
        assert_eq!(resolver.resolve_name("Venue").await, RankLevel::new(1));
    }

    #[tokio::test]
    async fn test_empty_name_uncached_and_offline() {
        let ranking = Arc::new(MockRankingService::new());
        let resolver = resolver(&ranking);

        assert_eq!(resolver.resolve_name("   ").await, None);
        assert_eq!(ranking.query_count().await, 0);
        assert_eq!(resolver.cache().stats().await.name_entries, 0);
    }
}
