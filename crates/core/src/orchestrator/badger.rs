//! Consumer-facing entry point: publication in, badge out.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::info;

use crate::badge::{Badge, BadgeTarget};
use crate::bibliographic::BibliographicService;
use crate::cache::{CacheStats, LookupCache};
use crate::harvest::CandidateHarvester;
use crate::hints::{HintEngine, HintRule};
use crate::ranking::RankingService;
use crate::resolver::RankResolver;

use super::cascade::RankOrchestrator;
use super::config::RankOptions;
use super::types::{Publication, Resolution};

/// Owns the cascade, its cache and its options for one resolution session.
///
/// The cache lives as long as the badger (or as long as any other holder of
/// the `Arc` passed to [`RankBadger::with_cache`]).
pub struct RankBadger {
    orchestrator: RankOrchestrator,
    cache: Arc<LookupCache>,
    options: RankOptions,
}

impl RankBadger {
    /// Create a badger with a fresh cache.
    pub fn new(
        ranking: Arc<dyn RankingService>,
        bibliographic: Arc<dyn BibliographicService>,
        options: RankOptions,
    ) -> Self {
        Self::with_cache(ranking, bibliographic, Arc::new(LookupCache::new()), options)
    }

    /// Create a badger sharing an existing cache.
    pub fn with_cache(
        ranking: Arc<dyn RankingService>,
        bibliographic: Arc<dyn BibliographicService>,
        cache: Arc<LookupCache>,
        options: RankOptions,
    ) -> Self {
        Self::with_hint_rules(ranking, bibliographic, cache, options, Vec::new())
    }

    /// Create a badger with precompiled hint rules, tried ahead of the
    /// configured and built-in ones.
    pub fn with_hint_rules(
        ranking: Arc<dyn RankingService>,
        bibliographic: Arc<dyn BibliographicService>,
        cache: Arc<LookupCache>,
        options: RankOptions,
        hint_rules: Vec<HintRule>,
    ) -> Self {
        let hints = Arc::new(HintEngine::with_rules(
            hint_rules,
            &options.custom_hints,
            options.debug,
        ));
        info!(
            "Rank badger ready: enabled={}, {} hint rule(s), harvest rows={}",
            options.enabled,
            hints.len(),
            options.max_harvest_rows
        );

        let resolver = RankResolver::new(ranking, Arc::clone(&cache), options.debug);
        let harvester = CandidateHarvester::new(
            bibliographic,
            Arc::clone(&hints),
            options.max_harvest_rows,
            options.container_rows,
            options.debug,
        );
        let orchestrator = RankOrchestrator::new(resolver, harvester, hints, options.debug);

        Self {
            orchestrator,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Run the cascade for one publication.
    pub async fn resolve(&self, publication: &Publication) -> Resolution {
        self.orchestrator.resolve(publication).await
    }

    /// Resolve independent publications concurrently. Output order matches input.
    pub async fn resolve_many(&self, publications: &[Publication]) -> Vec<Resolution> {
        join_all(publications.iter().map(|p| self.resolve(p))).await
    }

    /// Place a placeholder badge on `target`, resolve, then replace it with
    /// the final badge. Does nothing when disabled.
    pub async fn resolve_rank(&self, publication: &Publication, target: &dyn BadgeTarget) {
        if !self.options.enabled {
            return;
        }

        target.place(Badge::placeholder());
        let resolution = self.resolve(publication).await;
        target.place(Badge::new(resolution.level).with_candidates(resolution.candidates));
    }

    /// Run [`RankBadger::resolve_rank`] on the runtime. There is no
    /// cancellation: a caller that loses interest drops the handle.
    pub fn spawn_resolve_rank(
        self: &Arc<Self>,
        publication: Publication,
        target: Arc<dyn BadgeTarget>,
    ) -> JoinHandle<()> {
        let badger = Arc::clone(self);
        tokio::spawn(async move {
            badger.resolve_rank(&publication, target.as_ref()).await;
        })
    }
}
