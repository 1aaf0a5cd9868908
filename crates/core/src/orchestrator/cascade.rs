//! The resolution cascade.
//!
//! One publication runs through the states strictly in order, each state
//! running only when the previous one found nothing:
//!
//! `direct-issn → harvest → retry-issn → name-title → name-venue → resolved`
//!
//! Confidence decreases along the chain: exact identifier, harvested
//! identifier, title name match, looser venue name match.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::harvest::{CandidateHarvester, Harvest};
use crate::hints::HintEngine;
use crate::normalize::{collapse_whitespace, normalize_issn, normalize_name, strip_year_tokens};
use crate::ranking::RankLevel;
use crate::resolver::RankResolver;

use super::types::{CascadeState, Publication, Resolution};

/// What a state decided.
enum Step {
    /// A level was found; stop here.
    Found(RankLevel),
    /// Nothing found; move on.
    Next(CascadeState),
}

/// Mutable bookkeeping for one publication's run.
struct CascadeRun<'p> {
    publication: &'p Publication,
    title: String,
    /// Identifier candidates considered so far, in order.
    candidates: Vec<String>,
    /// Normalized forms of `candidates`.
    seen: HashSet<String>,
    /// Harvested identifiers not yet tried.
    pending: Vec<String>,
    harvest: Option<Harvest>,
}

impl<'p> CascadeRun<'p> {
    fn new(publication: &'p Publication) -> Self {
        Self {
            publication,
            title: collapse_whitespace(&publication.title),
            candidates: Vec::new(),
            seen: HashSet::new(),
            pending: Vec::new(),
            harvest: None,
        }
    }

    /// Add an identifier if its normalized form is new. Returns whether it was added.
    fn consider(&mut self, issn: &str) -> bool {
        let key = normalize_issn(issn);
        if key.is_empty() || !self.seen.insert(key) {
            return false;
        }
        self.candidates.push(issn.trim().to_string());
        true
    }

    fn container_titles(&self) -> &[String] {
        self.harvest
            .as_ref()
            .map(|h| h.container_titles.as_slice())
            .unwrap_or_default()
    }

    fn found(self, level: RankLevel, source: CascadeState) -> Resolution {
        Resolution {
            level: Some(level),
            candidates: self.candidates,
            source: Some(source),
        }
    }

    fn unavailable(self) -> Resolution {
        Resolution::unavailable(self.candidates)
    }
}

/// Sequences identifier, harvest and name lookups for one publication.
pub struct RankOrchestrator {
    resolver: RankResolver,
    harvester: CandidateHarvester,
    hints: Arc<HintEngine>,
    debug: bool,
}

impl RankOrchestrator {
    pub fn new(
        resolver: RankResolver,
        harvester: CandidateHarvester,
        hints: Arc<HintEngine>,
        debug: bool,
    ) -> Self {
        Self {
            resolver,
            harvester,
            hints,
            debug,
        }
    }

    pub fn resolver(&self) -> &RankResolver {
        &self.resolver
    }

    /// Run the cascade to completion and report the outcome.
    ///
    /// A publication with neither identifiers nor a title resolves to
    /// unavailable without any lookup.
    pub async fn resolve(&self, publication: &Publication) -> Resolution {
        let mut run = CascadeRun::new(publication);

        let has_issn = publication
            .issns
            .iter()
            .any(|issn| !normalize_issn(issn).is_empty());
        if !has_issn && run.title.is_empty() {
            if self.debug {
                debug!("Cascade skipped: no identifiers and no title");
            }
            return run.unavailable();
        }

        let mut state = CascadeState::DirectIssn;
        loop {
            let step = match state {
                CascadeState::Init | CascadeState::DirectIssn => self.direct_issn(&mut run).await,
                CascadeState::Harvest => self.harvest(&mut run).await,
                CascadeState::RetryIssn => self.retry_issn(&mut run).await,
                CascadeState::NameTitle => self.name_title(&run).await,
                CascadeState::NameVenue => self.name_venue(&run).await,
                CascadeState::Resolved => {
                    if self.debug {
                        debug!(
                            "Cascade for '{}' found no level; candidates={:?}",
                            run.title, run.candidates
                        );
                    }
                    return run.unavailable();
                }
            };

            match step {
                Step::Found(level) => {
                    if self.debug {
                        debug!("Cascade for '{}' resolved in {}: {}", run.title, state, level);
                    }
                    return run.found(level, state);
                }
                Step::Next(next) => {
                    if self.debug {
                        debug!("Cascade for '{}': {} -> {}", run.title, state, next);
                    }
                    state = next;
                }
            }
        }
    }

    /// The publication's own identifiers, plus those of hints matching its
    /// title or completion string.
    async fn direct_issn(&self, run: &mut CascadeRun<'_>) -> Step {
        let publication = run.publication;
        let hinted = self
            .hints
            .matching_issns(&[run.title.as_str(), publication.completion()]);

        let mut direct = Vec::new();
        for issn in publication.issns.iter().chain(hinted.iter()) {
            if run.consider(issn) {
                direct.push(issn.trim().to_string());
            }
        }

        match self.first_issn_level(&direct).await {
            Some(level) => Step::Found(level),
            None => Step::Next(CascadeState::Harvest),
        }
    }

    async fn harvest(&self, run: &mut CascadeRun<'_>) -> Step {
        if run.title.is_empty() {
            return Step::Next(CascadeState::NameTitle);
        }

        let completion = run.publication.completion.as_deref();
        let harvest = self.harvester.harvest(&run.title, completion).await;
        for issn in &harvest.issns {
            if run.consider(issn) {
                run.pending.push(issn.trim().to_string());
            }
        }
        run.harvest = Some(harvest);

        Step::Next(CascadeState::RetryIssn)
    }

    /// Newly harvested identifiers, then a container-title sweep that skips
    /// every identifier already tried.
    async fn retry_issn(&self, run: &mut CascadeRun<'_>) -> Step {
        let pending = std::mem::take(&mut run.pending);
        if let Some(level) = self.first_issn_level(&pending).await {
            return Step::Found(level);
        }

        if !run.container_titles().is_empty() {
            let swept = self
                .harvester
                .harvest_container_titles(run.container_titles(), &run.seen)
                .await;
            let mut fresh = Vec::new();
            for issn in &swept {
                if run.consider(issn) {
                    fresh.push(issn.trim().to_string());
                }
            }
            if let Some(level) = self.first_issn_level(&fresh).await {
                return Step::Found(level);
            }
        }

        Step::Next(CascadeState::NameTitle)
    }

    async fn name_title(&self, run: &CascadeRun<'_>) -> Step {
        if !run.title.is_empty() {
            if let Some(level) = self.resolver.resolve_name(&run.title).await {
                return Step::Found(level);
            }
        }
        Step::Next(CascadeState::NameVenue)
    }

    /// Host-supplied venue name, canonical names of matching hints, then
    /// harvested container titles with years stripped.
    async fn name_venue(&self, run: &CascadeRun<'_>) -> Step {
        let publication = run.publication;
        let container_titles = run.container_titles();

        let mut texts = vec![run.title.as_str(), publication.completion()];
        texts.extend(container_titles.iter().map(String::as_str));

        let names = publication
            .venue
            .iter()
            .cloned()
            .chain(self.hints.matching_names(&texts))
            .chain(container_titles.iter().map(|ct| strip_year_tokens(ct)));

        let mut tried: HashSet<String> = HashSet::new();
        // Already looked up in name-title.
        tried.insert(normalize_name(&run.title));

        for name in names {
            let key = normalize_name(&name);
            if key.is_empty() || !tried.insert(key) {
                continue;
            }
            if let Some(level) = self.resolver.resolve_name(&name).await {
                return Step::Found(level);
            }
        }

        Step::Next(CascadeState::Resolved)
    }

    async fn first_issn_level(&self, issns: &[String]) -> Option<RankLevel> {
        for issn in issns {
            let level = self.resolver.resolve_issn(issn).await;
            if self.debug {
                debug!("ISSN lookup {} -> {:?}", issn, level);
            }
            if level.is_some() {
                return level;
            }
        }
        None
    }
}
