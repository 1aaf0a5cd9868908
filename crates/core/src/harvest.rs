//! Candidate identifier harvesting from the bibliographic service.
//!
//! Used when a publication's own identifiers are missing or unproductive.
//! Failures at any step only shrink the harvest.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::bibliographic::{BibliographicService, WorkSummary};
use crate::hints::HintEngine;
use crate::normalize::{collapse_whitespace, normalize_issn};

/// Default number of works requested by the bibliographic query.
pub const DEFAULT_HARVEST_ROWS: u32 = 8;

/// Default number of works requested per container-title query.
pub const DEFAULT_CONTAINER_ROWS: u32 = 3;

/// What a harvest produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Harvest {
    /// Candidate identifiers in encounter order, not deduplicated.
    pub issns: Vec<String>,
    /// Distinct container titles in encounter order.
    pub container_titles: Vec<String>,
}

/// Harvests candidate identifiers and container titles for a publication.
pub struct CandidateHarvester {
    bibliographic: Arc<dyn BibliographicService>,
    hints: Arc<HintEngine>,
    rows: u32,
    container_rows: u32,
    debug: bool,
}

impl CandidateHarvester {
    pub fn new(
        bibliographic: Arc<dyn BibliographicService>,
        hints: Arc<HintEngine>,
        rows: u32,
        container_rows: u32,
        debug: bool,
    ) -> Self {
        Self {
            bibliographic,
            hints,
            rows,
            container_rows,
            debug,
        }
    }

    /// Run the full harvest for a title and optional completion string.
    ///
    /// 1. Bibliographic query on title + completion.
    /// 2. Hint rules matched against title, completion and container titles.
    /// 3. If still no identifier, a container-title sweep.
    pub async fn harvest(&self, title: &str, completion: Option<&str>) -> Harvest {
        let query = collapse_whitespace(&format!("{} {}", title, completion.unwrap_or_default()));
        let mut harvest = Harvest::default();
        if query.is_empty() {
            return harvest;
        }

        match self.bibliographic.search_bibliographic(&query, self.rows).await {
            Ok(works) => collect_works(&mut harvest, works),
            Err(e) => warn!("Bibliographic search for '{}' failed: {}", query, e),
        }

        let mut texts = vec![title, completion.unwrap_or_default()];
        texts.extend(harvest.container_titles.iter().map(String::as_str));
        let hinted = self.hints.matching_issns(&texts);
        harvest.issns.extend(hinted);

        if self.debug {
            debug!(
                "Harvest first pass for '{}': issns={:?}, container_titles={:?}",
                query, harvest.issns, harvest.container_titles
            );
        }

        if harvest.issns.is_empty() && !harvest.container_titles.is_empty() {
            let swept = self
                .harvest_container_titles(&harvest.container_titles, &HashSet::new())
                .await;
            harvest.issns.extend(swept);
        }

        harvest
    }

    /// Query container titles in order until one yields identifiers not in
    /// `seen` (normalized). Returns those new identifiers, deduplicated.
    pub async fn harvest_container_titles(
        &self,
        container_titles: &[String],
        seen: &HashSet<String>,
    ) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut found_keys: HashSet<String> = HashSet::new();

        for container_title in container_titles {
            if container_title.trim().is_empty() {
                continue;
            }

            match self
                .bibliographic
                .search_container_title(container_title, self.container_rows)
                .await
            {
                Ok(works) => {
                    for issn in works.into_iter().flat_map(|w| w.issns) {
                        let key = normalize_issn(&issn);
                        if !key.is_empty() && !seen.contains(&key) && found_keys.insert(key) {
                            found.push(issn);
                        }
                    }
                }
                Err(e) => warn!(
                    "Container-title search for '{}' failed: {}",
                    container_title, e
                ),
            }

            if self.debug {
                debug!("Container-title sweep '{}': {:?}", container_title, found);
            }
            if !found.is_empty() {
                break;
            }
        }

        found
    }
}

fn collect_works(harvest: &mut Harvest, works: Vec<WorkSummary>) {
    for work in works {
        harvest.issns.extend(work.issns);
        for container_title in work.container_titles {
            if !harvest.container_titles.contains(&container_title) {
                harvest.container_titles.push(container_title);
            }
        }
    }
}
