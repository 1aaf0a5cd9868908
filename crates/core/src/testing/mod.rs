//! Testing utilities and mock implementations of the external services.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rankbadge_core::testing::{MockBibliographicService, MockRankingService};
//!
//! let ranking = Arc::new(MockRankingService::new());
//! let bibliographic = Arc::new(MockBibliographicService::new());
//!
//! ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;
//! // Hand both to RankBadger::new(...)
//! ```

mod mock_bibliographic;
mod mock_ranking;

pub use mock_bibliographic::{MockBibliographicService, RecordedBibliographicQuery};
pub use mock_ranking::{MockRankingService, RecordedRankingQuery, MOCK_RANKING_BASE};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::bibliographic::WorkSummary;
    use crate::orchestrator::Publication;

    /// A work summary with the given identifiers and container titles.
    pub fn work(issns: &[&str], container_titles: &[&str]) -> WorkSummary {
        WorkSummary {
            issns: issns.iter().map(|s| s.to_string()).collect(),
            container_titles: container_titles.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A publication with only a title.
    pub fn titled(title: &str) -> Publication {
        Publication {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// A publication with a title and identifiers.
    pub fn with_issns(title: &str, issns: &[&str]) -> Publication {
        Publication {
            title: title.to_string(),
            issns: issns.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}
