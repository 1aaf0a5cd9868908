//! Types shared by the cascade and its callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ranking::RankLevel;

/// Bibliographic metadata for one publication entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default)]
    pub title: String,
    /// Free-text completion line (authors, venue, year) as shown in the listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
    /// Print and/or electronic identifiers, raw.
    #[serde(default)]
    pub issns: Vec<String>,
    /// Venue name supplied by the host, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl Publication {
    pub fn completion(&self) -> &str {
        self.completion.as_deref().unwrap_or_default()
    }
}

/// States of the resolution cascade, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeState {
    Init,
    DirectIssn,
    Harvest,
    RetryIssn,
    NameTitle,
    NameVenue,
    Resolved,
}

impl CascadeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeState::Init => "init",
            CascadeState::DirectIssn => "direct-issn",
            CascadeState::Harvest => "harvest",
            CascadeState::RetryIssn => "retry-issn",
            CascadeState::NameTitle => "name-title",
            CascadeState::NameVenue => "name-venue",
            CascadeState::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CascadeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of one cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// `None` means unavailable.
    pub level: Option<RankLevel>,
    /// Every identifier candidate considered, in order, deduplicated.
    pub candidates: Vec<String>,
    /// The state that produced the level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CascadeState>,
}

impl Resolution {
    pub fn unavailable(candidates: Vec<String>) -> Self {
        Self {
            level: None,
            candidates,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_deserialize_minimal() {
        let publication: Publication = serde_json::from_str(r#"{"title": "Paper"}"#).unwrap();
        assert_eq!(publication.title, "Paper");
        assert!(publication.issns.is_empty());
        assert_eq!(publication.completion(), "");
    }

    #[test]
    fn test_cascade_state_serializes_kebab() {
        assert_eq!(
            serde_json::to_string(&CascadeState::DirectIssn).unwrap(),
            r#""direct-issn""#
        );
        assert_eq!(CascadeState::NameVenue.to_string(), "name-venue");
    }
}
