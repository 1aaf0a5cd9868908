//! Ranking service integration (Publication Forum / JUFO).
//!
//! The ranking service answers two searches, by identifier and by name,
//! plus a per-venue detail endpoint that carries the level.

mod jufo;
mod types;

pub(crate) use jufo::default_user_agent;
pub use jufo::{JufoClient, JufoConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the ranking service.
#[derive(Debug, Error)]
pub enum RankingError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// A venue ranking lookup backend.
#[async_trait]
pub trait RankingService: Send + Sync {
    /// Search records by identifier, exactly as given.
    async fn search_by_issn(&self, issn: &str) -> Result<Vec<RankRecord>, RankingError>;

    /// Search records by free-text venue name.
    async fn search_by_name(&self, name: &str) -> Result<Vec<RankRecord>, RankingError>;

    /// Fetch the detail payload behind a detail link.
    async fn fetch_detail(&self, link: &str) -> Result<Vec<RankRecord>, RankingError>;

    /// Resolve the detail link for a search record.
    fn detail_link(&self, record: &RankRecord) -> Option<String>;
}
