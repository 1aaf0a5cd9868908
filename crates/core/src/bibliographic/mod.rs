//! Bibliographic search integration (Crossref).
//!
//! Used by the harvester to discover candidate identifiers and container
//! titles for publications that arrive with sparse metadata.

mod crossref;
mod types;

pub use crossref::{CrossrefClient, CrossrefConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the bibliographic service.
#[derive(Debug, Error)]
pub enum BibliographicError {
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

/// A bibliographic works search backend.
#[async_trait]
pub trait BibliographicService: Send + Sync {
    /// Free-text bibliographic query (title plus completion string).
    async fn search_bibliographic(
        &self,
        query: &str,
        rows: u32,
    ) -> Result<Vec<WorkSummary>, BibliographicError>;

    /// Works whose container title matches the given title.
    async fn search_container_title(
        &self,
        container_title: &str,
        rows: u32,
    ) -> Result<Vec<WorkSummary>, BibliographicError>;
}
