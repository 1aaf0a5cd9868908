//! Crossref REST client.
//!
//! Crossref asks clients to identify themselves; when `mailto` is set the
//! request lands in the "polite" pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::types::{parse_works, WorkSummary};
use super::{BibliographicError, BibliographicService};
use crate::ranking::default_user_agent;

/// Crossref client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossrefConfig {
    /// Base URL (default: https://api.crossref.org).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Contact address appended to the User-Agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
    /// Request timeout in seconds. Unset leaves the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.crossref.org".to_string()
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            mailto: None,
            timeout_secs: None,
        }
    }
}

impl CrossrefConfig {
    fn effective_user_agent(&self) -> String {
        match self.mailto.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(mailto) => format!("{} (mailto:{})", self.user_agent, mailto.trim()),
            None => self.user_agent.clone(),
        }
    }
}

/// Crossref works client.
pub struct CrossrefClient {
    client: Client,
    base_url: String,
}

impl CrossrefClient {
    /// Create a new Crossref client.
    pub fn new(config: CrossrefConfig) -> Result<Self, BibliographicError> {
        let mut builder = Client::builder().user_agent(config.effective_user_agent());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_works(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<WorkSummary>, BibliographicError> {
        let url = format!("{}/works", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BibliographicError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: Value = response.json().await.map_err(|e| {
            BibliographicError::ParseError(format!("Failed to parse works response: {}", e))
        })?;

        Ok(parse_works(&payload))
    }
}

#[async_trait]
impl BibliographicService for CrossrefClient {
    async fn search_bibliographic(
        &self,
        query: &str,
        rows: u32,
    ) -> Result<Vec<WorkSummary>, BibliographicError> {
        debug!("Crossref search: query.bibliographic='{}', rows={}", query, rows);
        let rows = rows.to_string();
        self.get_works(&[
            ("query.bibliographic", query),
            ("rows", &rows),
            ("select", "DOI,container-title,ISSN"),
        ])
        .await
    }

    async fn search_container_title(
        &self,
        container_title: &str,
        rows: u32,
    ) -> Result<Vec<WorkSummary>, BibliographicError> {
        debug!(
            "Crossref search: query.container-title='{}', rows={}",
            container_title, rows
        );
        let rows = rows.to_string();
        self.get_works(&[
            ("rows", &rows),
            ("select", "ISSN,container-title"),
            ("query.container-title", container_title),
        ])
        .await
    }
}
