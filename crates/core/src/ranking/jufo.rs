//! JUFO REST client.
//!
//! Endpoints used:
//! - `GET {base}/etsi.php?issn=...` and `GET {base}/etsi.php?nimi=...` for search
//! - `GET {base}/kanava/{id}` for venue details (level lives here)
//!
//! Every call is a single attempt. No timeout is set unless configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::types::{parse_records, RankRecord};
use super::{RankingError, RankingService};

/// JUFO client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JufoConfig {
    /// Base URL (default: https://jufo-rest.csc.fi/v1.1).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds. Unset leaves the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://jufo-rest.csc.fi/v1.1".to_string()
}

pub(crate) fn default_user_agent() -> String {
    format!("RankBadge/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for JufoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

/// JUFO REST client.
pub struct JufoClient {
    client: Client,
    base_url: String,
}

impl JufoClient {
    /// Create a new JUFO client.
    pub fn new(config: JufoConfig) -> Result<Self, RankingError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_records(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<RankRecord>, RankingError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RankingError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| RankingError::ParseError(format!("Failed to parse JUFO payload: {}", e)))?;

        Ok(parse_records(&payload))
    }
}

#[async_trait]
impl RankingService for JufoClient {
    async fn search_by_issn(&self, issn: &str) -> Result<Vec<RankRecord>, RankingError> {
        let url = format!("{}/etsi.php", self.base_url);
        debug!("JUFO search: issn='{}'", issn);
        self.get_records(&url, &[("issn", issn)]).await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<RankRecord>, RankingError> {
        let url = format!("{}/etsi.php", self.base_url);
        debug!("JUFO search: nimi='{}'", name);
        self.get_records(&url, &[("nimi", name)]).await
    }

    async fn fetch_detail(&self, link: &str) -> Result<Vec<RankRecord>, RankingError> {
        debug!("JUFO detail: {}", link);
        self.get_records(link, &[]).await
    }

    fn detail_link(&self, record: &RankRecord) -> Option<String> {
        record.detail_link(&self.base_url)
    }
}
