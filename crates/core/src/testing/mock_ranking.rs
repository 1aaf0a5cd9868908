//! Mock ranking service for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::normalize::{normalize_issn, normalize_name};
use crate::ranking::{RankRecord, RankingError, RankingService};

/// Base URL used to build detail links for mock records.
pub const MOCK_RANKING_BASE: &str = "mock://jufo";

/// A recorded ranking query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRankingQuery {
    SearchByIssn { issn: String },
    SearchByName { name: String },
    FetchDetail { link: String },
}

/// Mock implementation of the RankingService trait.
///
/// Identifier searches are matched on the normalized identifier, name
/// searches on the normalized name, detail fetches on the exact link.
///
/// # Example
///
/// ```rust,ignore
/// use rankbadge_core::testing::MockRankingService;
///
/// let ranking = MockRankingService::new();
/// ranking.add_venue("1758-4078", "Library Hi Tech", "2").await;
///
/// let records = ranking.search_by_issn("17584078").await?;
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockRankingService {
    /// Search records by normalized identifier.
    by_issn: Arc<RwLock<HashMap<String, Vec<RankRecord>>>>,
    /// Search records by normalized name.
    by_name: Arc<RwLock<HashMap<String, Vec<RankRecord>>>>,
    /// Detail payloads by link.
    details: Arc<RwLock<HashMap<String, Vec<RankRecord>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedRankingQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<RankingError>>>,
    /// If true, every operation fails.
    offline: Arc<RwLock<bool>>,
    next_id: AtomicU32,
}

impl Default for MockRankingService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRankingService {
    /// Create a new empty mock ranking service.
    pub fn new() -> Self {
        Self {
            by_issn: Arc::new(RwLock::new(HashMap::new())),
            by_name: Arc::new(RwLock::new(HashMap::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            offline: Arc::new(RwLock::new(false)),
            next_id: AtomicU32::new(1),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Register a venue findable by identifier and by name, whose detail
    /// record carries `level`. Returns the detail link.
    pub async fn add_venue(&self, issn: &str, name: &str, level: &str) -> String {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let search_record = RankRecord {
            issn: Some(issn.to_string()),
            name: Some(name.to_string()),
            venue_id: Some(id.clone()),
            level: Some(level.to_string()),
            ..Default::default()
        };
        let link = self.detail_link(&search_record).unwrap_or_default();

        self.push_issn_record(issn, search_record.clone()).await;
        self.push_name_record(name, search_record).await;
        self.set_detail(
            &link,
            vec![RankRecord {
                issn: Some(issn.to_string()),
                name: Some(name.to_string()),
                level: Some(level.to_string()),
                ..Default::default()
            }],
        )
        .await;
        link
    }

    /// Append a search record returned for an identifier query.
    pub async fn push_issn_record(&self, issn: &str, record: RankRecord) {
        self.by_issn
            .write()
            .await
            .entry(normalize_issn(issn))
            .or_default()
            .push(record);
    }

    /// Append a search record returned for a name query.
    pub async fn push_name_record(&self, name: &str, record: RankRecord) {
        self.by_name
            .write()
            .await
            .entry(normalize_name(name))
            .or_default()
            .push(record);
    }

    /// Set the detail payload served at a link.
    pub async fn set_detail(&self, link: &str, records: Vec<RankRecord>) {
        self.details.write().await.insert(link.to_string(), records);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedRankingQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Identifier queries performed, in order.
    pub async fn issn_queries(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .filter_map(|q| match q {
                RecordedRankingQuery::SearchByIssn { issn } => Some(issn.clone()),
                _ => None,
            })
            .collect()
    }

    /// Name queries performed, in order.
    pub async fn name_queries(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .filter_map(|q| match q {
                RecordedRankingQuery::SearchByName { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Detail links fetched, in order.
    pub async fn detail_fetches(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .filter_map(|q| match q {
                RecordedRankingQuery::FetchDetail { link } => Some(link.clone()),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: RankingError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every operation fail until switched back.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    /// Record a query, then fail if an error is pending.
    async fn enter(&self, query: RecordedRankingQuery) -> Result<(), RankingError> {
        self.queries.write().await.push(query);

        if *self.offline.read().await {
            return Err(RankingError::ApiError {
                status: 503,
                message: "mock ranking service offline".to_string(),
            });
        }
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RankingService for MockRankingService {
    async fn search_by_issn(&self, issn: &str) -> Result<Vec<RankRecord>, RankingError> {
        self.enter(RecordedRankingQuery::SearchByIssn {
            issn: issn.to_string(),
        })
        .await?;

        Ok(self
            .by_issn
            .read()
            .await
            .get(&normalize_issn(issn))
            .cloned()
            .unwrap_or_default())
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<RankRecord>, RankingError> {
        self.enter(RecordedRankingQuery::SearchByName {
            name: name.to_string(),
        })
        .await?;

        Ok(self
            .by_name
            .read()
            .await
            .get(&normalize_name(name))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_detail(&self, link: &str) -> Result<Vec<RankRecord>, RankingError> {
        self.enter(RecordedRankingQuery::FetchDetail {
            link: link.to_string(),
        })
        .await?;

        Ok(self
            .details
            .read()
            .await
            .get(link)
            .cloned()
            .unwrap_or_default())
    }

    fn detail_link(&self, record: &RankRecord) -> Option<String> {
        record.detail_link(MOCK_RANKING_BASE)
    }
}
