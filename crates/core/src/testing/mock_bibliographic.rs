//! Mock bibliographic service for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::bibliographic::{BibliographicError, BibliographicService, WorkSummary};

/// A recorded bibliographic query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedBibliographicQuery {
    Bibliographic { query: String, rows: u32 },
    ContainerTitle { container_title: String, rows: u32 },
}

/// Mock implementation of the BibliographicService trait.
///
/// Free-text searches return the works registered under the first key that
/// appears (case-insensitively) inside the query. Container-title searches
/// match the title exactly, ignoring case. Results are truncated to `rows`.
#[derive(Debug)]
pub struct MockBibliographicService {
    /// (lowercased needle, works) in registration order.
    works: Arc<RwLock<Vec<(String, Vec<WorkSummary>)>>>,
    /// Works by lowercased container title.
    by_container: Arc<RwLock<HashMap<String, Vec<WorkSummary>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedBibliographicQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<BibliographicError>>>,
}

impl Default for MockBibliographicService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBibliographicService {
    /// Create a new empty mock bibliographic service.
    pub fn new() -> Self {
        Self {
            works: Arc::new(RwLock::new(Vec::new())),
            by_container: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Works returned for any free-text query containing `needle`.
    pub async fn add_works(&self, needle: &str, works: Vec<WorkSummary>) {
        self.works.write().await.push((needle.to_lowercase(), works));
    }

    /// Works returned for a container-title query.
    pub async fn add_container_works(&self, container_title: &str, works: Vec<WorkSummary>) {
        self.by_container
            .write()
            .await
            .insert(container_title.to_lowercase(), works);
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedBibliographicQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Container titles queried, in order.
    pub async fn container_queries(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .filter_map(|q| match q {
                RecordedBibliographicQuery::ContainerTitle { container_title, .. } => {
                    Some(container_title.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: BibliographicError) {
        *self.next_error.write().await = Some(error);
    }

    async fn enter(&self, query: RecordedBibliographicQuery) -> Result<(), BibliographicError> {
        self.queries.write().await.push(query);
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BibliographicService for MockBibliographicService {
    async fn search_bibliographic(
        &self,
        query: &str,
        rows: u32,
    ) -> Result<Vec<WorkSummary>, BibliographicError> {
        self.enter(RecordedBibliographicQuery::Bibliographic {
            query: query.to_string(),
            rows,
        })
        .await?;

        let query_lower = query.to_lowercase();
        let works = self.works.read().await;
        Ok(works
            .iter()
            .find(|(needle, _)| query_lower.contains(needle.as_str()))
            .map(|(_, works)| works.iter().take(rows as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_container_title(
        &self,
        container_title: &str,
        rows: u32,
    ) -> Result<Vec<WorkSummary>, BibliographicError> {
        self.enter(RecordedBibliographicQuery::ContainerTitle {
            container_title: container_title.to_string(),
            rows,
        })
        .await?;

        Ok(self
            .by_container
            .read()
            .await
            .get(&container_title.to_lowercase())
            .map(|works| works.iter().take(rows as usize).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_needle_match_and_row_limit() {
        let bib = MockBibliographicService::new();
        bib.add_works(
            "deep learning",
            vec![
                fixtures::work(&["1111-1111"], &["Venue A"]),
                fixtures::work(&["2222-2222"], &["Venue B"]),
            ],
        )
        .await;

        let works = bib
            .search_bibliographic("A Survey of Deep Learning ", 1)
            .await
            .unwrap();
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].container_titles, vec!["Venue A"]);

        let none = bib.search_bibliographic("unrelated", 8).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_container_query_recorded() {
        let bib = MockBibliographicService::new();
        bib.search_container_title("Venue A", 3).await.unwrap();
        assert_eq!(bib.container_queries().await, vec!["Venue A"]);
        assert_eq!(
            bib.recorded_queries().await[0],
            RecordedBibliographicQuery::ContainerTitle {
                container_title: "Venue A".to_string(),
                rows: 3
            }
        );
    }
}
