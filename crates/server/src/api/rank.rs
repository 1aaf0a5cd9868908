//! Rank resolution API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use rankbadge_core::{Badge, CacheStats, CascadeState, Publication, RankLevel, Resolution};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
pub struct BatchRankRequest {
    pub publications: Vec<Publication>,
}

/// Query string for the HTML badge endpoint.
///
/// `issn` may carry several identifiers separated by commas or spaces.
#[derive(Debug, Default, Deserialize)]
pub struct BadgeParams {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completion: Option<String>,
    #[serde(default)]
    pub issn: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

impl BadgeParams {
    fn into_publication(self) -> Publication {
        let issns = self
            .issn
            .as_deref()
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Publication {
            title: self.title,
            completion: self.completion.filter(|c| !c.trim().is_empty()),
            issns,
            venue: self.venue.filter(|v| !v.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    /// Numeric level, `null` when unavailable.
    pub level: Option<RankLevel>,
    pub badge_text: String,
    pub candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CascadeState>,
    pub html: String,
}

impl From<Resolution> for RankResponse {
    fn from(resolution: Resolution) -> Self {
        let badge = Badge::new(resolution.level).with_candidates(resolution.candidates.clone());
        Self {
            level: resolution.level,
            badge_text: badge.text.clone(),
            candidates: resolution.candidates,
            source: resolution.source,
            html: badge.to_html(),
        }
    }
}

fn disabled() -> ApiError {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "Rank resolution is disabled".to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/rank
///
/// Resolve the rank badge for a single publication.
pub async fn rank(
    State(state): State<Arc<AppState>>,
    Json(publication): Json<Publication>,
) -> Result<Json<RankResponse>, ApiError> {
    let badger = state.badger();
    if !badger.is_enabled() {
        return Err(disabled());
    }

    let resolution = badger.resolve(&publication).await;
    Ok(Json(resolution.into()))
}

/// POST /api/v1/rank/batch
///
/// Resolve many publications concurrently. Results keep request order.
pub async fn rank_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRankRequest>,
) -> Result<Json<Vec<RankResponse>>, ApiError> {
    let badger = state.badger();
    if !badger.is_enabled() {
        return Err(disabled());
    }

    info!("Resolving batch of {} publication(s)", request.publications.len());
    let resolutions = badger.resolve_many(&request.publications).await;
    Ok(Json(resolutions.into_iter().map(RankResponse::from).collect()))
}

/// GET /api/v1/badge
///
/// Resolve and render the badge element directly.
pub async fn badge(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BadgeParams>,
) -> Result<Html<String>, ApiError> {
    let badger = state.badger();
    if !badger.is_enabled() {
        return Err(disabled());
    }

    let resolution = badger.resolve(&params.into_publication()).await;
    let badge = Badge::new(resolution.level).with_candidates(resolution.candidates);
    Ok(Html(badge.to_html()))
}

/// GET /api/v1/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.badger().cache_stats().await)
}
