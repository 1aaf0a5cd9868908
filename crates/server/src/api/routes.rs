use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, rank};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Rank resolution
        .route("/rank", post(rank::rank))
        .route("/rank/batch", post(rank::rank_batch))
        .route("/badge", get(rank::badge))
        .route("/cache/stats", get(rank::cache_stats))
        .with_state(state);

    // Badges are fetched from the pages that embed them.
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
