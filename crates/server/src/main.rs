use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rankbadge_core::{
    load_config, validate_config, BibliographicService, CrossrefClient, JufoClient, RankBadger,
    RankingService,
};
use rankbadge_server::{api::create_router, state::AppState};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize logging. `RANKBADGE_LOG_FORMAT=json` switches to JSON lines.
fn init_logging(resolver_debug: bool) {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if resolver_debug {
        if let Ok(directive) = "rankbadge_core=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let json = std::env::var("RANKBADGE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("RANKBADGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Logging depends on the resolver debug flag, so it starts after loading
    let loaded = load_config(&config_path);
    init_logging(loaded.as_ref().is_ok_and(|c| c.resolver.debug));

    info!("Loading configuration from {:?}", config_path);
    let config = loaded.with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Ranking service: {}", config.ranking.base_url);
    info!("Bibliographic service: {}", config.bibliographic.base_url);
    if !config.resolver.enabled {
        info!("Rank resolution disabled in config");
    }

    let ranking: Arc<dyn RankingService> = Arc::new(
        JufoClient::new(config.ranking.clone()).context("Failed to create ranking client")?,
    );
    let bibliographic: Arc<dyn BibliographicService> = Arc::new(
        CrossrefClient::new(config.bibliographic.clone())
            .context("Failed to create bibliographic client")?,
    );

    let badger = Arc::new(RankBadger::new(
        ranking,
        bibliographic,
        config.resolver.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), badger));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
