use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamfind_core::{
    create_hoster, load_config, validate_config, FileHoster, HistoryStore, JsonHistoryStore,
    MetadataCatalog, TmdbClient,
};
use streamfind_server::api::create_router;
use streamfind_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("streamfind {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("STREAMFIND_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("History directory: {:?}", config.history.dir);

    // History store
    let history: Arc<dyn HistoryStore> = Arc::new(JsonHistoryStore::from_config(&config.history));

    // Create file hoster if configured
    let hoster: Option<Arc<dyn FileHoster>> = match &config.hoster {
        Some(hoster_config) => {
            info!("Initializing {} hoster", hoster_config.backend.as_str());
            Some(create_hoster(hoster_config).context("Failed to create file hoster")?)
        }
        None => {
            warn!("No file hoster configured, resolution endpoints are disabled");
            None
        }
    };

    // Create metadata catalog if configured
    let catalog: Option<Arc<dyn MetadataCatalog>> = match &config.catalog.tmdb {
        Some(tmdb_config) => {
            info!("Initializing TMDB client (languages: {:?})", tmdb_config.languages);
            Some(Arc::new(
                TmdbClient::new(tmdb_config.clone()).context("Failed to create TMDB client")?,
            ))
        }
        None => {
            info!("Metadata catalog not configured");
            None
        }
    };

    let addr = SocketAddr::new(config.server.host, config.server.port);

    // Create app state and router
    let state = Arc::new(AppState::new(config, hoster, catalog, history));
    let app = create_router(state);

    // Start server
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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
