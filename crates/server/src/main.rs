use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ressipy_core::{
    load_config, validate_config, BootstrapOutcome, CatalogClient, HttpCatalogClient,
    RecipeStore, SqliteRecipeStore, SyncConfig, SyncEngine,
};
use ressipy_server::{api::create_router, state::AppState};

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

    // Determine config path
    let config_path = std::env::var("RESSIPY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Remote catalog: {}", config.remote.base_url);

    // Open the local store
    let store: Arc<dyn RecipeStore> = Arc::new(
        SqliteRecipeStore::new(&config.database.path).context("Failed to open recipe store")?,
    );
    info!("Recipe store initialized");

    // Create remote catalog client
    let client: Arc<dyn CatalogClient> = Arc::new(
        HttpCatalogClient::new(&config.remote).context("Failed to create catalog client")?,
    );

    let engine = Arc::new(SyncEngine::new(
        store,
        client,
        SyncConfig::from(&config.cache),
    ));

    // Bootstrap never blocks startup
    match engine
        .initialize()
        .await
        .context("Failed to initialize recipe store")?
    {
        BootstrapOutcome::Seeded {
            categories,
            recipes,
        } => info!("Seeded {} categories and {} recipes", categories, recipes),
        BootstrapOutcome::AlreadyPopulated => info!("Recipe store already populated"),
        BootstrapOutcome::Disabled => info!("Bootstrap disabled in config"),
        BootstrapOutcome::Failed(reason) => {
            warn!("Bootstrap failed, starting with an empty store: {}", reason)
        }
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), engine));

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
