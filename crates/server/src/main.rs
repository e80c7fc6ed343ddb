use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dramas_core::{
    load_config, load_config_from_env, validate_config, Config, D1Client, KvClient, QueryStore,
    ResultCache,
};
use dramas_server::{api::create_router, state::AppState};

/// How often idle rate limit buckets are dropped.
const RATE_LIMIT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

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

    let config = load()?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    if !config.cloudflare.has_credentials() {
        warn!("Cloudflare credentials are not set; catalog routes will fail until they are");
    }

    // Query store
    let store: Arc<dyn QueryStore> = Arc::new(
        D1Client::new(&config.cloudflare).context("Failed to create D1 client")?,
    );
    info!(
        database = %config.cloudflare.d1.database_name,
        "D1 client initialized"
    );

    // Result cache (optional)
    let cache = match KvClient::new(&config.cloudflare) {
        Ok(kv) => {
            info!(
                ttl_secs = config.cache.search_ttl_secs,
                "KV result cache enabled"
            );
            ResultCache::new(Arc::new(kv))
        }
        Err(e) => {
            info!("KV result cache disabled: {}", e);
            ResultCache::disabled()
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, cache));

    // Keep rate limiter memory bounded by the active client set
    let purge_state = Arc::clone(&state);
    let purge_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = purge_state.rate_limiter().purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "Purged expired rate limit buckets");
            }
        }
    });

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutting down...");
    purge_handle.abort();

    Ok(())
}

/// Load configuration from `DRAMAS_CONFIG` (default `config.toml`), falling
/// back to the environment alone when the default file does not exist.
fn load() -> Result<Config> {
    let explicit = std::env::var("DRAMAS_CONFIG").ok().map(PathBuf::from);
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    if explicit.is_none() && !config_path.exists() {
        info!("No config file found, using defaults and environment");
        return load_config_from_env().context("Failed to load config from environment");
    }

    info!("Loading configuration from {:?}", config_path);
    load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))
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
