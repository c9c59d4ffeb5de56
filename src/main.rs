// review-translator - Bad review translator HTTP service
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use review_translator::cli::Args;
use review_translator::config::AppConfig;
use review_translator::gate::UsageGate;
use review_translator::llm::ChatCompletionClient;
use review_translator::server::create_router;
use review_translator::store::UsageStore;
use review_translator::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before anything reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting review-translator v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Open the usage store
    let store = UsageStore::open(&config.database.path)?;
    let gate = UsageGate::new(store, config.trial.free_trial_limit);
    info!(
        "Usage store ready at {} (free trial limit: {})",
        config.database.path, config.trial.free_trial_limit
    );

    // Phase 4: Generation client
    if config.llm.api_key.is_empty() {
        warn!("llm.api_key is empty; generation calls will likely be rejected upstream");
    }
    let generator = ChatCompletionClient::new(&config.llm)?
        .with_sanitized_errors(config.logging.sanitize_secrets);
    info!("Generation endpoint: {} (model {})", generator.endpoint(), generator.model());

    // Phase 5: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, gate, Arc::new(generator));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
