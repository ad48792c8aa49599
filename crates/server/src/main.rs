//! Userhub - user directory CRUD service.
//!
//! This binary serves a thin JSON CRUD surface over a single `User`
//! resource persisted in MongoDB.
//!
//! # Architecture
//!
//! - Axum web framework
//! - MongoDB for persistence (unique index on `email`)
//! - Explicit validation layer independent of the store
//!
//! A failed store connection at startup is logged but not fatal: the
//! server still binds, and individual requests fail with 500 until the
//! store comes back.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userhub_server::config::AppConfig;
use userhub_server::db::MongoUserRepository;
use userhub_server::routes;
use userhub_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "userhub_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build the repository. The driver connects lazily; `prepare` pings the
    // store and ensures the unique email index, but a failure here only
    // warns - requests fail individually until the store is reachable.
    let repository = MongoUserRepository::connect(&config)
        .await
        .expect("Invalid database connection string");
    match repository.prepare().await {
        Ok(()) => tracing::info!("store reachable, email index ensured"),
        Err(e) => tracing::warn!(error = %e, "store unreachable at startup, continuing"),
    }

    // Build application state
    let state = AppState::new(config.clone(), Arc::new(repository));

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("userhub listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
