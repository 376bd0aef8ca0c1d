//! User Directory server.
//!
//! Serves the `UserService` JSON RPC endpoints (default port 50051).
//!
//! # Architecture
//!
//! - Axum web framework, one POST route per RPC method
//! - In-memory user store guarded by a single `RwLock`
//! - Argon2id password hashing on the blocking thread pool
//!
//! Users live only as long as the process; nothing is persisted.

#![cfg_attr(not(test), forbid(unsafe_code))]

use user_directory_server::config::DirectoryConfig;
use user_directory_server::routes;
use user_directory_server::state::AppState;
use user_directory_server::telemetry;

#[tokio::main]
async fn main() {
    let config = DirectoryConfig::from_env().expect("Failed to load configuration");

    // Sentry before tracing so the tracing layer finds a bound hub
    let _sentry_guard = telemetry::init_sentry(config.sentry.as_ref());
    telemetry::init_tracing();

    tracing::info!(
        sentry = config.sentry.is_some(),
        min_password_length = config.password_policy.min_length,
        hashing = ?config.hashing,
        "configuration loaded"
    );

    let state = AppState::new(&config).expect("Failed to initialize user directory");

    let app = routes::router(state.clone())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "user directory listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Nothing is persisted
    tracing::info!(
        users = state.directory().user_count(),
        "user directory stopped, records discarded"
    );
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.expect("Failed to listen for Ctrl+C"),
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");

    tracing::info!("shutdown signal received, draining connections");
}
