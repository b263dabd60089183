//! # posts-board binary
//!
//! Assembles the board from configuration and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use api_adapters::{create_router, AppState, HttpSettings};
use configs::{AppConfig, LogConfig};
use domains::UserId;
use services::{KeyedHasher, OneTimeTokenGuard, PostService, TrackingIdentityManager};
use storage_adapters::InMemoryPostRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_tracing(&config.log);

    // 1. Trust layer
    let hasher = KeyedHasher::new(&config.tracking.secret).context("building keyed hasher")?;
    let ttl = chrono::Duration::try_hours(config.tracking.ttl_hours).context("tracking.ttl_hours out of range")?;
    let tracking = TrackingIdentityManager::with_ttl(hasher, ttl);
    let tokens = Arc::new(OneTimeTokenGuard::new());

    // 2. Storage
    let repo = Arc::new(InMemoryPostRepository::new());

    // 3. Orchestration
    let posts = PostService::new(repo, tokens, UserId::new(config.auth.admin_identity.clone()));
    let state = AppState::new(
        posts,
        tracking,
        HttpSettings {
            cookie_name: config.tracking.cookie_name.clone(),
            user_header: config.auth.user_header.clone(),
        },
    );

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "posts-board listening");

    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("posts-board stopped");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    if log.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
