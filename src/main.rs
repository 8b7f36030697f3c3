//! Gatehouse server binary.

use anyhow::{Context, Result};
use dotenv::dotenv;
use gatehouse::auth::{
    AppState, CredentialStore, LocalPasswordStrategy, SessionManager, SessionStore,
};
use gatehouse::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    let _ = dotenv();
    init_tracing();

    let config = Arc::new(Config::from_env());

    info!("🚪 Gatehouse starting");

    let users = Arc::new(CredentialStore::new(&config.db_path)?);
    info!("🔐 Credential store initialized at: {}", config.db_path);

    if config.seed_demo_users {
        users.seed_user("paul", "hunter2")?;
    }

    let sessions = Arc::new(SessionManager::new(
        SessionStore::new(&config.db_path, config.session_ttl_secs)?,
        users.clone(),
    ));
    info!(
        "⏳ Sessions expire after {} seconds (absolute TTL)",
        config.session_ttl_secs
    );

    let strategy = Arc::new(LocalPasswordStrategy::new(users));
    let state = AppState::new(sessions, strategy, config.clone());

    let app = gatehouse::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter support
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
