//! # DecisionLog API Server
//!
//! Loads configuration from the environment, connects to PostgreSQL, applies
//! pending migrations and serves the API until Ctrl+C.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/decisionlog \
//! JWT_SECRET=change-me-to-a-long-random-string-of-32+ \
//! cargo run -p decisionlog-api
//! ```

use anyhow::Context;
use decisionlog_api::{
    app::{build_router, AppState},
    config::Config,
};
use decisionlog_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "decisionlog_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "DecisionLog API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    // Needs access to the server's maintenance database; the pool below
    // reports the real failure if this can't run
    if let Err(e) = ensure_database_exists(&config.database.url).await {
        tracing::warn!(error = %e, "Could not check whether the database exists");
    }

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::new(config.database.url.clone())
    })
    .await
    .context("Failed to connect to the database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, draining connections...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal");
    }
}
