use anyhow::Context;
use clinic_records_core::db::Database;
use clinic_records_web::{router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.default_log_filter().into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY not set; using the insecure development key");
    }

    Database::bootstrap(&config.db_path)
        .with_context(|| format!("failed to initialise database at {}", config.db_path.display()))?;
    tracing::info!(path = %config.db_path.display(), "database ready");

    let addr = config.bind_addr();
    let app = router(AppState::new(config)?);

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;
    tracing::info!(%addr, "clinic records listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
