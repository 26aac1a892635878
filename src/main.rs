use anyhow::Context;
use axum::http::HeaderValue;
use task_manager::{app, config::Config, db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = db::connect(&config.database_url)
        .await
        .with_context(|| format!("Error connecting DB at {}", config.database_url))?;

    let origin = HeaderValue::from_str(&config.allowed_origin)?;
    let app = app(AppState::new(db), origin);

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;

    tracing::info!(addr = %config.addr(), "server is listening");

    axum::serve(listener, app).await?;
    Ok(())
}
