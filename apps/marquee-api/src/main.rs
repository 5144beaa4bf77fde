//! Marquee API
//!
//! HTTP entry point of the movie catalog and rating backend. Every request
//! gets its own database session over a shared SQLite pool.

mod config;
mod dto;
mod handlers;
mod routes;
mod state;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{ApiConfig, LogFormat};
pub use state::AppState;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    info!("Starting Marquee API");

    let pool = marquee_sql::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to open the database")?;
    marquee_sql::MIGRATOR
        .run(&pool)
        .await
        .context("failed to apply migrations")?;
    info!("Database schema up to date");

    let addr = config.bind_address();
    let app = routes::create_router(AppState::new(pool, config));

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
