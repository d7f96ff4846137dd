mod common;
mod config;
mod routes;

mod animals;
mod api_v1;
mod breedings;
mod cages;
mod experiments;
mod exports;
mod parameters;
mod reports;
mod strains;
mod studies;
mod timed_matings;
mod veterinary;

use crate::config::Config;
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing/logging
    tracing_subscriber::fmt::init();
    tracing::info!("Starting server...");

    let config: Config = Config::from_env()?;
    let db_url = config
        .db_url
        .as_deref()
        .context("No database URL configured")?;

    let db: DatabaseConnection = Database::connect(db_url)
        .await
        .context("Could not connect to the database")?;
    if let Err(err) = db.ping().await {
        tracing::warn!("Database ping failed: {err}");
    } else {
        tracing::info!("Connected to the database");
    }

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("DB migrations complete");

    tracing::info!(
        "Starting server {} ({} deployment) ...",
        config.app_name,
        config.deployment.to_uppercase()
    );

    let router = routes::build_router(&db, &config)?;
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Could not bind {}", config.listen_addr))?;
    tracing::info!("Listening on {}", config.listen_addr);

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
