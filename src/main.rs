use crate::config::ServerConfig;
use crate::database::CaseStore;
use crate::database::sqlite::SqliteCaseStore;
use crate::io::csv::CsvSeedSource;
use crate::services::{AggregationService, QueryService, SeedOutcome, Seeder};
use anyhow::{Context, bail};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;
mod database;
mod domain;
mod features;
mod io;
mod services;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    pub aggregation_service: Arc<AggregationService>,
}

impl AppState {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self {
            query_service: Arc::new(QueryService::new(store.clone())),
            aggregation_service: Arc::new(AggregationService::new(store)),
        }
    }
}

/// Api router, where features are composed.
pub fn build_app(state: AppState) -> Router {
    let api_router = Router::new()
        .merge(features::health::health_router())
        .merge(features::cases::cases_router());

    Router::new()
        .nest("/api", api_router)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store = SqliteCaseStore::connect(
        &config.database_url,
        config.max_connections,
        config.acquire_timeout,
    )
    .await
    .with_context(|| format!("Failed to connect to {}", config.database_url))?;
    let store: Arc<dyn CaseStore> = Arc::new(store);

    match std::env::args().nth(1).as_deref() {
        None | Some("serve") => serve(store, &config).await,
        Some("seed") => seed(store, &config).await,
        Some(other) => bail!("Unknown command '{}', expected 'serve' or 'seed'", other),
    }
}

async fn serve(store: Arc<dyn CaseStore>, config: &ServerConfig) -> anyhow::Result<()> {
    store
        .ensure_schema_exists()
        .await
        .context("Failed to ensure case_reports schema")?;

    let app = build_app(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received.");
        })
        .await?;

    Ok(())
}

async fn seed(store: Arc<dyn CaseStore>, config: &ServerConfig) -> anyhow::Result<()> {
    info!(path = %config.seed_csv_path.display(), "Starting seed run");

    let seeder = Seeder::new(
        store,
        Box::new(CsvSeedSource::new(config.seed_csv_path.clone())),
    );

    match seeder.run().await.context("Seeding failed, store left unchanged")? {
        SeedOutcome::Seeded { inserted } => info!(inserted, "Seed run complete."),
        SeedOutcome::AlreadySeeded { existing } => {
            info!(existing, "Store already seeded, exiting.")
        }
    }

    Ok(())
}
