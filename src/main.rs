//! SaaS admin API server
//!
//! Loads configuration from the environment (and an optional YAML file),
//! connects to MongoDB with retries, then serves the REST API until
//! SIGINT, SIGTERM or a panic outside request handling.

use anyhow::Context;
use saas_admin::config::AppConfig;
use saas_admin::server::{AppState, ServerBuilder, ShutdownTrigger, install_panic_hook};
use saas_admin::storage::DatabaseConnection;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let shutdown = ShutdownTrigger::new();
    install_panic_hook(shutdown.clone());

    match run(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(shutdown: ShutdownTrigger) -> anyhow::Result<()> {
    let config = AppConfig::load().context("invalid configuration")?;

    tracing::info!(
        environment = %config.server.environment,
        api_prefix = %config.server.api_prefix,
        "starting saas-admin"
    );

    let connection = DatabaseConnection::connect(&config.database).await?;
    let state = AppState::mongo(&connection.database())
        .await
        .context("failed to prepare collections")?;

    let addr = format!("0.0.0.0:{}", config.server.port);
    let served = ServerBuilder::new()
        .with_state(state)
        .with_api_prefix(config.server.api_prefix.clone())
        .with_cors(config.cors.clone())
        .expose_internal_errors(!config.server.is_production())
        .with_shutdown_trigger(shutdown)
        .register_entities()
        .serve(&addr)
        .await;

    connection.close().await;
    served
}
