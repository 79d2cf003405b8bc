//! Seed a fresh database with the records needed to log in
//!
//! Creates the `superAdmin` role, one provider and one admin user for that
//! provider. Records that already exist are left untouched, so the command
//! can be re-run safely.
//!
//! Environment:
//! - `MONGO_URI` / `MONGO_DB_NAME`: target database (same as the server)
//! - `BOOTSTRAP_PROVIDER_NAME`, `BOOTSTRAP_PROVIDER_EMAIL`
//! - `BOOTSTRAP_ADMIN_USERNAME`, `BOOTSTRAP_ADMIN_EMAIL`, `BOOTSTRAP_ADMIN_PASSWORD`

use anyhow::{Context, bail};
use saas_admin::config::AppConfig;
use saas_admin::core::password::hash_password;
use saas_admin::core::record::NameMatch;
use saas_admin::core::{RecordId, timestamp};
use saas_admin::entities::screen::SUPER_ADMIN_ROLE;
use saas_admin::entities::{Provider, ProviderUser, Role};
use saas_admin::server::AppState;
use saas_admin::storage::DatabaseConnection;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct Seed {
    provider_name: String,
    provider_email: String,
    admin_username: String,
    admin_email: String,
    admin_password: String,
}

impl Seed {
    fn from_env() -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

        let admin_password = match std::env::var("BOOTSTRAP_ADMIN_PASSWORD") {
            Ok(password) if password.len() >= 6 => password,
            Ok(_) => bail!("BOOTSTRAP_ADMIN_PASSWORD must be at least 6 characters"),
            Err(_) => bail!("BOOTSTRAP_ADMIN_PASSWORD is required"),
        };

        Ok(Self {
            provider_name: var("BOOTSTRAP_PROVIDER_NAME", "Test Provider"),
            provider_email: var("BOOTSTRAP_PROVIDER_EMAIL", "provider@example.com").to_lowercase(),
            admin_username: var("BOOTSTRAP_ADMIN_USERNAME", "admin"),
            admin_email: var("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com").to_lowercase(),
            admin_password,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "bootstrap failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let seed = Seed::from_env()?;
    let config = AppConfig::load().context("invalid configuration")?;
    let connection = DatabaseConnection::connect(&config.database).await?;
    let state = AppState::mongo(&connection.database()).await?;

    let result = seed_all(&state, &seed).await;
    connection.close().await;
    result
}

async fn seed_all(state: &AppState, seed: &Seed) -> anyhow::Result<()> {
    let now = timestamp::now();

    match state
        .roles
        .find_one_by("name", SUPER_ADMIN_ROLE, NameMatch::CaseInsensitive, None)
        .await?
    {
        Some(role) => tracing::info!(role_id = %role.id, "superAdmin role already present"),
        None => {
            let role = state
                .roles
                .insert(Role {
                    id: RecordId::generate(),
                    name: SUPER_ADMIN_ROLE.to_string(),
                    modules: Vec::new(),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            tracing::info!(role_id = %role.id, "superAdmin role created");
        }
    }

    let provider = match state
        .providers
        .find_one_by("email", &seed.provider_email, NameMatch::Exact, None)
        .await?
    {
        Some(provider) => {
            tracing::info!(provider_id = %provider.id, "provider already present");
            provider
        }
        None => {
            let provider = state
                .providers
                .insert(Provider {
                    id: RecordId::generate(),
                    name: seed.provider_name.clone(),
                    email: seed.provider_email.clone(),
                    clients: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            tracing::info!(provider_id = %provider.id, "provider created");
            provider
        }
    };

    match state
        .provider_users
        .find_one_by("email", &seed.admin_email, NameMatch::Exact, None)
        .await?
    {
        Some(user) => tracing::info!(user_id = %user.id, "admin user already present"),
        None => {
            let user = state
                .provider_users
                .insert(ProviderUser {
                    id: RecordId::generate(),
                    username: seed.admin_username.clone(),
                    email: seed.admin_email.clone(),
                    password_hash: hash_password(&seed.admin_password)?,
                    is_active: true,
                    provider: provider.id.clone(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            tracing::info!(user_id = %user.id, email = %user.email, "admin user created");
        }
    }

    Ok(())
}
