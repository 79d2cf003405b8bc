//! # SaaS Admin
//!
//! Administrative REST backend for a multi-tenant SaaS platform, storing
//! providers, provider users, tenants, roles, modules and screens in MongoDB.
//!
//! ## Features
//!
//! - **Referential checks**: every ID reference is validated before writes
//! - **Expanded reads**: roles embed their modules and modules their screens
//! - **superAdmin grant**: every screen carries full permissions for `superAdmin`
//! - **Resilient startup**: bounded retries with exponential backoff and jitter
//! - **Uniform envelopes**: `{ success, message, data }` on every response
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use saas_admin::prelude::*;
//!
//! let config = AppConfig::load()?;
//! let connection = DatabaseConnection::connect(&config.database).await?;
//! let state = AppState::mongo(&connection.database()).await?;
//!
//! ServerBuilder::new()
//!     .with_state(state)
//!     .with_api_prefix(&config.server.api_prefix)
//!     .with_cors(config.cors.clone())
//!     .register_entities()
//!     .serve("0.0.0.0:4000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};

    pub use crate::core::{
        AdminError, ApiResponse, ListQuery, Page, Record, RecordId, Repository, StoreError,
    };

    pub use crate::entities::{Module, Provider, ProviderUser, Role, Screen, Tenant};

    pub use crate::server::{AppState, EntityDescriptor, EntityRegistry, ServerBuilder};

    pub use crate::storage::{DatabaseConnection, InMemoryRepository, MongoRepository, RetryPolicy};
}
