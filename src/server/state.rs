//! Shared application state handed to every handler

use crate::core::error::StoreError;
use crate::core::service::Repository;
use crate::entities::{Module, Provider, ProviderUser, Role, Screen, Tenant};
use crate::storage::{InMemoryRepository, MongoRepository};
use std::sync::Arc;

/// One repository per entity, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<dyn Repository<Provider>>,
    pub provider_users: Arc<dyn Repository<ProviderUser>>,
    pub tenants: Arc<dyn Repository<Tenant>>,
    pub roles: Arc<dyn Repository<Role>>,
    pub modules: Arc<dyn Repository<Module>>,
    pub screens: Arc<dyn Repository<Screen>>,
}

impl AppState {
    /// State backed by process memory (tests and local experiments)
    pub fn in_memory() -> Self {
        Self {
            providers: Arc::new(InMemoryRepository::<Provider>::new()),
            provider_users: Arc::new(InMemoryRepository::<ProviderUser>::new()),
            tenants: Arc::new(InMemoryRepository::<Tenant>::new()),
            roles: Arc::new(InMemoryRepository::<Role>::new()),
            modules: Arc::new(InMemoryRepository::<Module>::new()),
            screens: Arc::new(InMemoryRepository::<Screen>::new()),
        }
    }

    /// State backed by MongoDB, creating the unique indexes first
    pub async fn mongo(database: &mongodb::Database) -> Result<Self, StoreError> {
        Ok(Self {
            providers: mongo_repository::<Provider>(database).await?,
            provider_users: mongo_repository::<ProviderUser>(database).await?,
            tenants: mongo_repository::<Tenant>(database).await?,
            roles: mongo_repository::<Role>(database).await?,
            modules: mongo_repository::<Module>(database).await?,
            screens: mongo_repository::<Screen>(database).await?,
        })
    }
}

async fn mongo_repository<T: crate::core::record::Record>(
    database: &mongodb::Database,
) -> Result<Arc<MongoRepository<T>>, StoreError> {
    let repo = MongoRepository::<T>::new(database.clone());
    repo.ensure_indexes().await?;
    Ok(Arc::new(repo))
}
