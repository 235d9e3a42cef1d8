//! Repository implementations for SQLite storage

pub mod account;
pub mod asset;
pub mod incident;

pub use account::SqliteAccountRepository;
pub use asset::SqliteAssetRepository;
pub use incident::SqliteIncidentRepository;

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use sentra_core::{
    Error,
    error::StorageError,
    repositories::{
        AccountRepositoryProvider, AssetRepositoryProvider, IncidentRepositoryProvider,
        RepositoryProvider,
    },
};

/// Repository provider implementation for SQLite
///
/// This struct implements all the individual repository provider traits
/// as well as the unified `RepositoryProvider` trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    accounts: Arc<SqliteAccountRepository>,
    incidents: Arc<SqliteIncidentRepository>,
    assets: Arc<SqliteAssetRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let accounts = Arc::new(SqliteAccountRepository::new(pool.clone()));
        let incidents = Arc::new(SqliteIncidentRepository::new(pool.clone()));
        let assets = Arc::new(SqliteAssetRepository::new(pool.clone()));

        Self {
            pool,
            accounts,
            incidents,
            assets,
        }
    }
}

impl AccountRepositoryProvider for SqliteRepositoryProvider {
    type AccountRepo = SqliteAccountRepository;

    fn accounts(&self) -> &Self::AccountRepo {
        &self.accounts
    }
}

impl IncidentRepositoryProvider for SqliteRepositoryProvider {
    type IncidentRepo = SqliteIncidentRepository;

    fn incidents(&self) -> &Self::IncidentRepo {
        &self.incidents
    }
}

impl AssetRepositoryProvider for SqliteRepositoryProvider {
    type AssetRepo = SqliteAssetRepository;

    fn assets(&self) -> &Self::AssetRepo {
        &self.assets
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        use crate::migrations::{
            CreateAccountsTable, CreateAssetsTable, CreateIncidentsTable, CreateIndexes,
            SqliteMigrationManager,
        };
        use sentra_migration::{Migration, MigrationManager};

        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        let migrations: Vec<Box<dyn Migration<_>>> = vec![
            Box::new(CreateAccountsTable),
            Box::new(CreateIncidentsTable),
            Box::new(CreateAssetsTable),
            Box::new(CreateIndexes),
        ];
        manager.up(&migrations).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(
                "Failed to run migrations".to_string(),
            ))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;
        Ok(())
    }
}
