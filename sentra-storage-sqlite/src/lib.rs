//! SQLite storage backend for Sentra
//!
//! Provides [`SqliteRepositoryProvider`], which implements the repository
//! traits from `sentra-core` over a `sqlx` SQLite pool, plus the versioned
//! migrations that create the schema.

pub mod migrations;
pub mod repositories;

pub use repositories::{
    SqliteAccountRepository, SqliteAssetRepository, SqliteIncidentRepository,
    SqliteRepositoryProvider,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use sentra_core::{Error, error::StorageError};

impl SqliteRepositoryProvider {
    /// Connect to a SQLite database by URL (e.g. `sqlite:sentra.db` or
    /// `sqlite::memory:`), creating the file if needed.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Storage(StorageError::Connection(e.to_string())))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to SQLite database");
                Error::Storage(StorageError::Connection(e.to_string()))
            })?;

        Ok(Self::new(pool))
    }
}
