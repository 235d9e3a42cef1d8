//! Repository traits for the data access layer
//!
//! Services interact with storage exclusively through these traits. The
//! hierarchy mirrors the domain split:
//!
//! - Individual `*Repository` traits define the operations for each record kind
//! - Individual `*RepositoryProvider` traits expose each repository type
//! - [`RepositoryProvider`] is a supertrait combining all providers plus
//!   lifecycle methods (migrations, health checks)
//!
//! Adapters in [`adapter`] wrap an `Arc<Provider>` so services can stay
//! generic over a single repository type parameter.

pub mod account;
pub mod adapter;
pub mod asset;
pub mod incident;

pub use account::AccountRepository;
pub use adapter::{AccountRepositoryAdapter, AssetRepositoryAdapter, IncidentRepositoryAdapter};
pub use asset::{AssetFilter, AssetRepository};
pub use incident::{IncidentFilter, IncidentRepository};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

const MAX_PER_PAGE: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Page {
    /// Clamp the request to sane bounds: page >= 1, 1 <= per_page <= 100.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.per_page as i64
    }
}

/// One page of results plus the total row count for the filter.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page as u64)
        }
    }
}

// ============================================================================
// Individual Repository Provider Traits
// ============================================================================

/// Provider trait for account repository access.
pub trait AccountRepositoryProvider: Send + Sync + 'static {
    /// The account repository implementation type
    type AccountRepo: AccountRepository;

    /// Get the account repository
    fn accounts(&self) -> &Self::AccountRepo;
}

/// Provider trait for incident repository access.
pub trait IncidentRepositoryProvider: Send + Sync + 'static {
    /// The incident repository implementation type
    type IncidentRepo: IncidentRepository;

    /// Get the incident repository
    fn incidents(&self) -> &Self::IncidentRepo;
}

/// Provider trait for asset repository access.
pub trait AssetRepositoryProvider: Send + Sync + 'static {
    /// The asset repository implementation type
    type AssetRepo: AssetRepository;

    /// Get the asset repository
    fn assets(&self) -> &Self::AssetRepo;
}

// ============================================================================
// Unified Repository Provider Trait
// ============================================================================

/// Provider trait that storage backends implement to supply all repositories.
///
/// To implement a custom backend:
/// 1. Implement each individual `*Repository` trait
/// 2. Implement each individual `*RepositoryProvider` trait
/// 3. Implement this trait with `migrate()` and `health_check()`
#[async_trait]
pub trait RepositoryProvider:
    AccountRepositoryProvider + IncidentRepositoryProvider + AssetRepositoryProvider
{
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
