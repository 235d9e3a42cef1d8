//! # Sentra
//!
//! Sentra is the backend of a security-incident and IT-asset tracking
//! application. Its center is the authentication and account-protection
//! core: credential verification, per-account failed-attempt tracking with
//! timed lockout, and stateless bearer-token sessions. Around that core sit
//! flat CRUD services for incidents and assets.
//!
//! [`Sentra`] is the high-level coordinator: it composes the services from
//! `sentra-core` over a pluggable [`RepositoryProvider`] and is what the
//! HTTP layer talks to.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sentra::{Sentra, TokenConfig};
//! use sentra_storage_sqlite::SqliteRepositoryProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let repositories = Arc::new(
//!         SqliteRepositoryProvider::connect("sqlite::memory:")
//!             .await
//!             .unwrap(),
//!     );
//!     repositories.migrate().await.unwrap();
//!
//!     let tokens = TokenConfig::new_hs256(b"change-me".to_vec());
//!     let sentra = Sentra::new(repositories, tokens);
//!     # let _ = sentra;
//! }
//! # use sentra::RepositoryProvider;
//! ```

use std::sync::Arc;

use sentra_core::{
    repositories::{
        AccountRepositoryAdapter, AssetRepositoryAdapter, IncidentRepositoryAdapter,
    },
    services::{AccountService, AssetService, AuthService, IncidentService},
};

/// Re-export core types from sentra_core
///
/// These types are commonly used when working with the Sentra API.
pub use sentra_core::{
    AccessToken, Account, AccountId, AccountStatus, Asset, AssetId, AssetStatus, AssetType, Error,
    Incident, IncidentCategory, IncidentId, IncidentStatus, LockoutPolicy, LockoutState,
    RepositoryProvider, Role, Severity, TokenClaims, TokenConfig, account, asset, error, incident,
    repositories, services, token,
};

pub use sentra_core::services::RegisterAccount;

/// Re-export storage backends
///
/// These storage implementations are available when the corresponding
/// feature is enabled.
#[cfg(feature = "sqlite")]
pub use sentra_storage_sqlite::SqliteRepositoryProvider;

use sentra_core::error::TokenError;

/// The central coordinator for authentication and record management.
///
/// `Sentra` wires the domain services to a repository provider and owns the
/// token and lockout configuration. Sessions are stateless JWTs, so the only
/// persistent state is the account/incident/asset records themselves.
pub struct Sentra<R: RepositoryProvider> {
    repositories: Arc<R>,
    tokens: TokenConfig,
    auth_service: Arc<AuthService<AccountRepositoryAdapter<R>>>,
    account_service: Arc<AccountService<AccountRepositoryAdapter<R>>>,
    incident_service: Arc<IncidentService<IncidentRepositoryAdapter<R>>>,
    asset_service: Arc<AssetService<AssetRepositoryAdapter<R>>>,
}

impl<R: RepositoryProvider> Sentra<R> {
    /// Create a new Sentra instance with the default lockout policy
    /// (5 failures, 2 hours).
    pub fn new(repositories: Arc<R>, tokens: TokenConfig) -> Self {
        Self::with_config(repositories, tokens, LockoutPolicy::default())
    }

    /// Create a new Sentra instance with an explicit lockout policy.
    pub fn with_config(
        repositories: Arc<R>,
        tokens: TokenConfig,
        lockout: LockoutPolicy,
    ) -> Self {
        let account_repo = Arc::new(AccountRepositoryAdapter::new(repositories.clone()));
        let incident_repo = Arc::new(IncidentRepositoryAdapter::new(repositories.clone()));
        let asset_repo = Arc::new(AssetRepositoryAdapter::new(repositories.clone()));

        let auth_service = Arc::new(
            AuthService::new(account_repo.clone(), tokens.clone()).with_lockout_policy(lockout),
        );
        let account_service = Arc::new(AccountService::new(account_repo));
        let incident_service = Arc::new(IncidentService::new(incident_repo));
        let asset_service = Arc::new(AssetService::new(asset_repo));

        Self {
            repositories,
            tokens,
            auth_service,
            account_service,
            incident_service,
            asset_service,
        }
    }

    /// The token configuration in effect.
    pub fn token_config(&self) -> &TokenConfig {
        &self.tokens
    }

    /// The authentication service.
    pub fn auth(&self) -> &AuthService<AccountRepositoryAdapter<R>> {
        &self.auth_service
    }

    /// The account lookup service.
    pub fn accounts(&self) -> &AccountService<AccountRepositoryAdapter<R>> {
        &self.account_service
    }

    /// The incident service.
    pub fn incidents(&self) -> &IncidentService<IncidentRepositoryAdapter<R>> {
        &self.incident_service
    }

    /// The asset service.
    pub fn assets(&self) -> &AssetService<AssetRepositoryAdapter<R>> {
        &self.asset_service
    }

    /// Register a new account and issue a token for it.
    pub async fn register(&self, request: RegisterAccount) -> Result<(Account, AccessToken), Error> {
        self.auth_service.register(request).await
    }

    /// Authenticate an (identifier, password) pair.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(Account, AccessToken), Error> {
        self.auth_service.login(identifier, password).await
    }

    /// Change the credential of an authenticated account.
    pub async fn change_password(
        &self,
        account_id: &AccountId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        self.auth_service
            .change_password(account_id, current_password, new_password)
            .await
    }

    /// Acknowledge a logout. Stateless: nothing is revoked server-side.
    pub async fn logout(&self) -> Result<(), Error> {
        self.auth_service.logout().await
    }

    /// Verify a bearer token and load the account it binds.
    pub async fn authenticate(&self, token: &AccessToken) -> Result<Account, Error> {
        let account_id = self.auth_service.verify_token(token)?;

        self.account_service
            .get_account(&account_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(account_id = %account_id, "Valid token for unknown account");
                TokenError::Invalid("Account no longer exists".to_string()).into()
            })
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        self.account_service.get_account(id).await
    }

    /// Run storage migrations.
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    /// Check that storage is reachable.
    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await
    }
}
