//! Repository trait for account data access.

use crate::{
    Error,
    account::{Account, AccountId, LockoutPolicy, LockoutState, NewAccount},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for account data access.
///
/// The credential hash lives on the account record but is write-only: it is
/// never part of [`Account`] and is only reachable through the dedicated
/// hash accessors here.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Create a new account.
    ///
    /// A collision on username, email, or public id must surface as
    /// `StorageError::Constraint`.
    async fn create(&self, account: NewAccount) -> Result<Account, Error>;

    /// Find an account by internal ID.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, Error>;

    /// Find an account by login identifier: matches the username
    /// case-sensitively OR the email case-insensitively (emails are stored
    /// lower-case).
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, Error>;

    /// Update an existing account's profile fields.
    async fn update(&self, account: &Account) -> Result<Account, Error>;

    /// Fetch the stored credential hash.
    async fn get_password_hash(&self, id: &AccountId) -> Result<Option<String>, Error>;

    /// Overwrite the stored credential hash.
    async fn set_password_hash(&self, id: &AccountId, hash: &str) -> Result<(), Error>;

    /// Record a verified-wrong-password event as a single atomic update:
    ///
    /// - if a lock is present but expired, clear it and reset the counter
    ///   to 1 (this failure opens a fresh window);
    /// - otherwise increment the counter, and set
    ///   `locked_until = now + policy.lock_duration` when the new count
    ///   reaches `policy.max_failed_attempts` and no lock is set.
    ///
    /// Implementations MUST make the read-compute-write cycle atomic so
    /// concurrent failures cannot under-count.
    async fn record_failed_attempt(
        &self,
        id: &AccountId,
        policy: &LockoutPolicy,
    ) -> Result<LockoutState, Error>;

    /// Reset the protection state after a successful login: counter to 0,
    /// lock cleared, `last_login_at` stamped.
    async fn clear_lockout(
        &self,
        id: &AccountId,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), Error>;
}
