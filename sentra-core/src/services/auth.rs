//! Authentication and account-protection service
//!
//! Implements the credential verification and lockout state machine:
//!
//! 1. both fields are required, checked before any lookup
//! 2. lookup by username (case-sensitive) or email (case-insensitive);
//!    an unknown identifier is indistinguishable from a wrong password
//! 3. a live lock rejects the attempt before any hash work happens
//! 4. a wrong password is recorded through one atomic repository update;
//!    the 5th consecutive failure locks the account for 2 hours, and a
//!    failure after the lock expired restarts the count at 1
//! 5. a correct password on a non-active account is rejected without
//!    touching the counters
//! 6. a successful login unconditionally clears the counters, stamps
//!    `last_login_at`, and issues a bearer token

use crate::{
    Error,
    account::{Account, AccountId, LockoutPolicy, NewAccount, Role},
    error::{AuthError, StorageError},
    repositories::AccountRepository,
    token::{AccessToken, TokenConfig},
    validation::{validate_email, validate_name, validate_password, validate_username},
};
use chrono::Utc;
use std::sync::Arc;

/// Registration input. Role defaults to `analyst` when not supplied.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<Role>,
    pub department_id: Option<String>,
}

/// Service for credential verification, lockout enforcement, and token
/// issuance.
pub struct AuthService<R: AccountRepository> {
    accounts: Arc<R>,
    tokens: TokenConfig,
    lockout: LockoutPolicy,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(accounts: Arc<R>, tokens: TokenConfig) -> Self {
        Self {
            accounts,
            tokens,
            lockout: LockoutPolicy::default(),
        }
    }

    /// Override the default lockout policy (5 failures, 2 hours).
    pub fn with_lockout_policy(mut self, lockout: LockoutPolicy) -> Self {
        self.lockout = lockout;
        self
    }

    pub fn lockout_policy(&self) -> &LockoutPolicy {
        &self.lockout
    }

    /// Register a new account and issue a token for it (auto-login).
    ///
    /// A username/email collision surfaces as `DuplicateIdentity`.
    pub async fn register(
        &self,
        request: RegisterAccount,
    ) -> Result<(Account, AccessToken), Error> {
        validate_username(&request.username)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        validate_name("First name", &request.first_name)?;
        validate_name("Last name", &request.last_name)?;

        let password_hash = hash_password(&request.password);

        let new_account = NewAccount::builder()
            .username(request.username)
            .email(request.email.to_lowercase())
            .password_hash(password_hash)
            .first_name(request.first_name)
            .last_name(request.last_name)
            .role(request.role.unwrap_or(Role::Analyst))
            .department_id(request.department_id)
            .build()?;

        let account = match self.accounts.create(new_account).await {
            Ok(account) => account,
            Err(Error::Storage(StorageError::Constraint(_))) => {
                return Err(AuthError::DuplicateIdentity.into());
            }
            Err(e) => return Err(e),
        };

        tracing::info!(account_id = %account.id, username = %account.username, "Account registered");

        let token = AccessToken::issue(&account.id, &self.tokens)?;

        Ok((account, token))
    }

    /// Authenticate an (identifier, password) pair and issue a bearer token.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(Account, AccessToken), Error> {
        if identifier.trim().is_empty() {
            return Err(crate::error::ValidationError::MissingField(
                "Username or email is required".to_string(),
            )
            .into());
        }
        if password.is_empty() {
            return Err(crate::error::ValidationError::MissingField(
                "Password is required".to_string(),
            )
            .into());
        }

        let mut account = self
            .accounts
            .find_by_identifier(identifier)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        let now = Utc::now();

        // A live lock short-circuits before any hash work, so the lockout
        // duration stays exact and no verification attempt is consumed.
        if account.is_locked(now) {
            tracing::debug!(account_id = %account.id, "Login rejected: account locked");
            return Err(AuthError::AccountLocked.into());
        }

        let password_hash = self
            .accounts
            .get_password_hash(&account.id)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        if !verify_password_hash(password, &password_hash) {
            let state = self
                .accounts
                .record_failed_attempt(&account.id, &self.lockout)
                .await?;

            if state.is_locked(now) {
                tracing::warn!(
                    account_id = %account.id,
                    failed_attempts = state.failed_attempts,
                    "Account locked after repeated failed logins"
                );
            } else {
                tracing::debug!(
                    account_id = %account.id,
                    failed_attempts = state.failed_attempts,
                    "Login rejected: wrong password"
                );
            }

            return Err(AuthError::InvalidCredentials.into());
        }

        // Only revealed once the password is known to be correct, and the
        // attempt neither increments nor resets the counter.
        if !account.is_active() {
            tracing::debug!(account_id = %account.id, status = %account.status, "Login rejected: account not active");
            return Err(AuthError::AccountInactive.into());
        }

        self.accounts.clear_lockout(&account.id, now).await?;

        account.failed_attempts = 0;
        account.locked_until = None;
        account.last_login_at = Some(now);

        let token = AccessToken::issue(&account.id, &self.tokens)?;

        tracing::info!(account_id = %account.id, "Login successful");

        Ok((account, token))
    }

    /// Replace the credential of an already-authenticated account.
    ///
    /// This path is only reachable with a valid bearer token, so the lockout
    /// counters are neither consulted nor mutated here.
    pub async fn change_password(
        &self,
        account_id: &AccountId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        if current_password.is_empty() {
            return Err(crate::error::ValidationError::MissingField(
                "Current password is required".to_string(),
            )
            .into());
        }
        if new_password.is_empty() {
            return Err(crate::error::ValidationError::MissingField(
                "New password is required".to_string(),
            )
            .into());
        }

        let current_hash = self
            .accounts
            .get_password_hash(account_id)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        if !verify_password_hash(current_password, &current_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        validate_password(new_password)?;

        let new_hash = hash_password(new_password);
        self.accounts.set_password_hash(account_id, &new_hash).await?;

        tracing::info!(account_id = %account_id, "Password changed");

        Ok(())
    }

    /// Acknowledge a logout.
    ///
    /// Tokens are stateless, so there is nothing to revoke server-side: the
    /// client discards its copy and the token stays technically valid until
    /// its expiry. Known limitation of the stateless scheme.
    pub async fn logout(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Verify a bearer token and return the account id it binds.
    pub fn verify_token(&self, token: &AccessToken) -> Result<AccountId, Error> {
        let claims = token.verify(&self.tokens)?;
        Ok(claims.account_id())
    }
}

/// Hash a password with argon2. Parameters are embedded in the resulting
/// hash string, so later verification is independent of the current cost
/// configuration.
fn hash_password(password: &str) -> String {
    use password_auth::generate_hash;
    generate_hash(password)
}

/// Verify a password against a stored hash using the hash's own embedded
/// parameters.
fn verify_password_hash(password: &str, hash: &str) -> bool {
    use password_auth::verify_password;
    verify_password(password, hash).is_ok()
}
