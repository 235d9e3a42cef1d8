//! Account model and account-protection state
//!
//! Accounts are the stored identities the authentication core operates on.
//! The credential (password hash) is intentionally not part of [`Account`];
//! it is write-only through the repository layer and never serialized.
//!
//! Lock state is derived: an account is locked while `locked_until` is
//! strictly in the future. There is no separate boolean.

use crate::{
    Error,
    error::ValidationError,
    id::{generate_prefixed_id, validate_prefixed_id},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a specific account.
///
/// This value should be treated as opaque. Bearer tokens bind this
/// identifier, not the public id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: &str) -> Self {
        AccountId(id.to_string())
    }

    pub fn new_random() -> Self {
        AccountId(generate_prefixed_id("acct"))
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this ID has the correct format for an account ID
    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, "acct")
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role. The core never interprets roles itself; they are
/// carried for the HTTP layer and consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Analyst,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Analyst => "analyst",
            Role::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "analyst" => Ok(Role::Analyst),
            "viewer" => Ok(Role::Viewer),
            other => Err(ValidationError::InvalidField(format!("Unknown role: {other}")).into()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status. Anything other than `Active` fails login with
/// `AccountInactive` once the password has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "suspended" => Ok(AccountStatus::Suspended),
            other => {
                Err(ValidationError::InvalidField(format!("Unknown status: {other}")).into())
            }
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representation of a stored account, sans credential.
///
/// `failed_attempts` and `locked_until` are bookkeeping for the lockout
/// state machine and are never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The internal identifier. Bearer tokens bind this value.
    pub id: AccountId,

    /// The externally visible user-id string (`usr_` prefixed).
    pub public_id: String,

    /// Unique username, matched case-sensitively at login.
    pub username: String,

    /// Unique email, stored lower-case and matched case-insensitively.
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    pub role: Role,

    /// Opaque reference to a department record; not interpreted by the core.
    pub department_id: Option<String>,

    pub status: AccountStatus,

    /// Set on every successful login.
    pub last_login_at: Option<DateTime<Utc>>,

    /// Consecutive wrong-password events since the last successful login or
    /// lock-window reset.
    #[serde(skip_serializing, default)]
    pub failed_attempts: u32,

    /// While set and in the future, login is refused regardless of password
    /// correctness.
    #[serde(skip_serializing, default)]
    pub locked_until: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the account is locked at `now`. A `locked_until` at or before
    /// `now` counts as expired.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Lockout policy applied by the authentication service.
///
/// Defaults match the production policy: lock after 5 consecutive failures
/// for 2 hours.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// Number of consecutive failures that triggers a lock.
    pub max_failed_attempts: u32,

    /// How long a triggered lock lasts.
    pub lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lock_duration: Duration::hours(2),
        }
    }
}

/// The lockout bookkeeping of an account after a recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutState {
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl LockoutState {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

/// Input for account creation. The password hash is computed by the caller
/// (the auth service) before this struct exists; plaintext never reaches the
/// repository layer.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub public_id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department_id: Option<String>,
    pub status: AccountStatus,
}

impl NewAccount {
    pub fn builder() -> NewAccountBuilder {
        NewAccountBuilder::default()
    }
}

#[derive(Default)]
pub struct NewAccountBuilder {
    id: Option<AccountId>,
    public_id: Option<String>,
    username: Option<String>,
    email: Option<String>,
    password_hash: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    role: Option<Role>,
    department_id: Option<String>,
    status: Option<AccountStatus>,
}

impl NewAccountBuilder {
    pub fn id(mut self, id: AccountId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn public_id(mut self, public_id: String) -> Self {
        self.public_id = Some(public_id);
        self
    }

    pub fn username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    pub fn email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    pub fn password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    pub fn first_name(mut self, first_name: String) -> Self {
        self.first_name = Some(first_name);
        self
    }

    pub fn last_name(mut self, last_name: String) -> Self {
        self.last_name = Some(last_name);
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn department_id(mut self, department_id: Option<String>) -> Self {
        self.department_id = department_id;
        self
    }

    pub fn status(mut self, status: AccountStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Result<NewAccount, Error> {
        Ok(NewAccount {
            id: self.id.unwrap_or_default(),
            public_id: self
                .public_id
                .unwrap_or_else(|| generate_prefixed_id("usr")),
            username: self.username.ok_or(ValidationError::MissingField(
                "Username is required".to_string(),
            ))?,
            email: self.email.ok_or(ValidationError::MissingField(
                "Email is required".to_string(),
            ))?,
            password_hash: self.password_hash.ok_or(ValidationError::MissingField(
                "Password hash is required".to_string(),
            ))?,
            first_name: self.first_name.ok_or(ValidationError::MissingField(
                "First name is required".to_string(),
            ))?,
            last_name: self.last_name.ok_or(ValidationError::MissingField(
                "Last name is required".to_string(),
            ))?,
            role: self.role.unwrap_or(Role::Analyst),
            department_id: self.department_id,
            status: self.status.unwrap_or(AccountStatus::Active),
        })
    }
}
