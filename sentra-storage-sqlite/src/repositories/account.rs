//! SQLite implementation of the account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sentra_core::{
    Error,
    account::{Account, AccountId, LockoutPolicy, LockoutState, NewAccount},
    error::StorageError,
    repositories::AccountRepository,
};

const ACCOUNT_COLUMNS: &str = "id, public_id, username, email, first_name, last_name, role, \
     department_id, status, last_login_at, failed_attempts, locked_until, created_at, updated_at";

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal struct for query results. The password hash is deliberately not
/// part of this projection; it travels only through the dedicated hash
/// accessors.
#[derive(Debug, sqlx::FromRow)]
struct SqliteAccount {
    id: String,
    public_id: String,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    department_id: Option<String>,
    status: String,
    last_login_at: Option<i64>,
    failed_attempts: i64,
    locked_until: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteAccount> for Account {
    type Error = Error;

    fn try_from(row: SqliteAccount) -> Result<Self, Error> {
        Ok(Account {
            id: AccountId::new(&row.id),
            public_id: row.public_id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role.parse()?,
            department_id: row.department_id,
            status: row.status.parse()?,
            last_login_at: row.last_login_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            failed_attempts: row.failed_attempts.max(0) as u32,
            locked_until: row.locked_until.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            created_at: timestamp(row.created_at)?,
            updated_at: timestamp(row.updated_at)?,
        })
    }
}

fn timestamp(ts: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| Error::Storage(StorageError::Database(format!("Invalid timestamp: {ts}"))))
}

fn map_insert_error(e: sqlx::Error, what: &str) -> Error {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        Error::Storage(StorageError::Constraint(e.to_string()))
    } else {
        tracing::error!(error = %e, "Failed to {what}");
        Error::Storage(StorageError::Database(e.to_string()))
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            r#"
            INSERT INTO accounts (id, public_id, username, email, password_hash, first_name,
                                  last_name, role, department_id, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id.as_str())
        .bind(&account.public_id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.role.as_str())
        .bind(&account.department_id)
        .bind(account.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "create account"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to find account by id");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, Error> {
        // Username matches case-sensitively; email matches the lower-cased
        // input because emails are stored lower-case.
        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = ?1 OR email = ?2"
        ))
        .bind(identifier)
        .bind(identifier.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to find account by identifier");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, account: &Account) -> Result<Account, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAccount>(&format!(
            r#"
            UPDATE accounts
            SET username = ?2, email = ?3, first_name = ?4, last_name = ?5,
                role = ?6, department_id = ?7, status = ?8, updated_at = ?9
            WHERE id = ?1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id.as_str())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.role.as_str())
        .bind(&account.department_id)
        .bind(account.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => Error::Storage(StorageError::NotFound),
            e => map_insert_error(e, "update account"),
        })?;

        row.try_into()
    }

    async fn get_password_hash(&self, id: &AccountId) -> Result<Option<String>, Error> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM accounts WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to get password hash");
                    Error::Storage(StorageError::Database(e.to_string()))
                })?;

        Ok(hash)
    }

    async fn set_password_hash(&self, id: &AccountId, hash: &str) -> Result<(), Error> {
        let now = Utc::now().timestamp();

        let result = sqlx::query(
            "UPDATE accounts SET password_hash = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id.as_str())
        .bind(hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to set password hash");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(StorageError::NotFound));
        }

        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        id: &AccountId,
        policy: &LockoutPolicy,
    ) -> Result<LockoutState, Error> {
        let now = Utc::now();
        let now_ts = now.timestamp();
        let lock_expiry_ts = (now + policy.lock_duration).timestamp();

        // One conditional update, evaluated against the pre-update column
        // values (SQLite applies all SET expressions simultaneously):
        //   - expired lock present -> clear it, counter restarts at 1
        //   - otherwise increment; set the lock when the new count reaches
        //     the threshold and no lock is set yet
        // Being a single statement, concurrent failures cannot interleave a
        // read-then-write and under-count.
        let row: Option<(i64, Option<i64>)> = sqlx::query_as(
            r#"
            UPDATE accounts
            SET failed_attempts = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= ?2 THEN 1
                    ELSE failed_attempts + 1
                END,
                locked_until = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= ?2 THEN NULL
                    WHEN locked_until IS NULL AND failed_attempts + 1 >= ?3 THEN ?4
                    ELSE locked_until
                END,
                updated_at = ?2
            WHERE id = ?1
            RETURNING failed_attempts, locked_until
            "#,
        )
        .bind(id.as_str())
        .bind(now_ts)
        .bind(policy.max_failed_attempts as i64)
        .bind(lock_expiry_ts)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to record failed login attempt");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        let (failed_attempts, locked_until) = row.ok_or(Error::Storage(StorageError::NotFound))?;

        Ok(LockoutState {
            failed_attempts: failed_attempts.max(0) as u32,
            locked_until: locked_until.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    async fn clear_lockout(
        &self,
        id: &AccountId,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET failed_attempts = 0, locked_until = NULL, last_login_at = ?2, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .bind(last_login_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to clear lockout state");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(StorageError::NotFound));
        }

        Ok(())
    }
}
