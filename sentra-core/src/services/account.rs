use crate::{
    Error,
    account::{Account, AccountId},
    repositories::AccountRepository,
};
use std::sync::Arc;

/// Service for account lookup operations
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> AccountService<R> {
    /// Create a new AccountService with the given repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get an account by ID
    pub async fn get_account(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        self.repository.find_by_id(id).await
    }

    /// Get an account by username or email
    pub async fn get_account_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, Error> {
        self.repository.find_by_identifier(identifier).await
    }

    /// Update an account's profile fields
    pub async fn update_account(&self, account: &Account) -> Result<Account, Error> {
        self.repository.update(account).await
    }
}
