//! Adapters that wrap a [`RepositoryProvider`] and implement the individual
//! repository traits, so services can be generic over one repository type
//! while the application wires everything through a single provider.

use crate::{
    Error,
    account::{Account, AccountId, LockoutPolicy, LockoutState, NewAccount},
    asset::{Asset, AssetId, NewAsset},
    incident::{Incident, IncidentId, NewIncident},
    repositories::{
        AccountRepository, AssetFilter, AssetRepository, IncidentFilter, IncidentRepository, Page,
        Paginated, RepositoryProvider,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct AccountRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AccountRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AccountRepository for AccountRepositoryAdapter<R> {
    async fn create(&self, account: NewAccount) -> Result<Account, Error> {
        self.provider.accounts().create(account).await
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, Error> {
        self.provider.accounts().find_by_id(id).await
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, Error> {
        self.provider.accounts().find_by_identifier(identifier).await
    }

    async fn update(&self, account: &Account) -> Result<Account, Error> {
        self.provider.accounts().update(account).await
    }

    async fn get_password_hash(&self, id: &AccountId) -> Result<Option<String>, Error> {
        self.provider.accounts().get_password_hash(id).await
    }

    async fn set_password_hash(&self, id: &AccountId, hash: &str) -> Result<(), Error> {
        self.provider.accounts().set_password_hash(id, hash).await
    }

    async fn record_failed_attempt(
        &self,
        id: &AccountId,
        policy: &LockoutPolicy,
    ) -> Result<LockoutState, Error> {
        self.provider
            .accounts()
            .record_failed_attempt(id, policy)
            .await
    }

    async fn clear_lockout(
        &self,
        id: &AccountId,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.provider.accounts().clear_lockout(id, last_login_at).await
    }
}

pub struct IncidentRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> IncidentRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> IncidentRepository for IncidentRepositoryAdapter<R> {
    async fn create(&self, incident: NewIncident) -> Result<Incident, Error> {
        self.provider.incidents().create(incident).await
    }

    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<Incident>, Error> {
        self.provider.incidents().find_by_id(id).await
    }

    async fn list(
        &self,
        filter: &IncidentFilter,
        page: &Page,
    ) -> Result<Paginated<Incident>, Error> {
        self.provider.incidents().list(filter, page).await
    }

    async fn update(&self, incident: &Incident) -> Result<Incident, Error> {
        self.provider.incidents().update(incident).await
    }

    async fn delete(&self, id: &IncidentId) -> Result<(), Error> {
        self.provider.incidents().delete(id).await
    }
}

pub struct AssetRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AssetRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AssetRepository for AssetRepositoryAdapter<R> {
    async fn create(&self, asset: NewAsset) -> Result<Asset, Error> {
        self.provider.assets().create(asset).await
    }

    async fn find_by_id(&self, id: &AssetId) -> Result<Option<Asset>, Error> {
        self.provider.assets().find_by_id(id).await
    }

    async fn list(&self, filter: &AssetFilter, page: &Page) -> Result<Paginated<Asset>, Error> {
        self.provider.assets().list(filter, page).await
    }

    async fn update(&self, asset: &Asset) -> Result<Asset, Error> {
        self.provider.assets().update(asset).await
    }

    async fn delete(&self, id: &AssetId) -> Result<(), Error> {
        self.provider.assets().delete(id).await
    }
}
