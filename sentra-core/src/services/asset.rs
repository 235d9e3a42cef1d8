use crate::{
    Error,
    asset::{Asset, AssetId, AssetUpdate, NewAsset},
    repositories::{AssetFilter, AssetRepository, Page, Paginated},
};
use std::sync::Arc;

/// Service for asset management operations
pub struct AssetService<R: AssetRepository> {
    repository: Arc<R>,
}

impl<R: AssetRepository> AssetService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn register_asset(&self, asset: NewAsset) -> Result<Asset, Error> {
        let asset = self.repository.create(asset).await?;
        tracing::info!(asset_id = %asset.id, asset_type = %asset.asset_type, "Asset registered");
        Ok(asset)
    }

    pub async fn get(&self, id: &AssetId) -> Result<Option<Asset>, Error> {
        self.repository.find_by_id(id).await
    }

    pub async fn list(&self, filter: &AssetFilter, page: &Page) -> Result<Paginated<Asset>, Error> {
        self.repository.list(filter, &page.normalized()).await
    }

    /// Apply a partial update.
    pub async fn update(&self, id: &AssetId, update: AssetUpdate) -> Result<Option<Asset>, Error> {
        let Some(mut asset) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            asset.name = name;
        }
        if let Some(asset_type) = update.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(ip_address) = update.ip_address {
            asset.ip_address = Some(ip_address);
        }
        if let Some(location) = update.location {
            asset.location = location;
        }
        if let Some(owner_id) = update.owner_id {
            asset.owner_id = owner_id;
        }
        if let Some(status) = update.status {
            asset.status = status;
        }
        if let Some(criticality) = update.criticality {
            asset.criticality = criticality;
        }
        if let Some(operating_system) = update.operating_system {
            asset.operating_system = Some(operating_system);
        }

        let asset = self.repository.update(&asset).await?;
        Ok(Some(asset))
    }

    pub async fn delete(&self, id: &AssetId) -> Result<(), Error> {
        self.repository.delete(id).await?;
        tracing::info!(asset_id = %id, "Asset deleted");
        Ok(())
    }
}
