use crate::{
    Error,
    asset::{Asset, AssetId, AssetStatus, AssetType, NewAsset},
    repositories::{Page, Paginated},
};
use async_trait::async_trait;

/// Optional list filters. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    pub asset_type: Option<AssetType>,
}

/// Repository for asset data access
#[async_trait]
pub trait AssetRepository: Send + Sync + 'static {
    /// Create a new asset
    async fn create(&self, asset: NewAsset) -> Result<Asset, Error>;

    /// Find an asset by ID
    async fn find_by_id(&self, id: &AssetId) -> Result<Option<Asset>, Error>;

    /// List assets matching the filter, newest first
    async fn list(&self, filter: &AssetFilter, page: &Page) -> Result<Paginated<Asset>, Error>;

    /// Update an existing asset
    async fn update(&self, asset: &Asset) -> Result<Asset, Error>;

    /// Delete an asset by ID
    async fn delete(&self, id: &AssetId) -> Result<(), Error>;
}
