//! Monitored infrastructure assets
//!
//! Assets are flat records describing infrastructure under watch: servers,
//! workstations, network gear, and the like. Criticality reuses the incident
//! [`Severity`] scale.

use crate::{
    Error,
    account::AccountId,
    error::ValidationError,
    id::generate_prefixed_id,
    incident::Severity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: &str) -> Self {
        AssetId(id.to_string())
    }

    pub fn new_random() -> Self {
        AssetId(generate_prefixed_id("ast"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetType {
    Server,
    Workstation,
    NetworkDevice,
    MobileDevice,
    Database,
    Application,
    CloudService,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Server => "server",
            AssetType::Workstation => "workstation",
            AssetType::NetworkDevice => "network-device",
            AssetType::MobileDevice => "mobile-device",
            AssetType::Database => "database",
            AssetType::Application => "application",
            AssetType::CloudService => "cloud-service",
        }
    }
}

impl std::str::FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(AssetType::Server),
            "workstation" => Ok(AssetType::Workstation),
            "network-device" => Ok(AssetType::NetworkDevice),
            "mobile-device" => Ok(AssetType::MobileDevice),
            "database" => Ok(AssetType::Database),
            "application" => Ok(AssetType::Application),
            "cloud-service" => Ok(AssetType::CloudService),
            other => {
                Err(ValidationError::InvalidField(format!("Unknown asset type: {other}")).into())
            }
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Active,
    Inactive,
    Maintenance,
    Compromised,
    Decommissioned,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "active",
            AssetStatus::Inactive => "inactive",
            AssetStatus::Maintenance => "maintenance",
            AssetStatus::Compromised => "compromised",
            AssetStatus::Decommissioned => "decommissioned",
        }
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AssetStatus::Active),
            "inactive" => Ok(AssetStatus::Inactive),
            "maintenance" => Ok(AssetStatus::Maintenance),
            "compromised" => Ok(AssetStatus::Compromised),
            "decommissioned" => Ok(AssetStatus::Decommissioned),
            other => {
                Err(ValidationError::InvalidField(format!("Unknown asset status: {other}")).into())
            }
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub asset_type: AssetType,
    pub ip_address: Option<String>,
    pub location: String,
    /// The account responsible for this asset.
    pub owner_id: AccountId,
    pub status: AssetStatus,
    pub criticality: Severity,
    pub operating_system: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for asset creation.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub id: AssetId,
    pub name: String,
    pub asset_type: AssetType,
    pub ip_address: Option<String>,
    pub location: String,
    pub owner_id: AccountId,
    pub status: AssetStatus,
    pub criticality: Severity,
    pub operating_system: Option<String>,
}

impl NewAsset {
    pub fn builder() -> NewAssetBuilder {
        NewAssetBuilder::default()
    }
}

#[derive(Default)]
pub struct NewAssetBuilder {
    id: Option<AssetId>,
    name: Option<String>,
    asset_type: Option<AssetType>,
    ip_address: Option<String>,
    location: Option<String>,
    owner_id: Option<AccountId>,
    status: Option<AssetStatus>,
    criticality: Option<Severity>,
    operating_system: Option<String>,
}

impl NewAssetBuilder {
    pub fn id(mut self, id: AssetId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = Some(asset_type);
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn owner_id(mut self, owner_id: AccountId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn status(mut self, status: AssetStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn criticality(mut self, criticality: Severity) -> Self {
        self.criticality = Some(criticality);
        self
    }

    pub fn operating_system(mut self, operating_system: Option<String>) -> Self {
        self.operating_system = operating_system;
        self
    }

    pub fn build(self) -> Result<NewAsset, Error> {
        Ok(NewAsset {
            id: self.id.unwrap_or_default(),
            name: self.name.ok_or(ValidationError::MissingField(
                "Asset name is required".to_string(),
            ))?,
            asset_type: self.asset_type.ok_or(ValidationError::MissingField(
                "Asset type is required".to_string(),
            ))?,
            ip_address: self.ip_address,
            location: self.location.ok_or(ValidationError::MissingField(
                "Location is required".to_string(),
            ))?,
            owner_id: self.owner_id.ok_or(ValidationError::MissingField(
                "Owner is required".to_string(),
            ))?,
            status: self.status.unwrap_or(AssetStatus::Active),
            criticality: self.criticality.ok_or(ValidationError::MissingField(
                "Criticality is required".to_string(),
            ))?,
            operating_system: self.operating_system,
        })
    }
}

/// Partial update for an asset. Fields left as `None` are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetUpdate {
    pub name: Option<String>,
    pub asset_type: Option<AssetType>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub owner_id: Option<AccountId>,
    pub status: Option<AssetStatus>,
    pub criticality: Option<Severity>,
    pub operating_system: Option<String>,
}
