use serde::{Deserialize, Serialize};
use sentra::incident::Severity;
use sentra::{
    Account, AccountId, AssetStatus, AssetType, IncidentCategory, IncidentStatus, Role,
};

/// Response envelope shared by every endpoint: a `success` flag, an optional
/// human-readable message, and an optional payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<Role>,
    pub department_id: Option<String>,
}

/// The `username` field accepts either a username or an email address.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthData {
    pub user: Account,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub user: Account,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncidentRequest {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: IncidentCategory,
    pub status: Option<IncidentStatus>,
    pub assignee_id: Option<AccountId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListIncidentsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<IncidentStatus>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetRequest {
    pub name: String,
    pub asset_type: AssetType,
    pub ip_address: Option<String>,
    pub location: String,
    pub criticality: Severity,
    pub status: Option<AssetStatus>,
    pub operating_system: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListAssetsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<AssetStatus>,
    pub asset_type: Option<AssetType>,
}
