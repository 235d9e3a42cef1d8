//! SQLite implementation of the asset repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sentra_core::{
    Error,
    account::AccountId,
    asset::{Asset, AssetId, NewAsset},
    error::StorageError,
    repositories::{AssetFilter, AssetRepository, Page, Paginated},
};

const ASSET_COLUMNS: &str = "id, name, asset_type, ip_address, location, owner_id, status, \
     criticality, operating_system, created_at, updated_at";

pub struct SqliteAssetRepository {
    pool: SqlitePool,
}

impl SqliteAssetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteAsset {
    id: String,
    name: String,
    asset_type: String,
    ip_address: Option<String>,
    location: String,
    owner_id: String,
    status: String,
    criticality: String,
    operating_system: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteAsset> for Asset {
    type Error = Error;

    fn try_from(row: SqliteAsset) -> Result<Self, Error> {
        Ok(Asset {
            id: AssetId::new(&row.id),
            name: row.name,
            asset_type: row.asset_type.parse()?,
            ip_address: row.ip_address,
            location: row.location,
            owner_id: AccountId::new(&row.owner_id),
            status: row.status.parse()?,
            criticality: row.criticality.parse()?,
            operating_system: row.operating_system,
            created_at: timestamp(row.created_at)?,
            updated_at: timestamp(row.updated_at)?,
        })
    }
}

fn timestamp(ts: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| Error::Storage(StorageError::Database(format!("Invalid timestamp: {ts}"))))
}

fn database_error(e: sqlx::Error, what: &str) -> Error {
    tracing::error!(error = %e, "Failed to {what}");
    Error::Storage(StorageError::Database(e.to_string()))
}

#[async_trait]
impl AssetRepository for SqliteAssetRepository {
    async fn create(&self, asset: NewAsset) -> Result<Asset, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAsset>(&format!(
            r#"
            INSERT INTO assets (id, name, asset_type, ip_address, location, owner_id,
                                status, criticality, operating_system, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(asset.id.as_str())
        .bind(&asset.name)
        .bind(asset.asset_type.as_str())
        .bind(&asset.ip_address)
        .bind(&asset.location)
        .bind(asset.owner_id.as_str())
        .bind(asset.status.as_str())
        .bind(asset.criticality.as_str())
        .bind(&asset.operating_system)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error(e, "create asset"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &AssetId) -> Result<Option<Asset>, Error> {
        let row = sqlx::query_as::<_, SqliteAsset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error(e, "find asset"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &AssetFilter, page: &Page) -> Result<Paginated<Asset>, Error> {
        let status = filter.status.map(|s| s.as_str().to_string());
        let asset_type = filter.asset_type.map(|t| t.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM assets
            WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR asset_type = ?2)
            "#,
        )
        .bind(&status)
        .bind(&asset_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error(e, "count assets"))?;

        let rows = sqlx::query_as::<_, SqliteAsset>(&format!(
            r#"
            SELECT {ASSET_COLUMNS} FROM assets
            WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR asset_type = ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(&status)
        .bind(&asset_type)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error(e, "list assets"))?;

        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total: total.max(0) as u64,
            page: page.page,
            per_page: page.per_page,
        })
    }

    async fn update(&self, asset: &Asset) -> Result<Asset, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteAsset>(&format!(
            r#"
            UPDATE assets
            SET name = ?2, asset_type = ?3, ip_address = ?4, location = ?5, owner_id = ?6,
                status = ?7, criticality = ?8, operating_system = ?9, updated_at = ?10
            WHERE id = ?1
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(asset.id.as_str())
        .bind(&asset.name)
        .bind(asset.asset_type.as_str())
        .bind(&asset.ip_address)
        .bind(&asset.location)
        .bind(asset.owner_id.as_str())
        .bind(asset.status.as_str())
        .bind(asset.criticality.as_str())
        .bind(&asset.operating_system)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => Error::Storage(StorageError::NotFound),
            e => database_error(e, "update asset"),
        })?;

        row.try_into()
    }

    async fn delete(&self, id: &AssetId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error(e, "delete asset"))?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(StorageError::NotFound));
        }

        Ok(())
    }
}
