//! SQLite implementation of the incident repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sentra_core::{
    Error,
    account::AccountId,
    error::StorageError,
    incident::{Incident, IncidentId, NewIncident},
    repositories::{IncidentFilter, IncidentRepository, Page, Paginated},
};

const INCIDENT_COLUMNS: &str = "id, title, description, severity, status, category, reporter_id, \
     assignee_id, resolved_at, closed_at, resolution_notes, created_at, updated_at";

pub struct SqliteIncidentRepository {
    pool: SqlitePool,
}

impl SqliteIncidentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SqliteIncident {
    id: String,
    title: String,
    description: String,
    severity: String,
    status: String,
    category: String,
    reporter_id: String,
    assignee_id: Option<String>,
    resolved_at: Option<i64>,
    closed_at: Option<i64>,
    resolution_notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteIncident> for Incident {
    type Error = Error;

    fn try_from(row: SqliteIncident) -> Result<Self, Error> {
        Ok(Incident {
            id: IncidentId::new(&row.id),
            title: row.title,
            description: row.description,
            severity: row.severity.parse()?,
            status: row.status.parse()?,
            category: row.category.parse()?,
            reporter_id: AccountId::new(&row.reporter_id),
            assignee_id: row.assignee_id.map(|id| AccountId::new(&id)),
            resolved_at: row.resolved_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            closed_at: row.closed_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            resolution_notes: row.resolution_notes,
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
impl IncidentRepository for SqliteIncidentRepository {
    async fn create(&self, incident: NewIncident) -> Result<Incident, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteIncident>(&format!(
            r#"
            INSERT INTO incidents (id, title, description, severity, status, category,
                                   reporter_id, assignee_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING {INCIDENT_COLUMNS}
            "#
        ))
        .bind(incident.id.as_str())
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.severity.as_str())
        .bind(incident.status.as_str())
        .bind(incident.category.as_str())
        .bind(incident.reporter_id.as_str())
        .bind(incident.assignee_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error(e, "create incident"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<Incident>, Error> {
        let row = sqlx::query_as::<_, SqliteIncident>(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error(e, "find incident"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(
        &self,
        filter: &IncidentFilter,
        page: &Page,
    ) -> Result<Paginated<Incident>, Error> {
        let status = filter.status.map(|s| s.as_str().to_string());
        let severity = filter.severity.map(|s| s.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM incidents
            WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR severity = ?2)
            "#,
        )
        .bind(&status)
        .bind(&severity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error(e, "count incidents"))?;

        let rows = sqlx::query_as::<_, SqliteIncident>(&format!(
            r#"
            SELECT {INCIDENT_COLUMNS} FROM incidents
            WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR severity = ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT ?3 OFFSET ?4
            "#
        ))
        .bind(&status)
        .bind(&severity)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error(e, "list incidents"))?;

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

    async fn update(&self, incident: &Incident) -> Result<Incident, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteIncident>(&format!(
            r#"
            UPDATE incidents
            SET title = ?2, description = ?3, severity = ?4, status = ?5, category = ?6,
                assignee_id = ?7, resolved_at = ?8, closed_at = ?9, resolution_notes = ?10,
                updated_at = ?11
            WHERE id = ?1
            RETURNING {INCIDENT_COLUMNS}
            "#
        ))
        .bind(incident.id.as_str())
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.severity.as_str())
        .bind(incident.status.as_str())
        .bind(incident.category.as_str())
        .bind(incident.assignee_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(incident.resolved_at.map(|dt| dt.timestamp()))
        .bind(incident.closed_at.map(|dt| dt.timestamp()))
        .bind(&incident.resolution_notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => Error::Storage(StorageError::NotFound),
            e => database_error(e, "update incident"),
        })?;

        row.try_into()
    }

    async fn delete(&self, id: &IncidentId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error(e, "delete incident"))?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(StorageError::NotFound));
        }

        Ok(())
    }
}
