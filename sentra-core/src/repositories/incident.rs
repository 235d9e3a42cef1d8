use crate::{
    Error,
    incident::{Incident, IncidentId, IncidentStatus, NewIncident, Severity},
    repositories::{Page, Paginated},
};
use async_trait::async_trait;

/// Optional list filters. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub severity: Option<Severity>,
}

/// Repository for incident data access
#[async_trait]
pub trait IncidentRepository: Send + Sync + 'static {
    /// Create a new incident
    async fn create(&self, incident: NewIncident) -> Result<Incident, Error>;

    /// Find an incident by ID
    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<Incident>, Error>;

    /// List incidents matching the filter, newest first
    async fn list(&self, filter: &IncidentFilter, page: &Page)
    -> Result<Paginated<Incident>, Error>;

    /// Update an existing incident
    async fn update(&self, incident: &Incident) -> Result<Incident, Error>;

    /// Delete an incident by ID
    async fn delete(&self, id: &IncidentId) -> Result<(), Error>;
}
