//! Incident workflow service
//!
//! Owns the status-transition bookkeeping: entering `resolved` stamps
//! `resolved_at` (once), entering `closed` stamps `closed_at` (once), and
//! moving back to an open-ish status clears both.

use crate::{
    Error,
    account::AccountId,
    incident::{Incident, IncidentId, IncidentStatus, IncidentUpdate, NewIncident},
    repositories::{IncidentFilter, IncidentRepository, Page, Paginated},
};
use chrono::Utc;
use std::sync::Arc;

pub struct IncidentService<R: IncidentRepository> {
    repository: Arc<R>,
}

impl<R: IncidentRepository> IncidentService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Report a new incident on behalf of `reporter_id`.
    pub async fn report(
        &self,
        reporter_id: &AccountId,
        incident: NewIncident,
    ) -> Result<Incident, Error> {
        let incident = NewIncident {
            reporter_id: reporter_id.clone(),
            ..incident
        };

        let incident = self.repository.create(incident).await?;
        tracing::info!(incident_id = %incident.id, severity = %incident.severity, "Incident reported");
        Ok(incident)
    }

    pub async fn get(&self, id: &IncidentId) -> Result<Option<Incident>, Error> {
        self.repository.find_by_id(id).await
    }

    pub async fn list(
        &self,
        filter: &IncidentFilter,
        page: &Page,
    ) -> Result<Paginated<Incident>, Error> {
        self.repository.list(filter, &page.normalized()).await
    }

    /// Apply a partial update, maintaining the resolution timestamps.
    pub async fn update(
        &self,
        id: &IncidentId,
        update: IncidentUpdate,
    ) -> Result<Option<Incident>, Error> {
        let Some(mut incident) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            incident.title = title;
        }
        if let Some(description) = update.description {
            incident.description = description;
        }
        if let Some(severity) = update.severity {
            incident.severity = severity;
        }
        if let Some(category) = update.category {
            incident.category = category;
        }
        if let Some(assignee_id) = update.assignee_id {
            incident.assignee_id = Some(assignee_id);
        }
        if let Some(resolution_notes) = update.resolution_notes {
            incident.resolution_notes = Some(resolution_notes);
        }

        if let Some(status) = update.status {
            let now = Utc::now();
            incident.status = status;
            match status {
                IncidentStatus::Resolved => {
                    if incident.resolved_at.is_none() {
                        incident.resolved_at = Some(now);
                    }
                }
                IncidentStatus::Closed => {
                    if incident.closed_at.is_none() {
                        incident.closed_at = Some(now);
                    }
                }
                IncidentStatus::Open
                | IncidentStatus::Investigating
                | IncidentStatus::InProgress => {
                    incident.resolved_at = None;
                    incident.closed_at = None;
                }
            }
        }

        let incident = self.repository.update(&incident).await?;
        Ok(Some(incident))
    }

    pub async fn delete(&self, id: &IncidentId) -> Result<(), Error> {
        self.repository.delete(id).await?;
        tracing::info!(incident_id = %id, "Incident deleted");
        Ok(())
    }
}
