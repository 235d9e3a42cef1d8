//! Security incident records
//!
//! Incidents are flat records: a titled description with severity, category,
//! workflow status, and reporter/assignee references. Status transitions
//! stamp `resolved_at`/`closed_at`; that logic lives in the incident service.

use crate::{
    Error,
    account::AccountId,
    error::ValidationError,
    id::generate_prefixed_id,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct IncidentId(String);

impl IncidentId {
    pub fn new(id: &str) -> Self {
        IncidentId(id.to_string())
    }

    pub fn new_random() -> Self {
        IncidentId(generate_prefixed_id("inc"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for IncidentId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for IncidentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IncidentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity scale shared by incidents (severity) and assets (criticality).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => {
                Err(ValidationError::InvalidField(format!("Unknown severity: {other}")).into())
            }
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    Open,
    Investigating,
    InProgress,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::InProgress => "in-progress",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IncidentStatus::Open),
            "investigating" => Ok(IncidentStatus::Investigating),
            "in-progress" => Ok(IncidentStatus::InProgress),
            "resolved" => Ok(IncidentStatus::Resolved),
            "closed" => Ok(IncidentStatus::Closed),
            other => {
                Err(ValidationError::InvalidField(format!("Unknown status: {other}")).into())
            }
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentCategory {
    Malware,
    Phishing,
    DataBreach,
    NetworkIntrusion,
    DenialOfService,
    InsiderThreat,
    Other,
}

impl IncidentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentCategory::Malware => "malware",
            IncidentCategory::Phishing => "phishing",
            IncidentCategory::DataBreach => "data-breach",
            IncidentCategory::NetworkIntrusion => "network-intrusion",
            IncidentCategory::DenialOfService => "denial-of-service",
            IncidentCategory::InsiderThreat => "insider-threat",
            IncidentCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for IncidentCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "malware" => Ok(IncidentCategory::Malware),
            "phishing" => Ok(IncidentCategory::Phishing),
            "data-breach" => Ok(IncidentCategory::DataBreach),
            "network-intrusion" => Ok(IncidentCategory::NetworkIntrusion),
            "denial-of-service" => Ok(IncidentCategory::DenialOfService),
            "insider-threat" => Ok(IncidentCategory::InsiderThreat),
            "other" => Ok(IncidentCategory::Other),
            other => {
                Err(ValidationError::InvalidField(format!("Unknown category: {other}")).into())
            }
        }
    }
}

impl std::fmt::Display for IncidentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub category: IncidentCategory,
    /// The account that reported the incident.
    pub reporter_id: AccountId,
    pub assignee_id: Option<AccountId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for incident creation.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub id: IncidentId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub category: IncidentCategory,
    pub reporter_id: AccountId,
    pub assignee_id: Option<AccountId>,
}

impl NewIncident {
    pub fn builder() -> NewIncidentBuilder {
        NewIncidentBuilder::default()
    }
}

#[derive(Default)]
pub struct NewIncidentBuilder {
    id: Option<IncidentId>,
    title: Option<String>,
    description: Option<String>,
    severity: Option<Severity>,
    status: Option<IncidentStatus>,
    category: Option<IncidentCategory>,
    reporter_id: Option<AccountId>,
    assignee_id: Option<AccountId>,
}

impl NewIncidentBuilder {
    pub fn id(mut self, id: IncidentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: IncidentCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn reporter_id(mut self, reporter_id: AccountId) -> Self {
        self.reporter_id = Some(reporter_id);
        self
    }

    pub fn assignee_id(mut self, assignee_id: Option<AccountId>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    pub fn build(self) -> Result<NewIncident, Error> {
        Ok(NewIncident {
            id: self.id.unwrap_or_default(),
            title: self.title.ok_or(ValidationError::MissingField(
                "Title is required".to_string(),
            ))?,
            description: self.description.ok_or(ValidationError::MissingField(
                "Description is required".to_string(),
            ))?,
            severity: self.severity.ok_or(ValidationError::MissingField(
                "Severity is required".to_string(),
            ))?,
            status: self.status.unwrap_or(IncidentStatus::Open),
            category: self.category.ok_or(ValidationError::MissingField(
                "Category is required".to_string(),
            ))?,
            reporter_id: self.reporter_id.ok_or(ValidationError::MissingField(
                "Reporter is required".to_string(),
            ))?,
            assignee_id: self.assignee_id,
        })
    }
}

/// Partial update for an incident. Fields left as `None` are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<IncidentStatus>,
    pub category: Option<IncidentCategory>,
    pub assignee_id: Option<AccountId>,
    pub resolution_notes: Option<String>,
}
