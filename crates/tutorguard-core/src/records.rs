//! Records handed to the storage collaborator.
//!
//! Incidents, notifications, and messages are append-only. Application
//! records are appended once at evaluation time and afterwards only change
//! through [`ApplicationUpdate`] partials.

use crate::types::{truncate_chars, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum characters of offending text kept on an incident.
pub const INCIDENT_SNIPPET_CHARS: usize = 100;

fn prefixed_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4())
}

/// Rule family recorded on a blocked message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    ContactShareAttempt,
    ExternalLinkAttempt,
    PolicyViolation,
}

impl IncidentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentKind::ContactShareAttempt => "contact_share_attempt",
            IncidentKind::ExternalLinkAttempt => "external_link_attempt",
            IncidentKind::PolicyViolation => "policy_violation",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record written only when a message is blocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub kind: IncidentKind,
    pub severity: Severity,
    pub actor_id: String,
    /// Offending text, truncated to [`INCIDENT_SNIPPET_CHARS`].
    pub snippet: String,
    pub created_at: DateTime<Utc>,
}

impl Incident {
    pub fn new(
        kind: IncidentKind,
        severity: Severity,
        actor_id: impl Into<String>,
        text: &str,
    ) -> Self {
        Self {
            id: prefixed_id("inc"),
            kind,
            severity,
            actor_id: actor_id.into(),
            snippet: truncate_chars(text, INCIDENT_SNIPPET_CHARS),
            created_at: Utc::now(),
        }
    }
}

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Audience {
    Admin,
    User(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub audience: Audience,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an admin-facing notification
    pub fn admin(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Audience::Admin, title, body)
    }

    pub fn new(audience: Audience, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: prefixed_id("ntf"),
            audience,
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// A persisted chat message between two marketplace users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        conversation_id: impl Into<String>,
        sender_id: impl Into<String>,
        recipient_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: prefixed_id("msg"),
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// Workflow status of a tutor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Submitted,
    HeldByAi,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::HeldByAi => "held_by_ai",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Approved or rejected.
    pub fn is_decided(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(prefixed_id("app"))
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-owned tutor application, referenced by the core through its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub applicant_name: String,
    pub status: ApplicationStatus,
    pub quality_score: u8,
    #[serde(default)]
    pub risk_flags: Vec<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// A fresh record in the `pending` state.
    pub fn pending(
        applicant_name: impl Into<String>,
        quality_score: u8,
        risk_flags: Vec<String>,
    ) -> Self {
        Self {
            id: ApplicationId::generate(),
            applicant_name: applicant_name.into(),
            status: ApplicationStatus::Pending,
            quality_score,
            risk_flags,
            admin_notes: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: ApplicationUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(notes) = update.admin_notes {
            self.admin_notes = Some(notes);
        }
        if let Some(reviewed_at) = update.reviewed_at {
            self.reviewed_at = Some(reviewed_at);
        }
    }
}

/// Partial update for [`ApplicationRecord`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationUpdate {
    pub status: Option<ApplicationStatus>,
    pub admin_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Anything the core appends to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    Incident(Incident),
    Notification(Notification),
    Message(Message),
    Application(ApplicationRecord),
}
