//! Metric names and recording helpers
//!
//! The gates record through the `metrics` facade; installing an exporter is
//! left to the embedding service.

use tutorguard_core::{ApplicationStatus, IncidentKind};

/// Message sends, labelled `outcome` = `delivered` | `blocked`
pub const MESSAGES_TOTAL: &str = "tutorguard_messages_total";

/// Incidents raised by the messaging gate, labelled `kind`
pub const INCIDENTS_TOTAL: &str = "tutorguard_incidents_total";

/// Applications entering the workflow or reviewed, labelled `status`
pub const APPLICATIONS_TOTAL: &str = "tutorguard_applications_total";

/// Composite quality score of submitted applications
pub const QUALITY_SCORE: &str = "tutorguard_quality_score";

/// Register descriptions with whichever recorder is installed
pub fn describe_metrics() {
    metrics::describe_counter!(MESSAGES_TOTAL, "Total message sends by outcome");
    metrics::describe_counter!(INCIDENTS_TOTAL, "Total moderation incidents by kind");
    metrics::describe_counter!(
        APPLICATIONS_TOTAL,
        "Total tutor application status transitions by resulting status"
    );
    metrics::describe_histogram!(
        QUALITY_SCORE,
        metrics::Unit::Count,
        "Composite quality score of evaluated tutor applications"
    );
}

/// Outcome label for a message send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcomeLabel {
    Delivered,
    Blocked,
}

impl SendOutcomeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendOutcomeLabel::Delivered => "delivered",
            SendOutcomeLabel::Blocked => "blocked",
        }
    }
}

pub fn record_message(outcome: SendOutcomeLabel) {
    metrics::counter!(MESSAGES_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_incident(kind: IncidentKind) {
    metrics::counter!(INCIDENTS_TOTAL, "kind" => kind.as_str()).increment(1);
}

pub fn record_application(status: ApplicationStatus) {
    metrics::counter!(APPLICATIONS_TOTAL, "status" => status.label()).increment(1);
}

pub fn record_quality_score(score: u8) {
    metrics::histogram!(QUALITY_SCORE).record(f64::from(score));
}
