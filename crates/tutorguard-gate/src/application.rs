//! Application gate
//!
//! Routes scored tutor applications into the review workflow and applies
//! admin decisions.
//!
//! ```text
//! pending ──(score ≥ threshold, no policy risk)──> submitted ──┐
//!    └──────────────(otherwise)──────────────────> held_by_ai ─┴─> approved ⇄ rejected
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use tutorguard_core::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationUpdate, Error, Notification,
    Record, Result,
};
use tutorguard_scoring::{AnalysisResult, RiskFlag};
use tutorguard_telemetry::{metrics, Store};

/// Runtime-tunable gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum quality score for automatic submission to admins
    pub min_score_for_auto_submit: u8,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_score_for_auto_submit: 70,
        }
    }
}

/// Status an application enters once scored
pub fn initial_status(analysis: &AnalysisResult, config: &GateConfig) -> ApplicationStatus {
    if analysis.quality_score >= config.min_score_for_auto_submit
        && !analysis.has_flag(RiskFlag::PolicyRisk)
    {
        ApplicationStatus::Submitted
    } else {
        ApplicationStatus::HeldByAi
    }
}

/// Admin review decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target(&self) -> ApplicationStatus {
        match self {
            ReviewDecision::Approve => ApplicationStatus::Approved,
            ReviewDecision::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Validate an admin review from `from`.
///
/// Decided applications may be re-reviewed, including flips between
/// approved and rejected; only pending applications cannot be reviewed.
pub fn review_transition(
    from: ApplicationStatus,
    decision: ReviewDecision,
) -> Result<ApplicationStatus> {
    let to = decision.target();
    match from {
        ApplicationStatus::Pending => Err(Error::InvalidTransition { from, to }),
        ApplicationStatus::Submitted
        | ApplicationStatus::HeldByAi
        | ApplicationStatus::Approved
        | ApplicationStatus::Rejected => Ok(to),
    }
}

/// Workflow front door for scored applications
pub struct ApplicationGate<S: Store> {
    store: Arc<S>,
    config: GateConfig,
}

impl<S: Store> ApplicationGate<S> {
    pub fn new(store: Arc<S>, config: GateConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Record a scored application and apply its initial transition.
    ///
    /// Only applications entering `submitted` notify admins; held
    /// applications wait silently in the hold queue.
    pub fn submit(
        &self,
        applicant_name: &str,
        analysis: &AnalysisResult,
    ) -> Result<ApplicationRecord> {
        let mut record = ApplicationRecord::pending(
            applicant_name,
            analysis.quality_score,
            analysis.flag_names(),
        );
        record.status = initial_status(analysis, &self.config);

        let mut batch = vec![Record::Application(record.clone())];
        if record.status == ApplicationStatus::Submitted {
            batch.push(Record::Notification(Notification::admin(
                "New tutor application",
                format!(
                    "{} submitted an application with a quality score of {}.",
                    record.applicant_name, record.quality_score
                ),
            )));
        }
        self.store.append_batch(batch)?;

        match record.status {
            ApplicationStatus::Submitted => info!(
                application = %record.id,
                score = record.quality_score,
                "Application submitted for review"
            ),
            _ => warn!(
                application = %record.id,
                score = record.quality_score,
                flags = ?record.risk_flags,
                "Application held for manual screening"
            ),
        }
        metrics::record_application(record.status);
        metrics::record_quality_score(record.quality_score);

        Ok(record)
    }

    /// Apply an admin decision, overwriting notes and the review timestamp
    pub fn review(
        &self,
        id: &ApplicationId,
        decision: ReviewDecision,
        admin_notes: Option<String>,
    ) -> Result<ApplicationRecord> {
        let current = self.store.application(id)?;
        let to = review_transition(current.status, decision)?;

        if current.status.is_decided() && current.status != to {
            warn!(
                application = %id,
                from = %current.status,
                to = %to,
                "Reversing a final review decision"
            );
        }

        let updated = self.store.update_application(
            id,
            ApplicationUpdate {
                status: Some(to),
                admin_notes: Some(admin_notes.unwrap_or_default()),
                reviewed_at: Some(Utc::now()),
            },
        )?;

        info!(application = %id, status = %to, "Application reviewed");
        metrics::record_application(to);

        Ok(updated)
    }

    /// Applications waiting in `held_by_ai`
    pub fn hold_queue(&self) -> Result<Vec<ApplicationRecord>> {
        Ok(self
            .store
            .applications_with_status(ApplicationStatus::HeldByAi)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_cannot_be_reviewed() {
        let err =
            review_transition(ApplicationStatus::Pending, ReviewDecision::Approve).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: ApplicationStatus::Pending,
                to: ApplicationStatus::Approved
            }
        ));
    }

    #[test]
    fn test_decided_applications_can_flip() {
        assert_eq!(
            review_transition(ApplicationStatus::Approved, ReviewDecision::Reject).unwrap(),
            ApplicationStatus::Rejected
        );
        assert_eq!(
            review_transition(ApplicationStatus::Rejected, ReviewDecision::Approve).unwrap(),
            ApplicationStatus::Approved
        );
    }

    #[test]
    fn test_held_and_submitted_are_reviewable() {
        for from in [ApplicationStatus::Submitted, ApplicationStatus::HeldByAi] {
            assert_eq!(
                review_transition(from, ReviewDecision::Approve).unwrap(),
                ApplicationStatus::Approved
            );
        }
    }

    #[test]
    fn test_gate_config_from_yaml() {
        let config: GateConfig = serde_yaml::from_str("min_score_for_auto_submit: 80").unwrap();
        assert_eq!(config.min_score_for_auto_submit, 80);

        let config: GateConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, GateConfig::default());
    }
}
