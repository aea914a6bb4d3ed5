//! End-to-end gate behaviour against the in-memory store

use std::sync::Arc;
use tutorguard_core::{ApplicationStatus, Audience, IncidentKind, Severity};
use tutorguard_gate::{
    ApplicationGate, GateConfig, MessageDraft, MessagingConfig, MessagingGate, ReviewDecision,
    SendOutcome, CONTACT_BLOCK_REASON,
};
use tutorguard_scoring::{
    evaluate_tutor_application, AnalysisResult, ApplicationProfile, Availability,
    DimensionScores, RiskFlag, ScoreBreakdown, SkillCheckAnswers, TutorApplication,
};
use tutorguard_telemetry::InMemoryStore;

const ANSWER_ONE: &str = "First, I explain the idea with a simple example so the student sees the pattern. Then they practice a similar problem while I patiently guide them. I always check they understand before moving on.";
const ANSWER_TWO: &str = "To begin, I gently ask the child what feels difficult about fractions. Next, I model one problem step by step and show my thinking aloud. Finally, the learner tries one alone and I encourage every honest attempt.";
const ANSWER_THREE: &str = "When a student struggles, I calmly break the task into smaller parts. Then we review each part together and I praise their effort. This support builds confidence and keeps them motivated to continue.";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn complete_application() -> TutorApplication {
    TutorApplication {
        profile: ApplicationProfile {
            name: "Ada Lovelace".to_string(),
            country: "United Kingdom".to_string(),
            timezone: "Europe/London".to_string(),
            languages: strings(&["English", "French"]),
            subjects: strings(&["Math", "Physics", "Chemistry"]),
            grades_supported: strings(&["Grade 6", "Grade 7", "Grade 8"]),
            experience_level: "experienced".to_string(),
            teaching_style_tags: strings(&["patient", "structured"]),
            availability: Availability {
                days: strings(&["Mon", "Tue", "Wed", "Thu", "Fri"]),
                slots: strings(&["morning", "afternoon", "evening"]),
            },
            bio: None,
            video_url: None,
        },
        skill_check: SkillCheckAnswers::new(ANSWER_ONE, ANSWER_TWO, ANSWER_THREE),
    }
}

fn analysis(score: u8, flags: Vec<RiskFlag>) -> AnalysisResult {
    AnalysisResult {
        quality_score: score,
        dimension_scores: DimensionScores::default(),
        risk_flags: flags,
        improvement_checklist: Vec::new(),
        auto_summary: tutorguard_scoring::summary_for(score).to_string(),
        breakdown: ScoreBreakdown::default(),
        compliance_findings: Vec::new(),
    }
}

fn application_gate() -> ApplicationGate<InMemoryStore> {
    ApplicationGate::new(Arc::new(InMemoryStore::new()), GateConfig::default())
}

#[test]
fn contact_sharing_message_is_blocked_with_side_effects() {
    let gate = MessagingGate::new(Arc::new(InMemoryStore::new()));
    let outcome = gate
        .create_message(
            MessageDraft::new("conv-9", "tutor-7", "parent-3", "call me at 5551234567"),
            &MessagingConfig::default(),
        )
        .unwrap();

    let incident_id = match &outcome {
        SendOutcome::Blocked {
            reason,
            incident_id,
        } => {
            assert_eq!(reason, CONTACT_BLOCK_REASON);
            incident_id.clone()
        }
        SendOutcome::Delivered(_) => panic!("message should have been blocked"),
    };

    let store = gate.store();
    assert!(store.messages().is_empty());

    let incidents = store.incidents();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].id, incident_id);
    assert_eq!(incidents[0].kind, IncidentKind::ContactShareAttempt);
    assert_eq!(incidents[0].severity, Severity::High);
    assert_eq!(incidents[0].snippet, "call me at 5551234567");

    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].audience, Audience::Admin);
}

#[test]
fn clean_message_appends_only_the_message() {
    let gate = MessagingGate::new(Arc::new(InMemoryStore::new()));
    let outcome = gate
        .create_message(
            MessageDraft::new(
                "conv-1",
                "tutor-1",
                "parent-1",
                "Great progress on fractions today!",
            ),
            &MessagingConfig::default(),
        )
        .unwrap();

    let message = outcome.message().unwrap();
    assert_eq!(message.body, "Great progress on fractions today!");
    assert_eq!(gate.store().messages().len(), 1);
    assert!(gate.store().incidents().is_empty());
    assert!(gate.store().notifications().is_empty());
}

#[test]
fn threshold_boundary_decides_initial_status() {
    let gate = application_gate();

    let at_threshold = gate.submit("Ada", &analysis(70, Vec::new())).unwrap();
    let below = gate.submit("Grace", &analysis(69, Vec::new())).unwrap();

    assert_eq!(at_threshold.status, ApplicationStatus::Submitted);
    assert_eq!(below.status, ApplicationStatus::HeldByAi);

    // Only the submitted application notifies admins
    let notifications = gate.store().notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].body.contains("Ada"));
    assert!(notifications[0].body.contains("70"));
}

#[test]
fn policy_risk_holds_high_scores() {
    let gate = application_gate();
    let record = gate
        .submit("Ada", &analysis(95, vec![RiskFlag::PolicyRisk]))
        .unwrap();

    assert_eq!(record.status, ApplicationStatus::HeldByAi);
    assert_eq!(record.risk_flags, vec!["policy_risk".to_string()]);
    assert!(gate.store().notifications().is_empty());
}

#[test]
fn threshold_is_runtime_configuration() {
    let gate = ApplicationGate::new(
        Arc::new(InMemoryStore::new()),
        GateConfig {
            min_score_for_auto_submit: 85,
        },
    );
    let record = gate.submit("Ada", &analysis(80, Vec::new())).unwrap();
    assert_eq!(record.status, ApplicationStatus::HeldByAi);
}

#[test]
fn hold_queue_lists_held_applications_until_reviewed() {
    let gate = application_gate();
    let held = gate.submit("Grace", &analysis(40, vec![RiskFlag::WeakDemo])).unwrap();
    gate.submit("Ada", &analysis(88, Vec::new())).unwrap();

    let queue = gate.hold_queue().unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, held.id);

    let reviewed = gate
        .review(&held.id, ReviewDecision::Approve, Some("Strong references".to_string()))
        .unwrap();
    assert_eq!(reviewed.status, ApplicationStatus::Approved);
    assert_eq!(reviewed.admin_notes.as_deref(), Some("Strong references"));
    assert!(reviewed.reviewed_at.is_some());
    assert!(gate.hold_queue().unwrap().is_empty());
}

#[test]
fn decided_applications_can_be_flipped() {
    let gate = application_gate();
    let record = gate.submit("Ada", &analysis(90, Vec::new())).unwrap();

    gate.review(&record.id, ReviewDecision::Approve, None).unwrap();
    let flipped = gate
        .review(&record.id, ReviewDecision::Reject, Some("Failed background check".to_string()))
        .unwrap();

    assert_eq!(flipped.status, ApplicationStatus::Rejected);
    assert_eq!(flipped.admin_notes.as_deref(), Some("Failed background check"));
}

#[test]
fn scored_application_with_email_is_held() {
    let mut application = TutorApplication::default();
    application.profile.name = "Ada".to_string();
    application.skill_check = SkillCheckAnswers::new(
        "",
        "Send questions to ada.tutor@example.com and I will reply.",
        "",
    );

    let analysis = evaluate_tutor_application(&application);
    let record = application_gate().submit("Ada", &analysis).unwrap();

    assert!(analysis.has_flag(RiskFlag::PolicyRisk));
    assert_eq!(record.status, ApplicationStatus::HeldByAi);
}

#[test]
fn complete_application_is_submitted() {
    let gate = application_gate();
    let analysis = evaluate_tutor_application(&complete_application());

    let record = gate.submit("Ada Lovelace", &analysis).unwrap();

    assert!(analysis.quality_score >= 70);
    assert_eq!(record.status, ApplicationStatus::Submitted);
    assert_eq!(record.quality_score, analysis.quality_score);
    assert!(record.risk_flags.is_empty());
    assert_eq!(gate.store().notifications().len(), 1);
}

#[test]
fn complete_application_with_email_is_held() {
    let mut application = complete_application();
    application.skill_check.q2 =
        format!("{} Questions go to ada.tutor@example.com anytime.", ANSWER_TWO);
    let gate = application_gate();
    let analysis = evaluate_tutor_application(&application);

    let record = gate.submit("Ada Lovelace", &analysis).unwrap();

    assert!(analysis.quality_score >= 70);
    assert_eq!(analysis.dimension_scores.policy_compliance, 0);
    assert!(analysis.has_flag(RiskFlag::PolicyRisk));
    assert_eq!(record.status, ApplicationStatus::HeldByAi);
    assert_eq!(record.risk_flags, vec!["policy_risk".to_string()]);
    assert!(gate.store().notifications().is_empty());
    assert_eq!(gate.hold_queue().unwrap()[0].id, record.id);
}
