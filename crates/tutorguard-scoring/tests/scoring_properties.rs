//! Behaviour tests for application scoring

use proptest::prelude::*;
use tutorguard_core::Severity;
use tutorguard_policy::ViolationKind;
use tutorguard_scoring::{
    evaluate_tutor_application, ApplicationProfile, Availability, RiskFlag, ScoringPolicy,
    SkillCheckAnswers, TutorApplication, EMPATHY_SUGGESTION,
};

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
            bio: Some(
                "I love helping students build confidence in science and reading.".to_string(),
            ),
            video_url: None,
        },
        skill_check: SkillCheckAnswers::new(ANSWER_ONE, ANSWER_TWO, ANSWER_THREE),
    }
}

#[test]
fn complete_application_scores_high() {
    let result = evaluate_tutor_application(&complete_application());

    assert_eq!(result.breakdown.completeness, 20);
    assert_eq!(result.breakdown.availability, 15);
    assert_eq!(result.breakdown.subject_fit, 10);
    assert_eq!(result.breakdown.micro_teaching, 35);
    assert_eq!(result.breakdown.compliance, 10);
    assert_eq!(result.quality_score, 90);
    assert!(result.risk_flags.is_empty());
    assert!(result.improvement_checklist.is_empty());
    assert!(result.compliance_findings.is_empty());
    assert_eq!(result.dimension_scores.reliability, 100);
    assert_eq!(result.dimension_scores.communication, 100);
}

#[test]
fn email_in_answer_fails_compliance() {
    let mut application = complete_application();
    application.skill_check.q2 =
        format!("{} Questions go to ada.tutor@example.com anytime.", ANSWER_TWO);

    let result = evaluate_tutor_application(&application);

    assert_eq!(result.breakdown.compliance, 0);
    assert_eq!(result.dimension_scores.policy_compliance, 0);
    assert!(result.has_flag(RiskFlag::PolicyRisk));
    assert!(result.quality_score >= 70);

    let finding = &result.compliance_findings[0];
    assert_eq!(finding.field, "skill_check.q2");
    assert_eq!(finding.severity, Severity::High);
    assert!(finding.kinds.contains(&ViolationKind::Email));
    assert_eq!(
        result.improvement_checklist,
        vec![RiskFlag::PolicyRisk.suggestion().to_string()]
    );
}

#[test]
fn sparse_application_flags_low_availability() {
    let application = TutorApplication {
        profile: ApplicationProfile {
            name: "Bo".to_string(),
            country: "US".to_string(),
            languages: strings(&["English"]),
            availability: Availability {
                days: strings(&["Sat"]),
                slots: strings(&["evening"]),
            },
            ..Default::default()
        },
        skill_check: SkillCheckAnswers::default(),
    };

    let result = evaluate_tutor_application(&application);

    assert_eq!(result.breakdown.completeness, 8);
    assert!(result.breakdown.completeness <= 12);
    assert_eq!(result.breakdown.availability, 4);
    assert_eq!(result.breakdown.subject_fit, 0);
    assert_eq!(
        result.risk_flags,
        vec![
            RiskFlag::LowAvailability,
            RiskFlag::WeakDemo,
            RiskFlag::MissingProfileFields
        ]
    );
    assert_eq!(result.improvement_checklist.last().unwrap(), EMPATHY_SUGGESTION);
    assert!(result.quality_score < 50);
}

#[test]
fn duplicate_days_count_once() {
    let mut application = complete_application();
    application.profile.availability.days = strings(&["Mon", "mon", "MON"]);

    let result = evaluate_tutor_application(&application);
    assert_eq!(result.breakdown.availability, 2 + 7);
}

#[test]
fn tuned_policy_changes_threshold() {
    let mut policy = ScoringPolicy::default();
    policy.risk.low_availability_below = 16;
    let scorer = tutorguard_scoring::ApplicationScorer::new(policy, Default::default()).unwrap();

    let result = scorer.evaluate(&complete_application());
    assert_eq!(result.risk_flags, vec![RiskFlag::LowAvailability]);
}

proptest! {
    #[test]
    fn score_is_bounded_and_deterministic(
        q1 in "\\PC{0,300}",
        q2 in "[a-z .!?]{0,300}",
        days in proptest::collection::vec("[A-Za-z]{1,8}", 0..8),
    ) {
        let mut application = complete_application();
        application.skill_check = SkillCheckAnswers::new(q1, q2, "");
        application.profile.availability.days = days;

        let first = evaluate_tutor_application(&application);
        let second = evaluate_tutor_application(&application);

        prop_assert!(first.quality_score <= 100);
        prop_assert!(first.breakdown.micro_teaching <= 35);
        prop_assert!(first.improvement_checklist.len() <= 5);
        prop_assert_eq!(first, second);
    }
}
