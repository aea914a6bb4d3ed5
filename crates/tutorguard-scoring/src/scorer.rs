//! Application scorer
//!
//! Computes five independently capped sub-scores from a [`ScoringPolicy`],
//! then derives dimension percentages, risk flags, the improvement checklist
//! and the summary. Evaluation is total: missing fields contribute zero.

use std::sync::OnceLock;
use tracing::debug;
use tutorguard_core::Result;
use tutorguard_policy::PolicyEngine;

use crate::analysis::{
    percent_of, summary_for, AnalysisResult, ComplianceFinding, DimensionScores, RiskFlag,
    ScoreBreakdown, EMPATHY_SUGGESTION,
};
use crate::policy::{Criterion, Family, ScoringPolicy};
use crate::profile::{distinct_count, is_set, TutorApplication};

static DEFAULT_SCORER: OnceLock<ApplicationScorer> = OnceLock::new();

/// Process-wide scorer built from the default rubric and policy rules
pub fn default_scorer() -> &'static ApplicationScorer {
    DEFAULT_SCORER.get_or_init(|| {
        ApplicationScorer::new(ScoringPolicy::default(), PolicyEngine::default())
            .expect("built-in scoring criteria must compile")
    })
}

/// Evaluate an application with the built-in rubric
pub fn evaluate_tutor_application(application: &TutorApplication) -> AnalysisResult {
    default_scorer().evaluate(application)
}

/// Clamped micro-teaching family totals
#[derive(Debug, Default, Clone, Copy)]
struct FamilyTotals {
    clarity: u32,
    structure: u32,
    empathy: u32,
    communication: u32,
}

impl FamilyTotals {
    fn add(&mut self, family: Family, points: u32) {
        let slot = match family {
            Family::Clarity => &mut self.clarity,
            Family::Structure => &mut self.structure,
            Family::Empathy => &mut self.empathy,
            Family::Communication => &mut self.communication,
        };
        *slot += points;
    }

    fn sum(&self) -> u32 {
        self.clarity + self.structure + self.empathy + self.communication
    }
}

/// Rubric-driven evaluator for tutor applications
#[derive(Debug, Clone)]
pub struct ApplicationScorer {
    policy: ScoringPolicy,
    criteria: Vec<Criterion>,
    engine: PolicyEngine,
}

impl ApplicationScorer {
    /// Compile the rubric's criteria; fails on a malformed rule
    pub fn new(policy: ScoringPolicy, engine: PolicyEngine) -> Result<Self> {
        let criteria = policy.compile_criteria()?;
        Ok(Self {
            policy,
            criteria,
            engine,
        })
    }


    pub fn evaluate(&self, application: &TutorApplication) -> AnalysisResult {
        let families = self.micro_teaching(application);
        let findings = self.compliance_findings(application);

        let breakdown = ScoreBreakdown {
            completeness: self.completeness(application),
            availability: self.availability(application),
            subject_fit: self.subject_fit(application),
            micro_teaching: families.sum().min(self.policy.micro_teaching.cap),
            compliance: if findings.is_empty() {
                self.policy.compliance.cap
            } else {
                0
            },
            clarity: families.clarity,
            structure: families.structure,
            empathy: families.empathy,
            communication: families.communication,
        };

        let quality_score = breakdown.total().min(ScoringPolicy::MAX_SCORE) as u8;
        let dimension_scores = self.dimensions(&breakdown);
        let risk_flags = self.risk_flags(&breakdown, !findings.is_empty());
        let improvement_checklist = self.checklist(&risk_flags, &dimension_scores);

        debug!(
            score = quality_score,
            completeness = breakdown.completeness,
            availability = breakdown.availability,
            subject_fit = breakdown.subject_fit,
            micro_teaching = breakdown.micro_teaching,
            compliance = breakdown.compliance,
            flags = risk_flags.len(),
            "Evaluated tutor application"
        );

        AnalysisResult {
            quality_score,
            dimension_scores,
            risk_flags,
            improvement_checklist,
            auto_summary: summary_for(quality_score).to_string(),
            breakdown,
            compliance_findings: findings,
        }
    }

    fn completeness(&self, application: &TutorApplication) -> u32 {
        let rubric = &self.policy.completeness;
        let profile = &application.profile;
        let availability = &profile.availability;

        let checks = [
            (profile.name.trim().chars().count() >= rubric.name_min_chars, rubric.name),
            (is_set(&profile.country), rubric.country),
            (is_set(&profile.timezone), rubric.timezone),
            (distinct_count(&profile.languages) > 0, rubric.languages),
            (distinct_count(&profile.subjects) > 0, rubric.subjects),
            (distinct_count(&profile.grades_supported) > 0, rubric.grades),
            (is_set(&profile.experience_level), rubric.experience_level),
            (distinct_count(&profile.teaching_style_tags) > 0, rubric.teaching_styles),
            (
                distinct_count(&availability.days) > 0 && distinct_count(&availability.slots) > 0,
                rubric.availability,
            ),
        ];

        let points: u32 = checks
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, points)| points)
            .sum();
        points.min(rubric.cap)
    }

    fn availability(&self, application: &TutorApplication) -> u32 {
        let rubric = &self.policy.availability;
        let availability = &application.profile.availability;

        let points = rubric.days.points(distinct_count(&availability.days))
            + rubric.slots.points(distinct_count(&availability.slots));
        points.min(rubric.cap)
    }

    fn subject_fit(&self, application: &TutorApplication) -> u32 {
        let rubric = &self.policy.subject_fit;
        let profile = &application.profile;

        let points = rubric.subjects.points(distinct_count(&profile.subjects))
            + rubric.grades.points(distinct_count(&profile.grades_supported));
        points.min(rubric.cap)
    }

    /// Accumulate every answer, then clamp each family
    fn micro_teaching(&self, application: &TutorApplication) -> FamilyTotals {
        let mut totals = FamilyTotals::default();

        for (_, answer) in application.skill_check.labelled() {
            if !is_set(answer) {
                continue;
            }
            for criterion in &self.criteria {
                totals.add(criterion.family, criterion.award(answer));
            }
        }

        let caps = &self.policy.micro_teaching.family_caps;
        FamilyTotals {
            clarity: totals.clarity.min(caps.cap(Family::Clarity)),
            structure: totals.structure.min(caps.cap(Family::Structure)),
            empathy: totals.empathy.min(caps.cap(Family::Empathy)),
            communication: totals.communication.min(caps.cap(Family::Communication)),
        }
    }

    /// Blocked free-text fields; empty means compliant
    fn compliance_findings(&self, application: &TutorApplication) -> Vec<ComplianceFinding> {
        let bio = application
            .profile
            .bio
            .as_deref()
            .filter(|bio| is_set(bio))
            .map(|bio| ("profile.bio", bio));

        application
            .skill_check
            .labelled()
            .into_iter()
            .chain(bio)
            .filter_map(|(field, text)| {
                let result = self.engine.check(text);
                if !result.blocked {
                    return None;
                }
                let mut kinds: Vec<_> = result.violations.iter().map(|v| v.kind).collect();
                kinds.dedup();
                debug!(field, severity = ?result.severity, "Application text failed policy check");
                Some(ComplianceFinding {
                    field: field.to_string(),
                    severity: result.severity,
                    kinds,
                })
            })
            .collect()
    }

    fn dimensions(&self, breakdown: &ScoreBreakdown) -> DimensionScores {
        let policy = &self.policy;
        let caps = &policy.micro_teaching.family_caps;

        DimensionScores {
            clarity: percent_of(breakdown.clarity, caps.clarity),
            structure: percent_of(breakdown.structure, caps.structure),
            empathy: percent_of(breakdown.empathy, caps.empathy),
            communication: percent_of(breakdown.communication, caps.communication),
            subject_fit: percent_of(breakdown.subject_fit, policy.subject_fit.cap),
            reliability: percent_of(breakdown.completeness, policy.completeness.cap),
            policy_compliance: percent_of(breakdown.compliance, policy.compliance.cap),
            availability: percent_of(breakdown.availability, policy.availability.cap),
        }
    }

    fn risk_flags(&self, breakdown: &ScoreBreakdown, policy_violation: bool) -> Vec<RiskFlag> {
        let thresholds = &self.policy.risk;

        [
            (
                breakdown.availability < thresholds.low_availability_below,
                RiskFlag::LowAvailability,
            ),
            (
                breakdown.micro_teaching < thresholds.weak_demo_below,
                RiskFlag::WeakDemo,
            ),
            (
                breakdown.completeness < thresholds.missing_profile_below,
                RiskFlag::MissingProfileFields,
            ),
            (policy_violation, RiskFlag::PolicyRisk),
        ]
        .into_iter()
        .filter_map(|(raised, flag)| raised.then_some(flag))
        .collect()
    }

    fn checklist(&self, flags: &[RiskFlag], dimensions: &DimensionScores) -> Vec<String> {
        let extra = (dimensions.empathy < self.policy.risk.low_empathy_percent_below)
            .then_some(EMPATHY_SUGGESTION);

        flags
            .iter()
            .map(RiskFlag::suggestion)
            .chain(extra)
            .take(self.policy.risk.checklist_limit)
            .map(str::to_string)
            .collect()
    }
}

impl Default for ApplicationScorer {
    fn default() -> Self {
        default_scorer().clone()
    }
}
