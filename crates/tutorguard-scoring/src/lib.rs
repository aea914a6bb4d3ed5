//! TutorGuard Application Scorer
//!
//! Deterministic quality evaluation of tutor applications. Five capped
//! sub-scores (completeness, availability, subject fit, micro-teaching and
//! policy compliance) are summed into a 0-100 quality score, alongside
//! dimension percentages, risk flags and an improvement checklist.
//!
//! The rubric is a declarative [`ScoringPolicy`]; micro-teaching heuristics
//! reuse the [`tutorguard_policy::TextRule`] matchers.

pub mod analysis;
pub mod policy;
pub mod profile;
pub mod scorer;

pub use analysis::{
    summary_for, AnalysisResult, ComplianceFinding, DimensionScores, RiskFlag, ScoreBreakdown,
    EMPATHY_SUGGESTION,
};
pub use policy::{
    AlternativeSpec, AvailabilityPolicy, CompletenessPolicy, CompliancePolicy, CountTiers,
    CriterionSpec, Family, FamilyCaps, MicroTeachingPolicy, RiskThresholds, ScoringPolicy,
    SubjectFitPolicy, Tier,
};
pub use profile::{ApplicationProfile, Availability, SkillCheckAnswers, TutorApplication};
pub use scorer::{default_scorer, evaluate_tutor_application, ApplicationScorer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{AnalysisResult, RiskFlag};
    pub use crate::policy::ScoringPolicy;
    pub use crate::profile::{ApplicationProfile, Availability, SkillCheckAnswers, TutorApplication};
    pub use crate::scorer::{evaluate_tutor_application, ApplicationScorer};
}
