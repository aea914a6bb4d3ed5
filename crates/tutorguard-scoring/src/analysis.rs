//! Analysis results returned to applicants and admins

use serde::{Deserialize, Serialize};
use std::fmt;
use tutorguard_core::Severity;
use tutorguard_policy::ViolationKind;

/// Percentage (0-100) of each scoring family's cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub clarity: u8,
    pub structure: u8,
    pub empathy: u8,
    pub communication: u8,
    pub subject_fit: u8,
    pub reliability: u8,
    pub policy_compliance: u8,
    pub availability: u8,
}

/// Rounded share of `cap` that `value` represents
pub(crate) fn percent_of(value: u32, cap: u32) -> u8 {
    if cap == 0 {
        return 0;
    }
    let ratio = f64::from(value.min(cap)) / f64::from(cap);
    (ratio * 100.0).round() as u8
}

/// Capped raw points behind the composite score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub completeness: u32,
    pub availability: u32,
    pub subject_fit: u32,
    pub micro_teaching: u32,
    pub compliance: u32,

    /// Micro-teaching families after their individual clamps
    pub clarity: u32,
    pub structure: u32,
    pub empathy: u32,
    pub communication: u32,
}

impl ScoreBreakdown {
    /// Sum of the five sub-scores before the final cap
    pub fn total(&self) -> u32 {
        self.completeness
            + self.availability
            + self.subject_fit
            + self.micro_teaching
            + self.compliance
    }
}

/// Post-scoring risk signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    LowAvailability,
    WeakDemo,
    MissingProfileFields,
    PolicyRisk,
}

/// Suggestion appended when empathy falls below its threshold
pub const EMPATHY_SUGGESTION: &str =
    "Show more empathy in your answers: acknowledge how the student feels and describe how you would encourage them.";

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::LowAvailability => "low_availability",
            RiskFlag::WeakDemo => "weak_demo",
            RiskFlag::MissingProfileFields => "missing_profile_fields",
            RiskFlag::PolicyRisk => "policy_risk",
        }
    }

    /// Improvement suggestion shown for this flag
    pub fn suggestion(&self) -> &'static str {
        match self {
            RiskFlag::LowAvailability => {
                "Add more available days and time slots so students can book you."
            }
            RiskFlag::WeakDemo => {
                "Expand your teaching answers with clear steps, examples, and how you check understanding."
            }
            RiskFlag::MissingProfileFields => {
                "Complete your profile: languages, subjects, grades, experience, and teaching style."
            }
            RiskFlag::PolicyRisk => {
                "Remove contact details, links, and off-platform requests from your answers and bio."
            }
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which free-text field tripped the policy engine, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub field: String,
    pub severity: Severity,
    pub kinds: Vec<ViolationKind>,
}

/// Narrative summary for a composite score
pub fn summary_for(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => {
            "Outstanding application with a strong teaching demo and a complete profile."
        }
        80..=89 => "Strong application; a few small improvements would make it excellent.",
        70..=79 => "Solid application that meets the bar for review.",
        50..=69 => "Promising application, but several areas need more detail before review.",
        _ => "Application needs significant work before it can be reviewed.",
    }
}

/// Full evaluation of a tutor application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Composite score, 0-100
    pub quality_score: u8,

    pub dimension_scores: DimensionScores,

    /// Flags in derivation order
    pub risk_flags: Vec<RiskFlag>,

    /// At most the configured number of suggestions, flags first
    pub improvement_checklist: Vec<String>,

    pub auto_summary: String,

    pub breakdown: ScoreBreakdown,

    /// Empty unless the compliance check blocked a field
    pub compliance_findings: Vec<ComplianceFinding>,
}

impl AnalysisResult {
    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.risk_flags.contains(&flag)
    }

    /// Flag names as persisted on application records
    pub fn flag_names(&self) -> Vec<String> {
        self.risk_flags.iter().map(|flag| flag.as_str().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent_of(0, 12), 0);
        assert_eq!(percent_of(5, 12), 42);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(12, 12), 100);
        assert_eq!(percent_of(3, 0), 0);
    }

    #[test]
    fn test_summary_bands() {
        assert_eq!(summary_for(100), summary_for(90));
        assert_ne!(summary_for(90), summary_for(89));
        assert_ne!(summary_for(80), summary_for(79));
        assert_ne!(summary_for(70), summary_for(69));
        assert_ne!(summary_for(50), summary_for(49));
        assert_eq!(summary_for(0), summary_for(49));
    }

    #[test]
    fn test_risk_flag_serializes_snake_case() {
        let json = serde_json::to_string(&RiskFlag::MissingProfileFields).unwrap();
        assert_eq!(json, "\"missing_profile_fields\"");
        assert_eq!(RiskFlag::PolicyRisk.to_string(), "policy_risk");
    }
}
