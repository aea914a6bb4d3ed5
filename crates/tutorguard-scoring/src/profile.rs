//! Tutor application input model
//!
//! Every field defaults when absent so callers can pass partially-filled
//! applications without pre-validating their shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Self-reported weekly availability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Availability {
    pub days: Vec<String>,
    pub slots: Vec<String>,
}

/// Structured profile section of a tutor application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationProfile {
    pub name: String,
    pub country: String,
    pub timezone: String,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
    pub grades_supported: Vec<String>,
    pub experience_level: String,
    pub teaching_style_tags: Vec<String>,
    pub availability: Availability,
    pub bio: Option<String>,
    pub video_url: Option<String>,
}

/// The three free-text micro-teaching answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCheckAnswers {
    pub q1: String,
    pub q2: String,
    pub q3: String,
}

impl SkillCheckAnswers {
    pub fn new(q1: impl Into<String>, q2: impl Into<String>, q3: impl Into<String>) -> Self {
        Self {
            q1: q1.into(),
            q2: q2.into(),
            q3: q3.into(),
        }
    }

    /// Answers paired with their field names
    pub fn labelled(&self) -> [(&'static str, &str); 3] {
        [
            ("skill_check.q1", self.q1.as_str()),
            ("skill_check.q2", self.q2.as_str()),
            ("skill_check.q3", self.q3.as_str()),
        ]
    }
}

/// Everything the scorer evaluates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorApplication {
    pub profile: ApplicationProfile,
    pub skill_check: SkillCheckAnswers,
}

/// True when the value has visible content
pub(crate) fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Number of distinct non-blank entries, compared case-insensitively
pub(crate) fn distinct_count(values: &[String]) -> usize {
    values
        .iter()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_count_ignores_blanks_and_case() {
        let days = vec![
            "Mon".to_string(),
            "mon ".to_string(),
            "".to_string(),
            "Tue".to_string(),
        ];
        assert_eq!(distinct_count(&days), 2);
    }

    #[test]
    fn test_partial_json_deserializes() {
        let json = r#"{"profile": {"name": "Ada", "subjects": ["math"]}}"#;
        let application: TutorApplication = serde_json::from_str(json).unwrap();

        assert_eq!(application.profile.name, "Ada");
        assert!(application.profile.availability.days.is_empty());
        assert_eq!(application.skill_check.q2, "");
    }

    #[test]
    fn test_empty_json_object() {
        let application: TutorApplication = serde_json::from_str("{}").unwrap();
        assert_eq!(application, TutorApplication::default());
    }
}
