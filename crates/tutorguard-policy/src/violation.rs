//! Violation taxonomy and check results

use serde::{Deserialize, Serialize};
use std::fmt;
use tutorguard_core::Severity;

/// Fixed taxonomy of text-policy violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    PhoneNumber,
    Email,
    ExternalLink,
    PlatformMention,
    OffPlatformRequest,
}

impl ViolationKind {
    /// All kinds, in detection order
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::PhoneNumber,
        ViolationKind::Email,
        ViolationKind::ExternalLink,
        ViolationKind::PlatformMention,
        ViolationKind::OffPlatformRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::PhoneNumber => "phone_number",
            ViolationKind::Email => "email",
            ViolationKind::ExternalLink => "external_link",
            ViolationKind::PlatformMention => "platform_mention",
            ViolationKind::OffPlatformRequest => "off_platform_request",
        }
    }

    /// User-facing explanation attached to each violation
    pub fn message(&self) -> &'static str {
        match self {
            ViolationKind::PhoneNumber => "Sharing phone numbers is not allowed.",
            ViolationKind::Email => "Sharing email addresses is not allowed.",
            ViolationKind::ExternalLink => "External links are not allowed.",
            ViolationKind::PlatformMention => {
                "Mentioning outside messaging or social apps is not allowed."
            }
            ViolationKind::OffPlatformRequest => {
                "Requests to communicate or pay outside the platform are not allowed."
            }
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyViolation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub matched_text: String,
    pub severity: Severity,
    pub message: String,
}

impl PolicyViolation {
    pub fn new(kind: ViolationKind, matched_text: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind,
            matched_text: matched_text.into(),
            severity,
            message: kind.message().to_string(),
        }
    }
}

/// Outcome of checking one text against the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCheckResult {
    pub blocked: bool,
    pub violations: Vec<PolicyViolation>,
    pub sanitized_text: String,
    pub severity: Severity,
}

impl PolicyCheckResult {
    /// Result for text with no detections
    pub fn clean(text: &str) -> Self {
        Self {
            blocked: false,
            violations: Vec::new(),
            sanitized_text: text.to_string(),
            severity: Severity::None,
        }
    }

    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

pub(crate) fn has_high_severity(violations: &[PolicyViolation]) -> bool {
    violations.iter().any(|v| v.severity == Severity::High)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_serializes_type_field() {
        let violation = PolicyViolation::new(ViolationKind::Email, "a@b.io", Severity::High);
        let value = serde_json::to_value(&violation).unwrap();

        assert_eq!(value["type"], "email");
        assert_eq!(value["severity"], "high");
        assert_eq!(value["matched_text"], "a@b.io");
    }

    #[test]
    fn test_clean_result() {
        let result = PolicyCheckResult::clean("hello");
        assert!(!result.blocked);
        assert_eq!(result.severity, Severity::None);
        assert_eq!(result.sanitized_text, "hello");
    }
}
