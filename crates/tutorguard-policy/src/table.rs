//! Shared rule table
//!
//! One ordered list of `{kind, severity, rule}` entries drives every caller.
//! Callers choose which kinds are enforced through an [`EnforcementPolicy`]
//! instead of carrying their own copies of the detectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tutorguard_core::{Result, Severity};

use crate::config::PolicyConfig;
use crate::rule::{RuleSpec, TextRule};
use crate::violation::ViolationKind;

/// Dashed/dotted/spaced triplets, parenthesized area codes,
/// international-prefixed runs, and bare runs of 10+ digits. The bare run
/// only needs non-digit neighbours, so `ref5551234567` still matches.
const PHONE_PATTERNS: [&str; 4] = [
    r"\b\d{3}[-. ]\d{3}[-. ]\d{4}\b",
    r"\(\d{3}\)\s*\d{3}[-. ]?\d{4}\b",
    r"\+\d{1,3}(?:[-. ]?\d{1,4}){2,5}\b",
    r"(?:^|\D)(\d{10,})",
];

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

const SCHEME_URL_PATTERN: &str = r#"(?i)\bhttps?://[^\s<>"']+"#;

const WWW_HOST_PATTERN: &str = r#"(?i)\bwww\.[^\s<>"']+"#;

/// One detector in the table
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub rule: TextRule,

    /// Replacement used in `sanitized_text`; `None` leaves matches in place
    pub redaction: Option<String>,

    /// Placeholder used by display masking; `None` leaves matches in place
    pub mask: Option<String>,

    /// Matches lying entirely inside a span of these kinds are not reported
    pub skip_inside: Vec<ViolationKind>,
}

/// Ordered, immutable detector list
#[derive(Debug, Clone)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
}

impl RuleTable {
    pub fn new(entries: Vec<RuleEntry>) -> Self {
        Self { entries }
    }

    /// Compile the standard five-category table
    pub fn from_config(config: &PolicyConfig) -> Result<Self> {
        let phone = RuleSpec::ShapePattern {
            patterns: PHONE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            min_digits: Some(config.min_phone_digits),
            exclude: Vec::new(),
        };

        let email = RuleSpec::ShapePattern {
            patterns: vec![EMAIL_PATTERN.to_string()],
            min_digits: None,
            exclude: Vec::new(),
        };

        let mut link_patterns = vec![SCHEME_URL_PATTERN.to_string(), WWW_HOST_PATTERN.to_string()];
        if let Some(bare) = bare_domain_pattern(&config.link_tlds) {
            link_patterns.push(bare);
        }
        let links = RuleSpec::ShapePattern {
            patterns: link_patterns,
            min_digits: None,
            exclude: vec![config.platform_domain.clone()],
        };

        let entries = vec![
            RuleEntry {
                kind: ViolationKind::PhoneNumber,
                severity: Severity::High,
                rule: phone.compile()?,
                redaction: Some(config.contact_token.clone()),
                mask: Some(config.phone_mask.clone()),
                skip_inside: Vec::new(),
            },
            RuleEntry {
                kind: ViolationKind::Email,
                severity: Severity::High,
                rule: email.compile()?,
                redaction: Some(config.contact_token.clone()),
                mask: Some(config.email_mask.clone()),
                skip_inside: Vec::new(),
            },
            RuleEntry {
                kind: ViolationKind::ExternalLink,
                severity: Severity::Medium,
                rule: links.compile()?,
                redaction: Some(config.link_token.clone()),
                mask: Some(config.link_token.clone()),
                skip_inside: vec![ViolationKind::Email],
            },
            RuleEntry {
                kind: ViolationKind::PlatformMention,
                severity: Severity::Medium,
                rule: TextRule::keywords(config.platform_names.iter().cloned())?,
                redaction: None,
                mask: None,
                skip_inside: Vec::new(),
            },
            RuleEntry {
                kind: ViolationKind::OffPlatformRequest,
                severity: Severity::High,
                rule: TextRule::keywords(config.solicitation_phrases.iter().cloned())?,
                redaction: None,
                mask: None,
                skip_inside: Vec::new(),
            },
        ];

        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// First entry for `kind`
    pub fn entry(&self, kind: ViolationKind) -> Option<&RuleEntry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }
}

fn bare_domain_pattern(tlds: &[String]) -> Option<String> {
    let alternatives: Vec<String> = tlds
        .iter()
        .map(|tld| tld.trim().trim_start_matches('.'))
        .filter(|tld| !tld.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    Some(format!(
        r"(?i)\b[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.(?:{})\b",
        alternatives.join("|")
    ))
}

/// Which violation kinds a caller enforces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementPolicy {
    active: BTreeSet<ViolationKind>,
}

impl EnforcementPolicy {
    /// Every kind in the taxonomy
    pub fn all() -> Self {
        Self::only(ViolationKind::ALL)
    }

    pub fn none() -> Self {
        Self {
            active: BTreeSet::new(),
        }
    }

    pub fn only(kinds: impl IntoIterator<Item = ViolationKind>) -> Self {
        Self {
            active: kinds.into_iter().collect(),
        }
    }

    /// Phone numbers and email addresses
    pub fn contact_sharing() -> Self {
        Self::only([ViolationKind::PhoneNumber, ViolationKind::Email])
    }

    pub fn with(mut self, kind: ViolationKind) -> Self {
        self.active.insert(kind);
        self
    }

    pub fn is_active(&self, kind: ViolationKind) -> bool {
        self.active.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Default for EnforcementPolicy {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = RuleTable::from_config(&PolicyConfig::default()).unwrap();
        let kinds: Vec<_> = table.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, ViolationKind::ALL.to_vec());
    }

    #[test]
    fn test_bare_digit_runs_ignore_word_neighbours() {
        let table = RuleTable::from_config(&PolicyConfig::default()).unwrap();
        let phone = &table.entry(ViolationKind::PhoneNumber).unwrap().rule;

        for text in ["ref5551234567", "5551234567x", "id_5551234567", "1234567890123456"] {
            assert!(phone.is_match(text), "{} should match", text);
        }
        assert_eq!(phone.find("id_5551234567")[0].text, "5551234567");
        assert!(!phone.is_match("order 123456789"));
    }

    #[test]
    fn test_keyword_entries_are_not_redacted() {
        let table = RuleTable::from_config(&PolicyConfig::default()).unwrap();

        for kind in [ViolationKind::PlatformMention, ViolationKind::OffPlatformRequest] {
            let entry = table.entry(kind).unwrap();
            assert!(entry.redaction.is_none());
            assert!(entry.mask.is_none());
        }
    }

    #[test]
    fn test_bare_domain_pattern_respects_allowlist() {
        let config = PolicyConfig {
            link_tlds: vec!["io".to_string()],
            ..PolicyConfig::default()
        };
        let table = RuleTable::from_config(&config).unwrap();
        let links = &table.entry(ViolationKind::ExternalLink).unwrap().rule;

        assert!(links.is_match("see mysite.io for details"));
        assert!(!links.is_match("see mysite.com for details"));
    }

    #[test]
    fn test_empty_tld_list_disables_bare_domains() {
        assert!(bare_domain_pattern(&[]).is_none());
        assert!(bare_domain_pattern(&[" ".to_string()]).is_none());
    }

    #[test]
    fn test_enforcement_policy() {
        let policy = EnforcementPolicy::contact_sharing();
        assert!(policy.is_active(ViolationKind::Email));
        assert!(!policy.is_active(ViolationKind::ExternalLink));

        let policy = policy.with(ViolationKind::ExternalLink);
        assert!(policy.is_active(ViolationKind::ExternalLink));
        assert!(EnforcementPolicy::none().is_empty());
    }
}
