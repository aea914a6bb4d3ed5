//! Policy evaluation engine

use std::sync::OnceLock;
use tracing::debug;
use tutorguard_core::{Result, Severity};

use crate::config::PolicyConfig;
use crate::redact::{apply_replacements, Replacement};
use crate::rule::RuleMatch;
use crate::table::{EnforcementPolicy, RuleEntry, RuleTable};
use crate::violation::{has_high_severity, PolicyCheckResult, PolicyViolation, ViolationKind};

/// Shown when any violation is high severity (contact details, solicitation)
pub const HIGH_SEVERITY_BLOCK_MESSAGE: &str = "This message was blocked because it appears to share contact details or arrange communication or payment outside the platform. Please keep all conversations and payments on the platform.";

/// Shown for every other blocked result (links, app mentions)
pub const STANDARD_BLOCK_MESSAGE: &str = "This message was blocked because it contains external links or references to other apps. Please keep communication on the platform.";

static DEFAULT_ENGINE: OnceLock<PolicyEngine> = OnceLock::new();

/// Process-wide engine compiled from [`PolicyConfig::default`]
pub fn default_engine() -> &'static PolicyEngine {
    DEFAULT_ENGINE.get_or_init(|| {
        PolicyEngine::new(&PolicyConfig::default()).expect("built-in policy rules must compile")
    })
}

/// Check text against every category using the built-in rules
pub fn check_policy(text: &str) -> PolicyCheckResult {
    default_engine().check(text)
}

/// Display-time masking using the built-in rules
pub fn mask_sensitive_content(text: &str) -> String {
    default_engine().mask(text)
}

/// One of two canned explanations, chosen by whether any violation is high
/// severity
pub fn block_message(violations: &[PolicyViolation]) -> &'static str {
    if has_high_severity(violations) {
        HIGH_SEVERITY_BLOCK_MESSAGE
    } else {
        STANDARD_BLOCK_MESSAGE
    }
}

/// Matches of one table entry
struct Detection<'e, 't> {
    entry: &'e RuleEntry,
    matches: Vec<RuleMatch<'t>>,
}

/// Stateless evaluator over an immutable rule table
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    table: RuleTable,
}

impl PolicyEngine {
    /// Compile the standard table from configuration
    pub fn new(config: &PolicyConfig) -> Result<Self> {
        Ok(Self::with_table(RuleTable::from_config(config)?))
    }

    pub fn with_table(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Check text against every violation kind
    pub fn check(&self, text: &str) -> PolicyCheckResult {
        self.check_with(text, &EnforcementPolicy::all())
    }

    /// Check text against the kinds active in `enforcement`.
    ///
    /// Every active detector runs against the full text; any detection
    /// blocks.
    pub fn check_with(&self, text: &str, enforcement: &EnforcementPolicy) -> PolicyCheckResult {
        if text.is_empty() || enforcement.is_empty() {
            return PolicyCheckResult::clean(text);
        }

        let detections = self.scan(text, enforcement);

        let mut violations = Vec::new();
        let mut replacements = Vec::new();
        for detection in &detections {
            let mut reported: Vec<&str> = Vec::new();
            for mat in &detection.matches {
                if let Some(token) = detection.entry.redaction.as_deref() {
                    replacements.push(Replacement {
                        start: mat.start,
                        end: mat.end,
                        token,
                    });
                }
                if reported.contains(&mat.text) {
                    continue;
                }
                reported.push(mat.text);
                violations.push(PolicyViolation::new(
                    detection.entry.kind,
                    mat.text,
                    detection.entry.severity,
                ));
            }
        }

        if violations.is_empty() {
            return PolicyCheckResult::clean(text);
        }

        let severity = Severity::max_of(violations.iter().map(|v| v.severity));
        debug!(
            violations = violations.len(),
            severity = %severity,
            "policy check detected violations"
        );

        PolicyCheckResult {
            blocked: true,
            sanitized_text: apply_replacements(text, replacements),
            violations,
            severity,
        }
    }

    /// Whether any of `kinds` is present in `text`
    pub fn detects(&self, text: &str, kinds: &[ViolationKind]) -> bool {
        let enforcement = EnforcementPolicy::only(kinds.iter().copied());
        self.check_with(text, &enforcement).blocked
    }

    /// Obfuscate phones, emails, and links for display.
    ///
    /// Unlike `sanitized_text`, this is a read-path rendering and has no
    /// bearing on blocking.
    pub fn mask(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let detections = self.scan(text, &EnforcementPolicy::all());
        let replacements = detections
            .iter()
            .filter_map(|detection| {
                detection
                    .entry
                    .mask
                    .as_deref()
                    .map(|token| (token, &detection.matches))
            })
            .flat_map(|(token, matches)| {
                matches.iter().map(move |mat| Replacement {
                    start: mat.start,
                    end: mat.end,
                    token,
                })
            })
            .collect();

        apply_replacements(text, replacements)
    }

    fn scan<'e, 't>(
        &'e self,
        text: &'t str,
        enforcement: &EnforcementPolicy,
    ) -> Vec<Detection<'e, 't>> {
        let mut detections = Vec::new();

        for entry in self.table.entries() {
            if !enforcement.is_active(entry.kind) {
                continue;
            }

            let mut matches = entry.rule.find(text);
            if !entry.skip_inside.is_empty() {
                let shadows = self.spans_of(text, &entry.skip_inside);
                matches.retain(|mat| !shadows.iter().any(|outer| outer.contains(mat)));
            }

            if !matches.is_empty() {
                detections.push(Detection { entry, matches });
            }
        }

        detections
    }

    fn spans_of<'t>(&self, text: &'t str, kinds: &[ViolationKind]) -> Vec<RuleMatch<'t>> {
        self.table
            .entries()
            .iter()
            .filter(|entry| kinds.contains(&entry.kind))
            .flat_map(|entry| entry.rule.find(text))
            .collect()
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        default_engine().clone()
    }
}
