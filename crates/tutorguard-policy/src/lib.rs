//! TutorGuard Policy Engine
//!
//! Deterministic text-policy checks for contact-information leakage and
//! off-platform solicitation.
//!
//! Detection is driven by one shared [`RuleTable`]:
//! - Phone-shaped runs and email addresses (high severity, redacted)
//! - External links outside the platform domain (medium, redacted)
//! - Third-party app mentions (medium, detected only)
//! - Off-platform solicitation phrases (high, detected only)
//!
//! Any detection blocks. Callers that enforce a subset of the taxonomy pass
//! an [`EnforcementPolicy`] rather than keeping their own detectors.

pub mod config;
pub mod engine;
mod redact;
pub mod rule;
pub mod table;
pub mod violation;

pub use config::PolicyConfig;
pub use engine::{
    block_message, check_policy, default_engine, mask_sensitive_content, PolicyEngine,
    HIGH_SEVERITY_BLOCK_MESSAGE, STANDARD_BLOCK_MESSAGE,
};
pub use rule::{sentence_count, KeywordSet, RuleMatch, RuleSpec, ShapePattern, TextRule};
pub use table::{EnforcementPolicy, RuleEntry, RuleTable};
pub use violation::{PolicyCheckResult, PolicyViolation, ViolationKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::PolicyConfig;
    pub use crate::engine::{block_message, check_policy, mask_sensitive_content, PolicyEngine};
    pub use crate::rule::{RuleSpec, TextRule};
    pub use crate::table::EnforcementPolicy;
    pub use crate::violation::{PolicyCheckResult, PolicyViolation, ViolationKind};
}
