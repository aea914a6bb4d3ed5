//! TutorGuard Gates
//!
//! Side-effecting entry points over the pure policy and scoring crates:
//! - [`MessagingGate`] screens outbound chat messages and records incidents
//! - [`ApplicationGate`] routes scored tutor applications and applies admin
//!   review decisions
//!
//! Both hand their records to a [`tutorguard_telemetry::Store`] in batches,
//! so the decision and its side effects land together.

pub mod application;
pub mod messaging;

pub use application::{
    initial_status, review_transition, ApplicationGate, GateConfig, ReviewDecision,
};
pub use messaging::{
    MessageDisplay, MessageDraft, MessagingConfig, MessagingGate, SendOutcome,
    CONTACT_BLOCK_REASON, KEYWORD_BLOCK_REASON, LINK_BLOCK_REASON,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::application::{ApplicationGate, GateConfig, ReviewDecision};
    pub use crate::messaging::{
        MessageDisplay, MessageDraft, MessagingConfig, MessagingGate, SendOutcome,
    };
}
