//! TutorGuard Core
//!
//! Core types shared across the TutorGuard trust & safety components.
//!
//! This crate provides:
//! - The ordinal severity model used to summarize policy violations
//! - Append-only records handed to the storage collaborator (incidents,
//!   notifications, messages, tutor applications)
//! - Error types and result handling

pub mod error;
pub mod records;
pub mod types;

pub use error::{Error, Result, StoreError};
pub use records::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationUpdate, Audience, Incident,
    IncidentKind, Message, Notification, Record,
};
pub use types::{truncate_chars, Severity};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result, StoreError};
    pub use crate::records::{
        ApplicationRecord, ApplicationStatus, Incident, Message, Notification, Record,
    };
    pub use crate::types::Severity;
}
