//! TutorGuard Telemetry
//!
//! Storage and metrics collaborators for the TutorGuard gates.
//!
//! Provides:
//! - The [`Store`] contract the gates append records through
//! - An in-memory store applying each batch atomically
//! - Metric names and recording helpers for the `metrics` facade

pub mod metrics;
pub mod store;

pub use store::{InMemoryStore, Store, StoreResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::store::{InMemoryStore, Store, StoreResult};
}
