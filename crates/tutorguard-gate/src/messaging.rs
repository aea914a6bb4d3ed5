//! Messaging gate
//!
//! Screens outbound chat messages through the shared rule table in a fixed
//! priority order (contact details, then links, then blocked keywords). The
//! first matching control blocks the send; a blocked send records one
//! incident and one admin notification and never persists the message.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tutorguard_core::{Incident, IncidentKind, Message, Notification, Record, Result, Severity};
use tutorguard_policy::{PolicyEngine, TextRule, ViolationKind};
use tutorguard_telemetry::metrics::{self, SendOutcomeLabel};
use tutorguard_telemetry::Store;

/// Reason returned when contact details are blocked
pub const CONTACT_BLOCK_REASON: &str =
    "Sharing phone numbers or email addresses is not allowed. Please keep communication on the platform.";

/// Reason returned when an external link is blocked
pub const LINK_BLOCK_REASON: &str = "External links are not allowed in messages.";

/// Reason returned when a configured keyword is blocked
pub const KEYWORD_BLOCK_REASON: &str =
    "This message contains content that violates our community guidelines.";

/// Per-call messaging controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Mask phones, emails, and links when rendering delivered messages
    pub mask_phone_email: bool,

    pub block_phone_email_sharing: bool,

    pub block_external_links: bool,

    /// Case-insensitive substrings that block a message
    pub blocked_keywords: Vec<String>,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            mask_phone_email: true,
            block_phone_email_sharing: true,
            block_external_links: true,
            blocked_keywords: Vec::new(),
        }
    }
}

/// Message about to be sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub body: String,
}

impl MessageDraft {
    pub fn new(
        conversation_id: impl Into<String>,
        sender_id: impl Into<String>,
        recipient_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            body: body.into(),
        }
    }
}

/// Result of a send attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Delivered(Message),
    Blocked { reason: String, incident_id: String },
}

impl SendOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SendOutcome::Blocked { .. })
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            SendOutcome::Delivered(message) => Some(message),
            SendOutcome::Blocked { .. } => None,
        }
    }
}

/// Control that tripped, with the incident it records
struct BlockDecision {
    kind: IncidentKind,
    severity: Severity,
    reason: &'static str,
}

/// Read-path rendering of persisted messages
pub trait MessageDisplay {
    /// Body as shown to users under `config`, masked with `engine`'s rules
    fn display_body(&self, engine: &PolicyEngine, config: &MessagingConfig) -> String;
}

impl MessageDisplay for Message {
    fn display_body(&self, engine: &PolicyEngine, config: &MessagingConfig) -> String {
        if config.mask_phone_email {
            engine.mask(&self.body)
        } else {
            self.body.clone()
        }
    }
}

/// Screens and persists outbound messages
pub struct MessagingGate<S: Store> {
    store: Arc<S>,
    engine: PolicyEngine,
}

impl<S: Store> MessagingGate<S> {
    /// Gate using the built-in policy rules
    pub fn new(store: Arc<S>) -> Self {
        Self::with_engine(store, PolicyEngine::default())
    }

    pub fn with_engine(store: Arc<S>, engine: PolicyEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Render `message` with the same rules that screened it
    pub fn display_body(&self, message: &Message, config: &MessagingConfig) -> String {
        message.display_body(&self.engine, config)
    }

    /// Screen `draft` and persist the outcome's records as one batch
    pub fn create_message(
        &self,
        draft: MessageDraft,
        config: &MessagingConfig,
    ) -> Result<SendOutcome> {
        match self.decide(&draft.body, config)? {
            Some(decision) => self.block(draft, decision),
            None => self.deliver(draft),
        }
    }

    fn decide(&self, body: &str, config: &MessagingConfig) -> Result<Option<BlockDecision>> {
        if config.block_phone_email_sharing
            && self
                .engine
                .detects(body, &[ViolationKind::PhoneNumber, ViolationKind::Email])
        {
            return Ok(Some(BlockDecision {
                kind: IncidentKind::ContactShareAttempt,
                severity: Severity::High,
                reason: CONTACT_BLOCK_REASON,
            }));
        }

        if config.block_external_links && self.engine.detects(body, &[ViolationKind::ExternalLink])
        {
            return Ok(Some(BlockDecision {
                kind: IncidentKind::ExternalLinkAttempt,
                severity: Severity::Medium,
                reason: LINK_BLOCK_REASON,
            }));
        }

        let keywords = TextRule::keywords(config.blocked_keywords.iter().map(String::as_str))?;
        if keywords.is_match(body) {
            return Ok(Some(BlockDecision {
                kind: IncidentKind::PolicyViolation,
                severity: Severity::Medium,
                reason: KEYWORD_BLOCK_REASON,
            }));
        }

        Ok(None)
    }

    fn block(&self, draft: MessageDraft, decision: BlockDecision) -> Result<SendOutcome> {
        let incident = Incident::new(
            decision.kind,
            decision.severity,
            &draft.sender_id,
            &draft.body,
        );
        let incident_id = incident.id.clone();
        let notification = Notification::admin(
            "Message blocked",
            format!(
                "A message from {} in conversation {} was blocked ({}).",
                draft.sender_id, draft.conversation_id, decision.kind
            ),
        );

        self.store.append_batch(vec![
            Record::Incident(incident),
            Record::Notification(notification),
        ])?;

        warn!(
            sender = %draft.sender_id,
            conversation = %draft.conversation_id,
            kind = %decision.kind,
            severity = ?decision.severity,
            "Blocked outbound message"
        );
        metrics::record_message(SendOutcomeLabel::Blocked);
        metrics::record_incident(decision.kind);

        Ok(SendOutcome::Blocked {
            reason: decision.reason.to_string(),
            incident_id,
        })
    }

    fn deliver(&self, draft: MessageDraft) -> Result<SendOutcome> {
        let message = Message::new(
            draft.conversation_id,
            draft.sender_id,
            draft.recipient_id,
            draft.body,
        );
        self.store.append(Record::Message(message.clone()))?;

        debug!(message = %message.id, "Persisted message");
        info!(
            sender = %message.sender_id,
            conversation = %message.conversation_id,
            "Delivered message"
        );
        metrics::record_message(SendOutcomeLabel::Delivered);

        Ok(SendOutcome::Delivered(message))
    }
}
