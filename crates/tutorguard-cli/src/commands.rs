//! Subcommand implementations
//!
//! Each command returns its rendered output so `main` only decides where to
//! print it.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tutorguard_gate::{ApplicationGate, MessageDraft, MessagingGate, SendOutcome};
use tutorguard_policy::PolicyEngine;
use tutorguard_scoring::{ApplicationScorer, TutorApplication};
use tutorguard_telemetry::InMemoryStore;

use crate::config::AppConfig;

/// Name recorded when an application has no applicant name
const UNNAMED_APPLICANT: &str = "Unnamed applicant";

fn engine(config: &AppConfig) -> Result<PolicyEngine> {
    PolicyEngine::new(&config.policy).context("failed to compile policy rules")
}

pub fn check(config: &AppConfig, text: &str) -> Result<String> {
    let result = engine(config)?.check(text);
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn mask(config: &AppConfig, text: &str) -> Result<String> {
    Ok(engine(config)?.mask(text))
}

pub fn evaluate(config: &AppConfig, input: &Path) -> Result<String> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read application from {}", input.display()))?;
    let application: TutorApplication = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid tutor application", input.display()))?;
    evaluate_application(config, &application)
}

pub(crate) fn evaluate_application(
    config: &AppConfig,
    application: &TutorApplication,
) -> Result<String> {
    let scorer = ApplicationScorer::new(config.scoring.clone(), engine(config)?)
        .context("failed to compile scoring policy")?;
    let analysis = scorer.evaluate(application);

    let name = application.profile.name.trim();
    let name = if name.is_empty() { UNNAMED_APPLICANT } else { name };

    let gate = ApplicationGate::new(Arc::new(InMemoryStore::new()), config.gate.clone());
    let record = gate.submit(name, &analysis)?;
    info!(application = %record.id, status = %record.status, "Evaluated application");

    Ok(serde_json::to_string_pretty(&json!({
        "analysis": analysis,
        "application": record,
        "notifications": gate.store().notifications(),
    }))?)
}

pub fn send(config: &AppConfig, draft: MessageDraft) -> Result<String> {
    let gate = MessagingGate::with_engine(Arc::new(InMemoryStore::new()), engine(config)?);
    let outcome = gate.create_message(draft, &config.messaging)?;

    let display_body = match &outcome {
        SendOutcome::Delivered(message) => Some(gate.display_body(message, &config.messaging)),
        SendOutcome::Blocked { .. } => None,
    };

    let store = gate.store();
    Ok(serde_json::to_string_pretty(&json!({
        "outcome": outcome,
        "display_body": display_body,
        "records": {
            "messages": store.messages(),
            "incidents": store.incidents(),
            "notifications": store.notifications(),
        },
    }))?)
}

pub fn print_config(config: &AppConfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
