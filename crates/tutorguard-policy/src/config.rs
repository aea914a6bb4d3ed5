//! Policy configuration
//!
//! Keyword lists, the link TLD allowlist, and redaction tokens are data, not
//! code: the defaults below can be overridden from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tutorguard_core::{Error, Result};

/// Configuration the rule table is compiled from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// The marketplace's own domain; links containing it are allowed
    pub platform_domain: String,

    /// Top-level domains recognized in bare `domain.tld` tokens
    pub link_tlds: Vec<String>,

    /// Third-party messaging and social apps
    pub platform_names: Vec<String>,

    /// Phrases signalling intent to contact, pay, or meet off-platform
    pub solicitation_phrases: Vec<String>,

    /// Minimum digits for a phone-shaped run to count
    pub min_phone_digits: usize,

    /// Replacement for phone and email spans in `sanitized_text`
    pub contact_token: String,

    /// Replacement for link spans (sanitizing and masking)
    pub link_token: String,

    /// Display placeholder for phone numbers
    pub phone_mask: String,

    /// Display placeholder for email addresses
    pub email_mask: String,
}

impl PolicyConfig {
    /// Load a policy configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid policy configuration: {}", e)))
    }

    /// Load a policy configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            platform_domain: "tutorguard.com".to_string(),
            link_tlds: to_strings(&[
                "com", "net", "org", "io", "co", "me", "ly", "gg", "app", "dev", "xyz", "info",
                "biz", "tv",
            ]),
            platform_names: to_strings(&[
                "whatsapp",
                "telegram",
                "skype",
                "discord",
                "snapchat",
                "instagram",
                "facebook",
                "messenger",
                "wechat",
                "viber",
                "kik",
                "imessage",
                "facetime",
                "google meet",
                "hangouts",
                "tiktok",
                "linkedin",
            ]),
            solicitation_phrases: to_strings(&[
                "call me",
                "text me",
                "email me",
                "dm me",
                "message me on",
                "contact me at",
                "contact me on",
                "reach me at",
                "reach me on",
                "add me on",
                "find me on",
                "my number",
                "my phone",
                "my email",
                "my personal",
                "pay outside",
                "pay me directly",
                "pay directly",
                "outside the platform",
                "outside this platform",
                "off the platform",
                "off-platform",
                "venmo",
                "paypal",
                "cash app",
                "cashapp",
                "zelle",
                "meet in person",
                "meet outside",
            ]),
            min_phone_digits: 7,
            contact_token: "[contact removed]".to_string(),
            link_token: "[link removed]".to_string(),
            phone_mask: "***-***-****".to_string(),
            email_mask: "****@****.***".to_string(),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
