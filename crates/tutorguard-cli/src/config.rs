//! Layered CLI configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tutorguard_gate::{GateConfig, MessagingConfig};
use tutorguard_policy::PolicyConfig;
use tutorguard_scoring::ScoringPolicy;

/// Environment prefix; `TUTORGUARD__GATE__MIN_SCORE_FOR_AUTO_SUBMIT=80`
/// overrides `gate.min_score_for_auto_submit`
pub const ENV_PREFIX: &str = "TUTORGUARD";

const ENV_SEPARATOR: &str = "__";

/// Everything the CLI needs to build engines and gates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub scoring: ScoringPolicy,
    pub messaging: MessagingConfig,
    pub gate: GateConfig,
}

impl AppConfig {
    /// Load from an optional YAML file, overridden by `TUTORGUARD__*` variables
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::load_with_env(path, environment())
    }

    pub(crate) fn load_with_env(
        path: &Path,
        environment: config::Environment,
    ) -> anyhow::Result<Self> {
        let path_str = path
            .to_str()
            .with_context(|| format!("config path is not valid UTF-8: {}", path.display()))?;

        let settings = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("invalid TutorGuard configuration")
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .list_separator(",")
        .with_list_parse_key("messaging.blocked_keywords")
        .try_parsing(true)
}
