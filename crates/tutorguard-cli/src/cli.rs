use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tutorguard")]
#[command(
    author,
    version,
    about = "Run TutorGuard policy checks, scoring, and gates from the terminal"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path (YAML); missing files fall back to defaults
    #[arg(short, long, global = true, default_value = "tutorguard.yaml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "TUTORGUARD_LOG_JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check text against the policy rules and print the result as JSON
    Check {
        /// Text to check
        text: String,
    },

    /// Print text with phones, emails, and links masked for display
    Mask {
        /// Text to mask
        text: String,
    },

    /// Score a tutor application and route it through the application gate
    Evaluate {
        /// JSON file holding `{"profile": ..., "skill_check": ...}`
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Send a message through the messaging gate
    Send {
        /// Sender user id
        #[arg(long)]
        from: String,

        /// Recipient user id
        #[arg(long)]
        to: String,

        /// Message body
        #[arg(long)]
        body: String,

        /// Conversation id
        #[arg(long, default_value = "cli")]
        conversation: String,
    },

    /// Print the effective configuration as YAML
    PrintConfig,
}
