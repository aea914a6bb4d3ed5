//! TutorGuard CLI
//!
//! Operator entry point for the trust & safety core: policy checks, display
//! masking, application scoring, and message gating against an in-memory
//! store.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tutorguard_gate::MessageDraft;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);
    tutorguard_telemetry::metrics::describe_metrics();

    let config = AppConfig::load(&cli.config)?;
    debug!(path = %cli.config.display(), "Configuration loaded");

    let output = match cli.command {
        Commands::Check { text } => commands::check(&config, &text)?,
        Commands::Mask { text } => commands::mask(&config, &text)?,
        Commands::Evaluate { input } => commands::evaluate(&config, &input)?,
        Commands::Send {
            from,
            to,
            body,
            conversation,
        } => commands::send(&config, MessageDraft::new(conversation, from, to, body))?,
        Commands::PrintConfig => commands::print_config(&config)?,
    };

    println!("{}", output);
    Ok(())
}

/// Initialize tracing/logging on stderr so stdout stays machine-readable
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tutorguard=debug")
    } else {
        EnvFilter::try_from_env("TUTORGUARD_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("tutorguard=warn"))
    };

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
