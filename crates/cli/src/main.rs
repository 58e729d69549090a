//! dr2hud - DiRT Rally 2.0 telemetry HUD console host
//!
//! Runs the telemetry receiver outside the game overlay: `monitor` polls the
//! latest snapshot once per frame exactly like the overlay's draw callback,
//! and `emit` feeds synthetic packets to a running receiver.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dr2_hud_telemetry::HudConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{EmitArgs, MonitorArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "dr2hud")]
#[command(about = "DiRT Rally 2.0 telemetry HUD - receive and inspect UDP telemetry")]
#[command(version)]
struct Cli {
    /// Output format (human-readable or JSON lines)
    #[arg(long, global = true, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true, env = "DR2_HUD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for telemetry and print the HUD once per frame
    Monitor(MonitorArgs),

    /// Send synthetic telemetry packets to a listening receiver
    Emit(EmitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("dr2hud={log_level},dr2_hud_telemetry={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match execute_command(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = match e.downcast_ref::<CliError>() {
                Some(CliError::ReceiverFailed(_)) => 2,
                Some(CliError::InvalidConfiguration(_)) => 3,
                None => 1,
            };

            std::process::exit(exit_code);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    match &cli.command {
        Commands::Monitor(args) => commands::monitor::execute(args, &config, cli.json).await,
        Commands::Emit(args) => {
            commands::emit::execute(args, config.receiver.port, cli.json).await
        }
    }
}

/// Load the YAML config if given, then apply environment overrides.
fn load_config(path: Option<&PathBuf>) -> Result<HudConfig> {
    let mut config = match path {
        Some(path) => HudConfig::load(path)
            .map_err(|e| CliError::InvalidConfiguration(format!("{e:#}")))?,
        None => HudConfig::default(),
    };
    config.receiver = config
        .receiver
        .with_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
