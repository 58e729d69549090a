//! Error types for dr2hud CLI

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Telemetry receiver stopped: {0}")]
    ReceiverFailed(String),
}
