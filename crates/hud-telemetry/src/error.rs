//! Error types for the telemetry receiver.
//!
//! Lifecycle failures (`start`/`stop`) are reported synchronously through
//! [`ReceiverError`]. Packet-level failures never leave the receive loop; they
//! are folded into [`DecodeError`] and ultimately a [`crate::LoopExit`].

use std::fmt;
use std::io;

use thiserror::Error;

/// The socket setup step that failed inside `start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketStage {
    /// Creating and binding the UDP socket on the loopback address.
    Bind,
    /// Applying the receive timeout.
    Configure,
    /// Duplicating the handle used to wake the receive loop on shutdown.
    WakeHandle,
}

impl fmt::Display for SocketStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketStage::Bind => write!(f, "bind"),
            SocketStage::Configure => write!(f, "configure"),
            SocketStage::WakeHandle => write!(f, "wake handle"),
        }
    }
}

/// Errors reported by [`crate::TelemetryReceiver::start`] and
/// [`crate::TelemetryReceiver::stop`].
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// `start()` was called while a receive loop is already running.
    #[error("telemetry receiver already started")]
    AlreadyStarted,

    /// `stop()` was called without a prior successful `start()`.
    #[error("telemetry receiver not started")]
    NotStarted,

    /// The UDP socket could not be created, configured or bound.
    #[error("telemetry socket {stage} failed: {source}")]
    SocketInit {
        /// Setup step that failed.
        stage: SocketStage,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The background receive thread could not be spawned.
    #[error("failed to spawn telemetry receive thread: {0}")]
    ThreadSpawn(#[source] io::Error),
}

impl ReceiverError {
    /// Create a socket initialization error for the given stage.
    #[must_use]
    pub fn socket_init(stage: SocketStage, source: io::Error) -> Self {
        Self::SocketInit { stage, source }
    }
}

/// A datagram that could not be decoded into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The datagram is not exactly one Mode 1 record long.
    #[error("invalid packet size: expected {expected} bytes, got {actual}")]
    WrongSize {
        /// Required record length.
        expected: usize,
        /// Length of the received datagram.
        actual: usize,
    },
}

/// Configuration values rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

/// A specialized `Result` type for receiver lifecycle operations.
pub type ReceiverResult<T> = std::result::Result<T, ReceiverError>;
