//! Receiver, staleness and HUD configuration.
//!
//! Defaults match the game's out-of-the-box UDP settings. Values can be
//! overridden from a YAML file ([`HudConfig::load`]) and, for the receiver,
//! from environment variables ([`ReceiverConfig::from_env`]).

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hud::GForceRange;

/// Default UDP port DiRT Rally 2.0 sends telemetry to.
pub const DEFAULT_PORT: u16 = 20777;

/// One hour. The receive timeout only exists so a stuck receive can re-check
/// for cancellation; shutdown itself wakes the socket directly.
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Consecutive wrong-sized datagrams tolerated before the loop gives up.
pub const DEFAULT_MAX_INVALID_PACKETS: u32 = 10;

/// Wall-clock time without a new `time` value before the feed is stale.
pub const DEFAULT_STALE_TIMEOUT_MS: u64 = 5_000;

const ENV_PORT: &str = "DR2_HUD_UDP_PORT";
const ENV_MAX_INVALID_PACKETS: &str = "DR2_HUD_MAX_INVALID_PACKETS";

/// Settings for [`crate::TelemetryReceiver`].
///
/// The address is always the IPv4 loopback; only the port is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// UDP port to bind. `0` picks an ephemeral port.
    pub port: u16,
    /// Socket receive timeout (milliseconds).
    pub receive_timeout_ms: u64,
    /// Consecutive invalid datagrams before the receive loop exits.
    pub max_invalid_packets: u32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_MS,
            max_invalid_packets: DEFAULT_MAX_INVALID_PACKETS,
        }
    }
}

impl ReceiverConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparseable or zero values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup(ENV_PORT)
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|&p| p > 0)
        {
            self.port = port;
        }
        if let Some(max) = lookup(ENV_MAX_INVALID_PACKETS)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&m| m > 0)
        {
            self.max_invalid_packets = max;
        }
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout or the invalid-packet threshold is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.receive_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "receive_timeout_ms must be greater than 0",
            ));
        }
        if self.max_invalid_packets == 0 {
            return Err(ConfigError::invalid(
                "max_invalid_packets must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Loopback address the socket binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, self.port))
    }

    /// Receive timeout as a `Duration`.
    #[must_use]
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ReceiverConfigBuilder {
        ReceiverConfigBuilder::default()
    }
}

/// Builder for `ReceiverConfig`.
#[derive(Debug, Default)]
pub struct ReceiverConfigBuilder {
    config: ReceiverConfig,
}

impl ReceiverConfigBuilder {
    /// Set the UDP port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the receive timeout.
    #[must_use]
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.config.receive_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the consecutive invalid-packet threshold.
    #[must_use]
    pub fn max_invalid_packets(mut self, max: u32) -> Self {
        self.config.max_invalid_packets = max;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<ReceiverConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Consumer-side staleness policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StalenessConfig {
    /// Milliseconds without a new `time` value before the feed is stale.
    pub timeout_ms: u64,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_STALE_TIMEOUT_MS,
        }
    }
}

impl StalenessConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Complete overlay configuration, as read from YAML.
///
/// ```yaml
/// receiver:
///   port: 20777
/// staleness:
///   timeout_ms: 5000
/// gforce:
///   lat_max: 1.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub receiver: ReceiverConfig,
    pub staleness: StalenessConfig,
    pub gforce: GForceRange,
}

impl HudConfig {
    /// Parse and validate a YAML document. Missing sections use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_yaml::from_str(raw).context("Failed to parse HUD configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read HUD configuration at {:?}", path.as_ref())
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first section error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.receiver.validate()?;
        if self.staleness.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "staleness.timeout_ms must be greater than 0",
            ));
        }
        self.gforce.validate()
    }
}
