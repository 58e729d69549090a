//! # dr2-hud-telemetry
//!
//! Live DiRT Rally 2.0 telemetry for an in-game HUD overlay.
//!
//! The game streams Codemasters Mode 1 UDP packets to `127.0.0.1:20777`. A
//! [`TelemetryReceiver`] listens on a background thread, decodes each 264-byte
//! packet into a [`TelemetrySnapshot`] and publishes it to a shared
//! [`TelemetryStore`]. The render loop copies the latest snapshot once per frame,
//! decides for itself whether the feed is stale ([`StalenessTracker`]) and turns
//! the snapshot into drawable numbers ([`HudModel`]).
//!
//! ## Architecture
//!
//! - [`receiver`] - socket lifecycle and the receive thread
//! - [`processor`] - per-datagram size check, decode and invalid-packet policy
//! - [`packet`] - Mode 1 field layout and decoding
//! - [`store`] - lock-guarded latest snapshot
//! - [`staleness`] - consumer-side feed staleness
//! - [`hud`] - pedal bars and g-force indicator placement
//! - [`config`] - receiver, staleness and HUD settings
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use dr2_hud_telemetry::prelude::*;
//! use std::time::Instant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let receiver = TelemetryReceiver::new(ReceiverConfig::from_env());
//! receiver.start()?;
//!
//! let mut staleness = StalenessTracker::default();
//! let snapshot = receiver.copy_latest();
//! if staleness.observe(snapshot.time, Instant::now()).is_live() {
//!     let hud = HudModel::from_snapshot(&snapshot, &GForceRange::default());
//!     println!("throttle {:.0}%", hud.throttle * 100.0);
//! }
//!
//! receiver.stop()?;
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_debug_implementations
)]

pub mod config;
pub mod error;
pub mod hud;
pub mod packet;
pub mod processor;
pub mod receiver;
pub mod snapshot;
pub mod staleness;
pub mod store;

pub mod prelude;

pub use config::{HudConfig, ReceiverConfig, ReceiverConfigBuilder, StalenessConfig};
pub use error::{ConfigError, DecodeError, ReceiverError, ReceiverResult, SocketStage};
pub use hud::{GForcePoint, GForceRange, HudModel, IndicatorPlacement};
pub use packet::{PACKET_SIZE, decode_packet, encode_packet};
pub use processor::{DatagramOutcome, LoopExit, PacketProcessor, ReceiverCounters, ReceiverStats};
pub use receiver::{CancelToken, TelemetryReceiver};
pub use snapshot::TelemetrySnapshot;
pub use staleness::{FeedStatus, StalenessTracker};
pub use store::TelemetryStore;
