//! Prelude for dr2-hud-telemetry.
//!
//! Re-exports the types a render loop or host entry point usually needs.

pub use crate::config::{HudConfig, ReceiverConfig, StalenessConfig};
pub use crate::error::{ReceiverError, ReceiverResult};
pub use crate::hud::{GForceRange, HudModel};
pub use crate::processor::{LoopExit, ReceiverStats};
pub use crate::receiver::TelemetryReceiver;
pub use crate::snapshot::TelemetrySnapshot;
pub use crate::staleness::{FeedStatus, StalenessTracker};
pub use crate::store::TelemetryStore;
