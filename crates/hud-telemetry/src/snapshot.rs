//! The telemetry record handed from the receive loop to the overlay.

use serde::{Deserialize, Serialize};

/// One fully decoded telemetry record.
///
/// A snapshot is either the zero default (nothing received yet) or the complete
/// decode of a single size-valid packet. Values are kept exactly as the game
/// sent them; range clamping happens in [`crate::hud`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Session time in seconds, monotonic per source.
    pub time: f32,
    /// Vehicle speed in m/s.
    pub speed: f32,
    /// Throttle pedal, nominally `[0, 1]`.
    pub throttle: f32,
    /// Steering input, nominally `[-1, 1]`.
    pub steer: f32,
    /// Brake pedal, nominally `[0, 1]`.
    pub brake: f32,
    /// Lateral acceleration in g.
    pub gforce_lat: f32,
    /// Longitudinal acceleration in g.
    pub gforce_lon: f32,
}

impl TelemetrySnapshot {
    /// The snapshot observed before any packet arrives.
    pub const ZERO: Self = Self {
        time: 0.0,
        speed: 0.0,
        throttle: 0.0,
        steer: 0.0,
        brake: 0.0,
        gforce_lat: 0.0,
        gforce_lon: 0.0,
    };

    /// A snapshot with every field set to `value`.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self {
            time: value,
            speed: value,
            throttle: value,
            steer: value,
            brake: value,
            gforce_lat: value,
            gforce_lon: value,
        }
    }

    /// Returns `true` if no field carries data (bitwise zero, so `-0.0` counts as data).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fields().iter().all(|v| v.to_bits() == 0)
    }

    /// Field values in wire order.
    #[must_use]
    pub fn fields(&self) -> [f32; 7] {
        [
            self.time,
            self.speed,
            self.throttle,
            self.steer,
            self.brake,
            self.gforce_lat,
            self.gforce_lon,
        ]
    }

    /// Speed converted to km/h for display.
    #[must_use]
    pub fn speed_kmh(&self) -> f32 {
        self.speed * 3.6
    }
}
