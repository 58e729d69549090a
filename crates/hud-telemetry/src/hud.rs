//! Renderer-agnostic HUD model.
//!
//! Turns a raw snapshot into the numbers the overlay draws: pedal bar fractions
//! and the position of the g-force indicator inside its square panel. Drawing
//! itself belongs to the rendering host.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snapshot::TelemetrySnapshot;

/// Full-scale g values for the g-force panel. Readings beyond them pin the
/// indicator to the panel edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GForceRange {
    /// Lateral g mapped to the left/right edge.
    pub lat_max: f32,
    /// Longitudinal g mapped to the top/bottom edge.
    pub lon_max: f32,
}

impl Default for GForceRange {
    fn default() -> Self {
        Self {
            lat_max: 1.5,
            lon_max: 1.2,
        }
    }
}

impl GForceRange {
    /// Validate the range.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is not a positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lat_max.is_finite() && self.lat_max > 0.0) {
            return Err(ConfigError::invalid("gforce.lat_max must be positive"));
        }
        if !(self.lon_max.is_finite() && self.lon_max > 0.0) {
            return Err(ConfigError::invalid("gforce.lon_max must be positive"));
        }
        Ok(())
    }

    /// Normalize a reading into `[-1, 1]` on both axes.
    #[must_use]
    pub fn normalize(&self, gforce_lat: f32, gforce_lon: f32) -> GForcePoint {
        GForcePoint {
            x: (finite_or_zero(gforce_lat) / self.lat_max).clamp(-1.0, 1.0),
            y: (finite_or_zero(gforce_lon) / self.lon_max).clamp(-1.0, 1.0),
        }
    }
}

/// Indicator position relative to the panel centre, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GForcePoint {
    pub x: f32,
    pub y: f32,
}

/// Top-left corner of the indicator sprite inside the panel, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorPlacement {
    pub left: f32,
    pub top: f32,
    pub size: f32,
}

impl GForcePoint {
    /// Place the indicator inside a square panel of `panel_width` pixels.
    ///
    /// The indicator travels from the centre by at most half the panel minus
    /// half the (floored) indicator size, so it never leaves the panel.
    #[must_use]
    pub fn place(&self, panel_width: f32, indicator_size: f32) -> IndicatorPlacement {
        let center = panel_width / 2.0;
        let travel = (center - (indicator_size / 2.0).floor()).max(0.0);
        IndicatorPlacement {
            left: center + self.x * travel - indicator_size / 2.0,
            top: center + self.y * travel - indicator_size / 2.0,
            size: indicator_size,
        }
    }
}

/// Everything the overlay needs for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudModel {
    /// Throttle bar fill, `[0, 1]`.
    pub throttle: f32,
    /// Brake bar fill, `[0, 1]`.
    pub brake: f32,
    pub speed_kmh: f32,
    pub gforce: GForcePoint,
}

impl HudModel {
    #[must_use]
    pub fn from_snapshot(snapshot: &TelemetrySnapshot, range: &GForceRange) -> Self {
        Self {
            throttle: finite_or_zero(snapshot.throttle).clamp(0.0, 1.0),
            brake: finite_or_zero(snapshot.brake).clamp(0.0, 1.0),
            speed_kmh: finite_or_zero(snapshot.speed_kmh()).abs(),
            gforce: range.normalize(snapshot.gforce_lat, snapshot.gforce_lon),
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
