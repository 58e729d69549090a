//! Consumer-side feed staleness detection.
//!
//! The receiver never decides whether its data is too old to show; the render
//! loop does, once per frame, by watching the snapshot's `time` field.

use std::time::{Duration, Instant};

use crate::config::StalenessConfig;

/// Whether the overlay should draw this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// `time` changed recently, or the overlay was just activated.
    Live,
    /// `time` has not changed for longer than the timeout.
    Stale,
}

impl FeedStatus {
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, FeedStatus::Live)
    }
}

/// Tracks the last observed `time` value and when it last changed.
#[derive(Debug, Clone)]
pub struct StalenessTracker {
    timeout: Duration,
    last_time_bits: u32,
    last_change: Option<Instant>,
}

impl Default for StalenessTracker {
    fn default() -> Self {
        Self::new(&StalenessConfig::default())
    }
}

impl StalenessTracker {
    #[must_use]
    pub fn new(config: &StalenessConfig) -> Self {
        Self {
            timeout: config.timeout(),
            last_time_bits: 0.0f32.to_bits(),
            last_change: None,
        }
    }

    /// Mark the overlay as just enabled. The feed counts as live for one full
    /// timeout so the overlay is visible even before data arrives.
    pub fn activate(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Forget activation; the next [`observe`](Self::observe) re-activates.
    pub fn deactivate(&mut self) {
        self.last_change = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.last_change.is_some()
    }

    /// Record the `time` seen this frame and classify the feed.
    ///
    /// `time` is compared bitwise, so any change at all counts as new data.
    pub fn observe(&mut self, time: f32, now: Instant) -> FeedStatus {
        let Some(last_change) = self.last_change else {
            self.activate(now);
            self.last_time_bits = time.to_bits();
            return FeedStatus::Live;
        };

        if time.to_bits() != self.last_time_bits {
            self.last_time_bits = time.to_bits();
            self.last_change = Some(now);
            return FeedStatus::Live;
        }

        if now.saturating_duration_since(last_change) > self.timeout {
            FeedStatus::Stale
        } else {
            FeedStatus::Live
        }
    }

    /// How long `time` has been unchanged, if activated.
    #[must_use]
    pub fn unchanged_for(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|last| now.saturating_duration_since(last))
    }
}
