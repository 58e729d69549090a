//! Shared, lock-guarded latest snapshot.

use parking_lot::Mutex;

use crate::snapshot::TelemetrySnapshot;

/// Holds the most recent snapshot.
///
/// Written by the receive loop, read by value from the render thread. The lock
/// is held only for the copy, so a reader sees either the whole previous write
/// or the whole next one, never a mix. Intermediate writes may be missed; the
/// last write wins.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    latest: Mutex<TelemetrySnapshot>,
}

impl TelemetryStore {
    /// Create a store holding the zero snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn write(&self, snapshot: TelemetrySnapshot) {
        *self.latest.lock() = snapshot;
    }

    /// Copy out the current snapshot.
    #[must_use]
    pub fn read(&self) -> TelemetrySnapshot {
        *self.latest.lock()
    }

    /// Replace the current snapshot with zero.
    pub fn reset(&self) {
        self.write(TelemetrySnapshot::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_reads_zero() {
        assert!(TelemetryStore::new().read().is_zero());
    }

    #[test]
    fn test_write_then_read() {
        let store = TelemetryStore::new();
        let snap = TelemetrySnapshot::uniform(3.0);
        store.write(snap);
        assert_eq!(store.read(), snap);
    }

    #[test]
    fn test_last_write_wins() {
        let store = TelemetryStore::new();
        store.write(TelemetrySnapshot::uniform(1.0));
        store.write(TelemetrySnapshot::uniform(2.0));
        assert_eq!(store.read(), TelemetrySnapshot::uniform(2.0));
    }

    #[test]
    fn test_reset_clears() {
        let store = TelemetryStore::new();
        store.write(TelemetrySnapshot::uniform(9.0));
        store.reset();
        assert!(store.read().is_zero());
    }
}
