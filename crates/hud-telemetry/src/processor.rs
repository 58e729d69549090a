//! Per-datagram handling for the receive loop.
//!
//! Kept free of sockets so the invalid-packet policy can be driven directly.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{error, warn};

use crate::packet::decode_packet;
use crate::store::TelemetryStore;

/// Why a receive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Cancelled by `stop()` or the socket reported end of stream.
    Shutdown,
    /// The blocking receive was interrupted during shutdown.
    Aborted,
    /// The receive failed for any other reason.
    ReceiveFailed(io::ErrorKind),
    /// Too many consecutive wrong-sized datagrams; the peer is not speaking Mode 1.
    TooManyInvalidPackets { count: u32 },
    /// The receive thread panicked.
    Panicked,
}

impl LoopExit {
    /// Returns `true` for exits that indicate a problem rather than a requested shutdown.
    #[must_use]
    pub fn is_failure(self) -> bool {
        !matches!(self, LoopExit::Shutdown | LoopExit::Aborted)
    }
}

impl fmt::Display for LoopExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopExit::Shutdown => write!(f, "shutdown"),
            LoopExit::Aborted => write!(f, "receive aborted"),
            LoopExit::ReceiveFailed(kind) => write!(f, "receive failed: {kind}"),
            LoopExit::TooManyInvalidPackets { count } => {
                write!(f, "{count} consecutive invalid packets")
            }
            LoopExit::Panicked => write!(f, "receive thread panicked"),
        }
    }
}

/// Result of handling one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatagramOutcome {
    /// Decoded and published to the store.
    Decoded,
    /// Dropped for having the wrong size.
    Skipped { consecutive: u32 },
    /// Dropped, and the consecutive-invalid threshold was reached.
    Exhausted(LoopExit),
}

/// Counters shared between the receive loop and the service.
#[derive(Debug, Default)]
pub struct ReceiverCounters {
    decoded: AtomicU64,
    skipped: AtomicU64,
}

impl ReceiverCounters {
    #[must_use]
    pub fn snapshot(&self) -> ReceiverStats {
        ReceiverStats {
            decoded: self.decoded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time datagram counts for one receiver lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub decoded: u64,
    pub skipped: u64,
}

/// Applies the size check, decode and invalid-packet threshold.
#[derive(Debug)]
pub struct PacketProcessor {
    store: Arc<TelemetryStore>,
    counters: Arc<ReceiverCounters>,
    max_invalid: u32,
    consecutive_invalid: u32,
}

impl PacketProcessor {
    #[must_use]
    pub fn new(
        store: Arc<TelemetryStore>,
        counters: Arc<ReceiverCounters>,
        max_invalid: u32,
    ) -> Self {
        Self {
            store,
            counters,
            max_invalid: max_invalid.max(1),
            consecutive_invalid: 0,
        }
    }

    /// Consecutive wrong-sized datagrams seen so far.
    #[must_use]
    pub fn consecutive_invalid(&self) -> u32 {
        self.consecutive_invalid
    }

    pub fn handle_datagram(&mut self, data: &[u8]) -> DatagramOutcome {
        match decode_packet(data) {
            Ok(snapshot) => {
                self.store.write(snapshot);
                self.consecutive_invalid = 0;
                self.counters.decoded.fetch_add(1, Ordering::Relaxed);
                DatagramOutcome::Decoded
            }
            Err(err) => {
                self.consecutive_invalid = self.consecutive_invalid.saturating_add(1);
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                if self.consecutive_invalid >= self.max_invalid {
                    error!(
                        count = self.consecutive_invalid,
                        "Too many consecutive invalid DiRT Rally 2.0 packets, stopping receiver"
                    );
                    return DatagramOutcome::Exhausted(LoopExit::TooManyInvalidPackets {
                        count: self.consecutive_invalid,
                    });
                }
                warn!(error = %err, "Dropping invalid DiRT Rally 2.0 packet");
                DatagramOutcome::Skipped {
                    consecutive: self.consecutive_invalid,
                }
            }
        }
    }
}
