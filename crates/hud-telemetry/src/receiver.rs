//! The UDP telemetry receiver service.
//!
//! One [`TelemetryReceiver`] is built by the hosting entry point and shared by
//! reference. `start()` binds the loopback socket and spawns the receive
//! thread; `stop()` cancels it and joins it. The thread never sees the service
//! itself, only the store, its counters and a cancellation token, so it cannot
//! end up joining itself.
//!
//! `start()` and `stop()` are serialized by a lifecycle lock that `stop()`
//! holds until the thread is joined. A `start()` racing a `stop()` waits for
//! the old socket to be released instead of failing to bind, and the old
//! thread can never publish into the store after the new `start()` reset it.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::ReceiverConfig;
use crate::error::{ReceiverError, ReceiverResult, SocketStage};
use crate::packet::RECV_BUFFER_SIZE;
use crate::processor::{DatagramOutcome, LoopExit, PacketProcessor, ReceiverCounters, ReceiverStats};
use crate::snapshot::TelemetrySnapshot;
use crate::store::TelemetryStore;

const THREAD_NAME: &str = "dr2-udp-rx";

/// Cooperative cancellation flag shared with the receive thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Everything that exists only between `start()` and `stop()`.
struct Running {
    /// Duplicate of the receive socket, used to wake the blocked receive.
    wake: UdpSocket,
    local_addr: SocketAddr,
    cancel: CancelToken,
    listening: Arc<AtomicBool>,
    counters: Arc<ReceiverCounters>,
    thread: JoinHandle<LoopExit>,
}

impl Running {
    fn shutdown(self) -> LoopExit {
        self.cancel.cancel();

        // A zero-length datagram to our own address unblocks `recv`; the loop
        // then sees the token and exits.
        if let Err(error) = self.wake.send_to(&[], self.local_addr) {
            warn!(error = %error, "Failed to wake DiRT Rally 2.0 receive thread");
        }
        drop(self.wake);

        debug!("Joining DiRT Rally 2.0 receive thread");
        match self.thread.join() {
            Ok(exit) => exit,
            Err(_panic) => LoopExit::Panicked,
        }
    }
}

/// UDP receiver for DiRT Rally 2.0 telemetry.
///
/// # Thread Safety
///
/// The snapshot, the running state and the lifecycle are guarded by separate
/// locks. Only the lifecycle lock is held across the join in
/// [`stop`](Self::stop); readers never take it.
pub struct TelemetryReceiver {
    config: ReceiverConfig,
    store: Arc<TelemetryStore>,
    /// Serializes `start()` and `stop()`.
    lifecycle: Mutex<()>,
    running: Mutex<Option<Running>>,
}

impl Default for TelemetryReceiver {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}

impl std::fmt::Debug for TelemetryReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryReceiver")
            .field("config", &self.config)
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}

impl TelemetryReceiver {
    #[must_use]
    pub fn new(config: ReceiverConfig) -> Self {
        Self::with_store(config, Arc::new(TelemetryStore::new()))
    }

    /// Build a receiver that publishes into an existing store.
    #[must_use]
    pub fn with_store(config: ReceiverConfig, store: Arc<TelemetryStore>) -> Self {
        Self {
            config,
            store,
            lifecycle: Mutex::new(()),
            running: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Bind the socket, clear the snapshot and spawn the receive thread.
    ///
    /// Waits for a `stop()` running on another thread to finish first.
    ///
    /// # Errors
    ///
    /// - [`ReceiverError::AlreadyStarted`] if a previous `start()` was not
    ///   followed by `stop()`; no second socket is opened.
    /// - [`ReceiverError::SocketInit`] if binding or configuring the socket fails.
    /// - [`ReceiverError::ThreadSpawn`] if the OS refuses a new thread.
    pub fn start(&self) -> ReceiverResult<()> {
        let _lifecycle = self.lifecycle.lock();
        if self.running.lock().is_some() {
            warn!("DiRT Rally 2.0 UDP receiver already started");
            return Err(ReceiverError::AlreadyStarted);
        }

        let bind_addr = self.config.bind_addr();
        let socket = UdpSocket::bind(bind_addr)
            .map_err(|e| ReceiverError::socket_init(SocketStage::Bind, e))?;
        socket
            .set_read_timeout(Some(self.config.receive_timeout()))
            .map_err(|e| ReceiverError::socket_init(SocketStage::Configure, e))?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| ReceiverError::socket_init(SocketStage::Bind, e))?;
        let wake = socket
            .try_clone()
            .map_err(|e| ReceiverError::socket_init(SocketStage::WakeHandle, e))?;

        self.store.reset();

        let cancel = CancelToken::new();
        let listening = Arc::new(AtomicBool::new(true));
        let counters = Arc::new(ReceiverCounters::default());
        let processor = PacketProcessor::new(
            Arc::clone(&self.store),
            Arc::clone(&counters),
            self.config.max_invalid_packets,
        );

        let thread = {
            let cancel = cancel.clone();
            let listening = Arc::clone(&listening);
            thread::Builder::new()
                .name(THREAD_NAME.to_string())
                .spawn(move || {
                    let exit = receive_loop(&socket, processor, &cancel);
                    listening.store(false, Ordering::Release);
                    exit
                })
                .map_err(ReceiverError::ThreadSpawn)?
        };

        info!(addr = %local_addr, "DiRT Rally 2.0 UDP receiver started");
        *self.running.lock() = Some(Running {
            wake,
            local_addr,
            cancel,
            listening,
            counters,
            thread,
        });
        Ok(())
    }

    /// Cancel the receive loop, release the socket and join the thread.
    ///
    /// Returns why the loop ended. A loop that had already given up on its own
    /// (for example after too many invalid packets) is joined all the same.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::NotStarted`] if there is nothing to stop.
    pub fn stop(&self) -> ReceiverResult<LoopExit> {
        let _lifecycle = self.lifecycle.lock();
        let Some(running) = self.running.lock().take() else {
            warn!("DiRT Rally 2.0 UDP receiver not started");
            return Err(ReceiverError::NotStarted);
        };

        let exit = running.shutdown();
        if exit.is_failure() {
            warn!(exit = %exit, "DiRT Rally 2.0 UDP receiver stopped after failure");
        } else {
            info!(exit = %exit, "DiRT Rally 2.0 UDP receiver stopped");
        }
        Ok(exit)
    }

    /// The latest snapshot, by value.
    #[must_use]
    pub fn copy_latest(&self) -> TelemetrySnapshot {
        self.store.read()
    }

    /// Replace the latest snapshot with zero.
    pub fn reset(&self) {
        self.store.reset();
    }

    /// Shared handle to the snapshot store.
    #[must_use]
    pub fn store(&self) -> Arc<TelemetryStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Returns `true` while the receive loop is still running.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| r.listening.load(Ordering::Acquire))
    }

    /// Address the socket is bound to, while started.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().as_ref().map(|r| r.local_addr)
    }

    /// Datagram counts since the last `start()`, while started.
    #[must_use]
    pub fn stats(&self) -> Option<ReceiverStats> {
        self.running.lock().as_ref().map(|r| r.counters.snapshot())
    }
}

impl Drop for TelemetryReceiver {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            let exit = running.shutdown();
            debug!(exit = %exit, "DiRT Rally 2.0 UDP receiver stopped on drop");
        }
    }
}

fn receive_loop(socket: &UdpSocket, mut processor: PacketProcessor, cancel: &CancelToken) -> LoopExit {
    info!("Starting to receive DiRT Rally 2.0 packets");
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        let received = socket.recv(&mut buf);
        if cancel.is_cancelled() {
            return LoopExit::Shutdown;
        }

        match received {
            Ok(0) => {
                info!("DiRT Rally 2.0 receive thread shutting down, socket closed");
                return LoopExit::Shutdown;
            }
            Ok(len) => {
                let data = buf.get(..len).unwrap_or(&[]);
                if let DatagramOutcome::Exhausted(exit) = processor.handle_datagram(data) {
                    return exit;
                }
            }
            Err(error) => match receive_error_exit(error.kind()) {
                None => trace!("DiRT Rally 2.0 receive timeout"),
                Some(exit @ LoopExit::Aborted) => {
                    debug!("DiRT Rally 2.0 receive interrupted");
                    return exit;
                }
                Some(exit) => {
                    warn!(error = %error, "DiRT Rally 2.0 receive thread stopping on socket error");
                    return exit;
                }
            },
        }
    }
}

/// How the receive loop reacts to a failed `recv`. `None` keeps waiting.
fn receive_error_exit(kind: io::ErrorKind) -> Option<LoopExit> {
    match kind {
        io::ErrorKind::Interrupted => Some(LoopExit::Aborted),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => None,
        kind => Some(LoopExit::ReceiveFailed(kind)),
    }
}
