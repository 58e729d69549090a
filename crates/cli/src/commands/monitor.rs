//! Frame loop that stands in for the overlay's per-frame draw callback.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use dr2_hud_telemetry::prelude::*;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::commands::MonitorArgs;
use crate::error::CliError;
use crate::output;

/// Execute the monitor command.
pub async fn execute(args: &MonitorArgs, config: &HudConfig, json: bool) -> Result<()> {
    let mut receiver_config = config.receiver.clone();
    if let Some(port) = args.port {
        receiver_config.port = port;
    }

    let receiver = TelemetryReceiver::new(receiver_config);
    receiver
        .start()
        .context("Failed to start telemetry receiver")?;
    if let Some(addr) = receiver.local_addr() {
        output::print_listening(addr, json);
    }

    let frame_loop = run_frames(&receiver, config, args, json).await;
    let exit = receiver.stop()?;
    frame_loop?;

    if exit.is_failure() {
        return Err(CliError::ReceiverFailed(exit.to_string()).into());
    }
    Ok(())
}

async fn run_frames(
    receiver: &TelemetryReceiver,
    config: &HudConfig,
    args: &MonitorArgs,
    json: bool,
) -> Result<()> {
    let mut tracker = StalenessTracker::new(&config.staleness);
    let mut interval = tokio::time::interval(frame_period(args.fps));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut frames = 0u64;
    let mut last_time_bits: Option<u32> = None;
    let mut last_status = FeedStatus::Live;

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(error) = result {
                    warn!(error = %error, "Failed to listen for Ctrl-C");
                }
                info!("Interrupted, stopping receiver");
                return Ok(());
            }
            _ = interval.tick() => {
                let snapshot = receiver.copy_latest();
                let status = tracker.observe(snapshot.time, Instant::now());

                let changed = last_time_bits != Some(snapshot.time.to_bits());
                if status.is_live() && changed && !snapshot.is_zero() {
                    let hud = HudModel::from_snapshot(&snapshot, &config.gforce);
                    output::print_frame(&snapshot, &hud, json)?;
                } else if status != last_status && !status.is_live() {
                    output::print_stale(tracker.unchanged_for(Instant::now()), json)?;
                }
                last_time_bits = Some(snapshot.time.to_bits());
                last_status = status;

                frames = frames.saturating_add(1);
                if args.frames.is_some_and(|max| frames >= max) {
                    return Ok(());
                }
                if !receiver.is_listening() {
                    warn!("Receive loop ended, leaving monitor");
                    return Ok(());
                }
            }
        }
    }
}

fn frame_period(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
