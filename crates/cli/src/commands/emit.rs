//! Synthetic DiRT Rally 2.0 packet emitter for exercising a running receiver.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use anyhow::{Context, Result};
use dr2_hud_telemetry::{PACKET_SIZE, TelemetrySnapshot, encode_packet};
use tokio::net::UdpSocket;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::commands::EmitArgs;
use crate::output;

/// Size of the junk datagrams sent with `--invalid`.
const INVALID_DATAGRAM_SIZE: usize = PACKET_SIZE / 2;

/// Execute the emit command.
pub async fn execute(args: &EmitArgs, default_port: u16, json: bool) -> Result<()> {
    let port = args.port.unwrap_or(default_port);
    let target = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port));

    let socket = UdpSocket::bind(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)))
        .await
        .context("Failed to bind emitter socket")?;
    info!(target = %target, count = args.count, "Emitting DiRT Rally 2.0 packets");

    let dt = 1.0 / args.rate_hz.max(1) as f32;
    let mut interval = tokio::time::interval(Duration::from_secs(1) / args.rate_hz.max(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    let mut sent = 0u64;
    for i in 0..args.count {
        interval.tick().await;
        if args.invalid {
            socket
                .send_to(&[0u8; INVALID_DATAGRAM_SIZE], target)
                .await
                .with_context(|| format!("Failed to send to {target}"))?;
        } else {
            let snapshot = synthetic_lap(i as f32 * dt);
            socket
                .send_to(&encode_packet(&snapshot), target)
                .await
                .with_context(|| format!("Failed to send to {target}"))?;
        }
        sent = sent.saturating_add(1);
        debug!(sent, "Datagram sent");
    }

    output::print_emit_summary(target, sent, args.invalid, json)
}

/// A smooth, repeating stage profile: accelerate, brake, corner.
pub fn synthetic_lap(time: f32) -> TelemetrySnapshot {
    let phase = (time * 0.5).sin();
    let throttle = phase.max(0.0);
    let brake = (-phase).max(0.0) * 0.8;
    TelemetrySnapshot {
        time,
        speed: 25.0 + 15.0 * phase,
        throttle,
        steer: (time * 0.3).sin() * 0.5,
        brake,
        gforce_lat: (time * 0.3).cos() * 1.2,
        gforce_lon: throttle * 0.4 - brake * 1.1,
    }
}
