//! Output formatting for CLI responses

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Error, Result};
use colored::*;
use dr2_hud_telemetry::{HudModel, TelemetrySnapshot};
use serde_json::json;

const BAR_WIDTH: usize = 20;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

pub fn print_listening(addr: SocketAddr, json: bool) {
    if json {
        println!("{}", json!({ "event": "listening", "addr": addr.to_string() }));
    } else {
        println!("{} {}", "Listening on".green().bold(), addr);
    }
}

/// Print one live HUD frame.
pub fn print_frame(snapshot: &TelemetrySnapshot, hud: &HudModel, json: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if json {
        let line = json!({
            "event": "frame",
            "snapshot": snapshot,
            "hud": {
                "throttle": hud.throttle,
                "brake": hud.brake,
                "speed_kmh": hud.speed_kmh,
                "gforce": { "x": hud.gforce.x, "y": hud.gforce.y },
            }
        });
        writeln!(out, "{line}")?;
    } else {
        writeln!(out, "{}", format_frame(snapshot, hud))?;
    }
    Ok(())
}

/// Print the transition to a stale feed.
pub fn print_stale(unchanged_for: Option<Duration>, json: bool) -> Result<()> {
    let secs = unchanged_for.map_or(0.0, |d| d.as_secs_f64());
    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", json!({ "event": "stale", "unchanged_s": secs }))?;
    } else {
        writeln!(
            out,
            "{} no new telemetry for {secs:.1}s, hiding HUD",
            "stale".yellow().bold()
        )?;
    }
    Ok(())
}

pub fn print_emit_summary(target: SocketAddr, sent: u64, invalid: bool, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(&json!({
                "event": "emitted",
                "target": target.to_string(),
                "sent": sent,
                "invalid": invalid,
            }))?
        );
    } else {
        let kind = if invalid { "invalid datagrams" } else { "packets" };
        println!("{} {sent} {kind} to {target}", "Sent".green().bold());
    }
    Ok(())
}

pub fn format_frame(snapshot: &TelemetrySnapshot, hud: &HudModel) -> String {
    format!(
        "t={:>8.2}s  {:>6.1} km/h  thr {} {:>3.0}%  brk {} {:>3.0}%  g lat {:+.2} lon {:+.2}",
        snapshot.time,
        hud.speed_kmh,
        bar(hud.throttle).green(),
        hud.throttle * 100.0,
        bar(hud.brake).red(),
        hud.brake * 100.0,
        snapshot.gforce_lat,
        snapshot.gforce_lon,
    )
}

/// Fixed-width pedal bar for a fraction in `[0, 1]`.
fn bar(fraction: f32) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
