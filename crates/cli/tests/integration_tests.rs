//! Integration tests for the dr2hud CLI
//!
//! These run the built binary against real loopback sockets.

use assert_cmd::Command;
use dr2_hud_telemetry::{ReceiverConfig, TelemetryReceiver};
use predicates::prelude::*;
use std::fs;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn dr2hud() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("dr2hud")?;
    cmd.env_remove("DR2_HUD_UDP_PORT")
        .env_remove("DR2_HUD_CONFIG")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_help_lists_commands() -> TestResult {
    dr2hud()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("emit"));
    Ok(())
}

#[test]
fn test_monitor_runs_fixed_frames() -> TestResult {
    dr2hud()?
        .args(["--json", "monitor", "--port", "0", "--frames", "3", "--fps", "120"])
        .timeout(Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"event\":\"listening\""));
    Ok(())
}

#[test]
fn test_emit_feeds_receiver() -> TestResult {
    let receiver = TelemetryReceiver::new(ReceiverConfig {
        port: 0,
        ..Default::default()
    });
    receiver.start()?;
    let port = receiver.local_addr().ok_or("no bound address")?.port();

    dr2hud()?
        .args(["emit", "--port", &port.to_string(), "--count", "5", "--rate-hz", "200"])
        .timeout(Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent 5 packets"));

    let deadline = Instant::now() + Duration::from_secs(5);
    while receiver.stats().is_some_and(|s| s.decoded < 5) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(receiver.stats().map(|s| s.decoded), Some(5));
    assert!(!receiver.copy_latest().is_zero());

    receiver.stop()?;
    Ok(())
}

#[test]
fn test_invalid_config_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("dr2hud.yaml");
    fs::write(&path, "receiver:\n  max_invalid_packets: 0\n")?;

    dr2hud()?
        .args(["--config", &path.to_string_lossy(), "monitor", "--frames", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn test_missing_config_file_exit_code() -> TestResult {
    dr2hud()?
        .args(["--config", "/no/such/dr2hud.yaml", "emit", "--count", "1"])
        .assert()
        .code(3);
    Ok(())
}
