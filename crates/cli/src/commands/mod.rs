//! Command implementations for dr2hud CLI

pub mod emit;
pub mod monitor;

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// UDP port to listen on (overrides config and DR2_HUD_UDP_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Frames polled per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Destination UDP port on 127.0.0.1
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of datagrams to send
    #[arg(short, long, default_value_t = 600)]
    pub count: u64,

    /// Datagrams per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub rate_hz: u32,

    /// Send wrong-sized datagrams instead of valid packets
    #[arg(long)]
    pub invalid: bool,
}
