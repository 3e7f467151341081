//! kinect_lamp — interactive entry point.

use std::io::{self, Write};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use gesture_pipeline::WaveConfig;
use hue_light::{BridgeConfig, HueBridge};
use kinect_lamp::app::{run, AppConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Kinect Lamp — wave at the sensor, color the room      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Mode: mouse simulation  (hardware sensors plug in behind SkeletonSource)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: no bridge, default wave tuning\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let mut cfg = AppConfig::default();

    // ── Hue bridge ────────────────────────────────────────────────────────
    let host = read_line("  Hue bridge IP (blank = no bridge): ");
    let host = host.trim();
    if !host.is_empty() {
        let username = {
            let u = read_line("  Bridge username (default wave-lamp): ");
            let u = u.trim().to_string();
            if u.is_empty() { "wave-lamp".to_string() } else { u }
        };
        let bulbs: Vec<u8> = {
            let n: u8 = read_line("  Number of bulbs (default 1): ")
                .trim()
                .parse()
                .unwrap_or(1)
                .clamp(1, 50);
            (1..=n).collect()
        };

        let bridge = BridgeConfig {
            bulbs,
            ..BridgeConfig::new(host, username)
        };

        if read_line("  Register username with the bridge now? y/N: ")
            .trim()
            .eq_ignore_ascii_case("y")
        {
            match HueBridge::new(bridge.clone()).register("kinect-lamp wave controller") {
                Ok(())  => println!("  Registration sent — press the bridge link button first."),
                Err(e)  => println!("  Registration failed: {} (continuing)", e),
            }
        }

        cfg.bridge = Some(bridge);
    }

    // ── Wave tuning ───────────────────────────────────────────────────────
    let window_ms: u64 = read_line("  Wave window ms (default 3000): ")
        .trim()
        .parse()
        .unwrap_or(3000)
        .clamp(500, 30_000);
    let hop_ms: u64 = read_line("  Window hop ms (default 500): ")
        .trim()
        .parse()
        .unwrap_or(500)
        .clamp(50, window_ms);
    let min_signals: usize = read_line("  Signals per wave (default 3): ")
        .trim()
        .parse()
        .unwrap_or(3)
        .clamp(1, 20);

    cfg.session.pipeline.wave = WaveConfig {
        window: Duration::from_millis(window_ms),
        hop:    Duration::from_millis(hop_ms),
        min_signals,
    };

    cfg
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
