//! # tickphys_sim - headless fixed-step runner
//!
//! Usage:
//!   tickphys_sim                               # 2s at 60 fps, 50 Hz physics
//!   tickphys_sim --config tick.toml            # Scheduler config file
//!   tickphys_sim --fps 20 --fixed-rate 240     # Heavy catch-up per frame
//!   tickphys_sim --max-catch-up 4              # Cap steps per frame
//!   tickphys_sim --snapshot out/tick.json      # Export final clock state
//!
//! Set RUST_LOG=tickphys_core=trace to see every phase.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use tickphys::FrameDriver;
use tickphys_sim::{Args, SimReport, SimSession};
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if !(args.duration.is_finite() && args.duration >= 0.0) {
        bail!("--duration must be a non-negative number of seconds");
    }

    let config = args.resolve_config()?;
    match config.fixed_rate_hz() {
        Some(rate) => info!("Starting tickphys_sim: {:.1} Hz physics, {:.1} fps host", rate, args.fps),
        None => warn!("fixed_delta_time is 0, physics is paused for this run"),
    }

    let mut session =
        SimSession::new(config, args.objects).context("invalid scheduler configuration")?;
    let mut driver = FrameDriver::new();

    let running = driver.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("{}", "\nCtrl+C received! Stopping simulation...".red());
        if let Ok(mut r) = running.lock() {
            *r = false;
        }
    }) {
        warn!("Failed to set signal handler: {}", e);
    }

    let report = session
        .run_realtime(&mut driver, Duration::from_secs_f64(args.duration), args.fps)
        .context("simulation run failed")?;

    print_summary(&report);

    if let Some(path) = &args.snapshot {
        report
            .snapshot
            .write_to(path)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        println!("{} {}", "Snapshot written to".green(), path.display());
    }

    Ok(())
}

fn print_summary(report: &SimReport) {
    let summary = &report.summary;
    let steps_per_frame = if summary.frames > 0 {
        summary.fixed_steps as f64 / summary.frames as f64
    } else {
        0.0
    };

    println!("{}", "tickphys_sim summary".bold().cyan());
    println!("  {:<20} {}", "frames", summary.frames);
    println!("  {:<20} {} ({:.2}/frame)", "fixed steps", summary.fixed_steps, steps_per_frame);
    println!("  {:<20} {:.3}s", "simulated time", report.simulated_time);
    println!("  {:<20} {}", "input reads", report.input_reads);
    println!("  {:<20} {}", "graphics syncs", report.rendered);
    println!(
        "  {:<20} {} despawned, {} live",
        "projectiles", report.despawned, report.live_objects
    );
    println!("  {:<20} {:.4}s", "extra delta", report.snapshot.extra_delta_time);

    if summary.throttled_frames > 0 {
        println!(
            "  {:<20} {}",
            "throttled frames",
            summary.throttled_frames.to_string().yellow()
        );
    } else {
        println!("  {:<20} {}", "throttled frames", "0".green());
    }
}
