use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tickphys::prelude::TickConfig;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "tickphys_sim")]
#[command(about = "Headless fixed-step simulation runner")]
pub struct Args {
    /// Scheduler configuration file (TOML or YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Wall-clock run time in seconds
    #[arg(long, default_value = "2.0")]
    pub duration: f64,

    /// Host frame rate driving the scheduler
    #[arg(long, default_value = "60.0")]
    pub fps: f64,

    /// Fixed simulation rate in Hz (overrides the config file)
    #[arg(long)]
    pub fixed_rate: Option<f64>,

    /// Number of demo projectiles to spawn
    #[arg(long, default_value = "16")]
    pub objects: usize,

    /// Cap on fixed steps per frame (overrides the config file)
    #[arg(long)]
    pub max_catch_up: Option<u32>,

    /// Write the final scheduler snapshot to this JSON file
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl Args {
    /// Config file (or the standard preset) with command-line overrides applied.
    /// The runner always drives the scheduler itself, so `auto_update` is forced on.
    pub fn resolve_config(&self) -> Result<TickConfig> {
        let mut config = match &self.config {
            Some(path) => TickConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => TickConfig::standard(),
        };

        if let Some(rate) = self.fixed_rate {
            config = config.with_fixed_rate_hz(rate);
        }
        if let Some(max) = self.max_catch_up {
            config = config.with_max_catch_up_steps(max);
        }
        config = config.with_auto_update(true);

        config.validate().context("invalid command-line overrides")?;
        Ok(config)
    }
}
