//! # tickphys Scheduling System
//!
//! Fixed-timestep scheduling that turns variable frame times into
//! deterministic simulation steps:
//!
//! - **TickScheduler**: clocks, the catch-up loop and phase dispatch
//! - **PhaseEvents**: ordered subscriber lists for every phase
//! - **WorldStepper**: the injected "advance the world by one fixed step" capability
//! - **FrameDriver**: optional self-driving from a frame clock (`auto_update`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tickphys_core::{TickConfig, TickScheduler};
//!
//! let mut scheduler = TickScheduler::new(world).with_config(TickConfig::standard())?;
//! scheduler.on_process_input(|frame| sample_input(frame));
//! scheduler.add([&player]);
//!
//! // once per host frame
//! scheduler.tick(time, delta_time, 0.02);
//! ```
//!
//! ## Phase Order
//!
//! Per tick: read-input, then per fixed step (process-input, pre-physics-update,
//! world-step), then graphics-sync once.

pub mod config;
pub mod driver;
pub mod events;
pub mod scheduler;
pub mod snapshot;
pub mod world;

pub use config::TickConfig;
pub use driver::{FrameClock, FrameDriver, ManualClock, MonotonicClock, RunSummary};
pub use events::{PhaseEvents, SubscriptionId, TickPhase};
pub use scheduler::{TickReport, TickScheduler};
pub use snapshot::TickSnapshot;
pub use world::{NoopWorld, WorldStepper};
