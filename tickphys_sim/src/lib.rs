//! # tickphys_sim
//!
//! Headless runner that drives a [`TickScheduler`](tickphys::TickScheduler)
//! in real time against a demo world of self-despawning projectiles.

pub mod cli;
pub mod demo;
pub mod session;

pub use cli::Args;
pub use session::{SimReport, SimSession};
