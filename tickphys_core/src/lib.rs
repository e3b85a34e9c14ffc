//! # tickphys Core
//!
//! The core runtime of the tickphys fixed-timestep scheduler.
//!
//! A host frame loop feeds variable frame times in; the scheduler turns them
//! into a deterministic sequence of fixed simulation steps and lets registered
//! objects hook into well-defined phases of every step:
//!
//! - **Objects**: participants that advance physics state and sync visuals
//! - **Registry**: ordered, duplicate-free membership that tolerates removal
//!   from inside its own callbacks
//! - **Scheduling**: the tick/accumulator engine, phase events and the frame driver
//!
//! ## Quick Start
//!
//! ```rust
//! use tickphys_core::{object_handle, ObjectHandle, PhysicsObject, TickScheduler};
//!
//! struct Crate { steps: u32 }
//!
//! impl PhysicsObject for Crate {
//!     fn update_physics(&mut self) { self.steps += 1; }
//! }
//!
//! let mut scheduler = TickScheduler::new(|_dt: f64| { /* advance the world */ });
//! let body: ObjectHandle = object_handle(Crate { steps: 0 });
//! scheduler.add([&body]);
//!
//! let report = scheduler.tick(0.0, 0.05, 0.02);
//! assert_eq!(report.steps, 2);
//! ```

pub mod core;
pub mod error;
pub mod scheduling;

// Re-export commonly used types for easy access
pub use crate::core::{object_handle, ObjectHandle, PhysicsObject, PhysicsObjectRegistry};
pub use error::{TickError, TickResult};
pub use scheduling::{
    FrameClock, FrameDriver, ManualClock, MonotonicClock, NoopWorld, PhaseEvents, RunSummary,
    SubscriptionId, TickConfig, TickPhase, TickReport, TickScheduler, TickSnapshot,
    WorldStepper,
};
