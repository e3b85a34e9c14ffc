//! # tickphys
//!
//! Fixed-timestep simulation scheduling for Rust: variable frame times in,
//! deterministic physics steps out, with ordered phase hooks around every step.
//!
//! ## Quick Start
//!
//! ```rust
//! use tickphys::prelude::*;
//!
//! # fn main() -> TickResult<()> {
//! let world = StepCounter::new();
//! let mut scheduler = TickScheduler::new(world.clone())
//!     .with_config(TickConfig::standard().with_fixed_rate_hz(60.0))?;
//!
//! let player = object_handle(FnObject::new("player", || { /* apply forces */ }));
//! scheduler.add([&player]);
//! scheduler.on_graphics_sync(|| { /* interpolate and render */ });
//!
//! // once per host frame
//! let fixed_delta_time = scheduler.config().fixed_delta_time;
//! scheduler.tick(0.0, 1.0 / 30.0, fixed_delta_time);
//! assert_eq!(world.steps(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Deterministic catch-up loop** independent of how frames are split
//! - **Phase notifications**: read-input, process-input, pre-physics-update, graphics-sync
//! - **Re-entrant registry**: participants may despawn themselves mid-pass
//! - **Injected world stepper**: any physics backend, or none
//! - **Frame driver** for self-driven schedulers

pub use tickphys_core::{self, *};

pub mod components;

/// The tickphys prelude - everything you need to get started
pub mod prelude {
    // Participants
    pub use tickphys_core::core::{object_handle, ObjectHandle, PhysicsObject, PhysicsObjectRegistry};

    // Scheduling
    pub use tickphys_core::scheduling::{
        FrameDriver, ManualClock, NoopWorld, SubscriptionId, TickConfig, TickPhase, TickReport,
        TickScheduler, WorldStepper,
    };

    // Ready-made components
    pub use crate::components::{FnObject, StepCounter};

    // Error types
    pub use tickphys_core::error::{TickError, TickResult};
    pub type Result<T> = TickResult<T>;

    // Common std types
    pub use std::cell::RefCell;
    pub use std::rc::Rc;
    pub use std::time::Duration;

    // Common traits
    pub use serde::{Deserialize, Serialize};

    // Re-export anyhow for error handling
    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get tickphys version
pub fn version() -> &'static str {
    VERSION
}
