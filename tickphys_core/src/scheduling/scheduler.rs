use crate::core::{ObjectHandle, PhysicsObjectRegistry};
use crate::error::TickResult;
use std::rc::Rc;

use super::config::TickConfig;
use super::events::{PhaseEvents, SubscriptionId, TickPhase};
use super::snapshot::TickSnapshot;
use super::world::WorldStepper;

/// Outcome of one [`TickScheduler::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Fixed steps executed by this tick.
    pub steps: u32,
    /// The catch-up cap stopped the loop with whole steps still pending.
    pub throttled: bool,
    /// `extra_delta_time` after the tick.
    pub extra_delta_time: f32,
    /// False when the physics gate was closed and only read-input fired.
    pub physics_ran: bool,
}

struct CatchUp {
    steps: u32,
    throttled: bool,
}

/// Fixed-timestep scheduler: owns the clocks, runs the catch-up loop and
/// dispatches phase notifications around an injected world stepper.
///
/// One scheduler serves one simulation domain (for example one 2D and one 3D
/// world each get their own). It is single-threaded and expects exactly one
/// `tick` per host frame.
pub struct TickScheduler {
    normal_time: f64,
    fixed_time: f64,
    fixed_frame_count: u64,
    extra_delta_time: f32,
    time_at_simulation: f64,
    last_fixed_delta_time: f64,

    // fixed_time is derived as base + steps * step so it never drifts; the
    // base moves whenever the step size changes.
    fixed_time_base: f64,
    steps_since_base: u64,
    base_fixed_delta_time: f64,

    is_physic_updated: bool,
    auto_update: bool,
    max_catch_up_steps: Option<u32>,

    registry: Rc<PhysicsObjectRegistry>,
    events: PhaseEvents,
    world: Box<dyn WorldStepper>,

    config: TickConfig,
    scheduler_name: String,
}

impl TickScheduler {
    /// Create a scheduler with [`TickConfig::standard`] around `world`.
    pub fn new(world: impl WorldStepper + 'static) -> Self {
        let config = TickConfig::standard();

        Self {
            normal_time: 0.0,
            fixed_time: 0.0,
            fixed_frame_count: 0,
            extra_delta_time: 0.0,
            time_at_simulation: 0.0,
            last_fixed_delta_time: config.fixed_delta_time,

            fixed_time_base: 0.0,
            steps_since_base: 0,
            base_fixed_delta_time: 0.0,

            is_physic_updated: config.is_physic_updated,
            auto_update: config.auto_update,
            max_catch_up_steps: config.max_catch_up_steps,

            registry: Rc::new(PhysicsObjectRegistry::with_capacity(config.registry_capacity)),
            events: PhaseEvents::new(),
            world: Box::new(world),

            config,
            scheduler_name: "TickScheduler".to_string(),
        }
    }

    /// Apply a configuration (builder pattern). Fails if the config does not validate.
    pub fn with_config(mut self, config: TickConfig) -> TickResult<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    /// Set scheduler name (for logging and snapshots)
    pub fn with_name(mut self, name: &str) -> Self {
        self.scheduler_name = name.to_string();
        self
    }

    /// Apply a configuration at runtime. Clocks and registrations are kept.
    ///
    /// The config is validated first; on error nothing is applied.
    pub fn set_config(&mut self, config: TickConfig) -> TickResult<&mut Self> {
        config.validate()?;

        self.is_physic_updated = config.is_physic_updated;
        self.auto_update = config.auto_update;
        self.max_catch_up_steps = config.max_catch_up_steps;
        if config.fixed_delta_time > 0.0 {
            self.last_fixed_delta_time = config.fixed_delta_time;
        }

        let registered = self.registry.len();
        if config.registry_capacity > registered {
            self.registry.reserve(config.registry_capacity - registered);
        }

        log::debug!(
            "{}: fixed_delta_time={}s physics={} auto_update={} max_catch_up_steps={:?}",
            self.scheduler_name,
            config.fixed_delta_time,
            config.is_physic_updated,
            config.auto_update,
            config.max_catch_up_steps
        );

        self.config = config;
        Ok(self)
    }

    /// Replace the world stepper, e.g. when switching simulation backends.
    pub fn set_world(&mut self, world: impl WorldStepper + 'static) {
        self.world = Box::new(world);
    }

    // ============================================================================
    // Tick
    // ============================================================================

    /// Advance the scheduler by one host frame.
    ///
    /// Read-input always fires first. With the physics gate open, `delta_time`
    /// is accumulated and as many `fixed_delta_time` steps run as fit, then the
    /// graphics sync fires once. A non-positive `fixed_delta_time` pauses
    /// stepping: the fixed clocks and `extra_delta_time` stay untouched while
    /// graphics sync still fires.
    ///
    /// Negative or non-finite `delta_time` values are treated as zero so
    /// `normal_time` never goes backwards.
    pub fn tick(&mut self, time: f64, delta_time: f64, fixed_delta_time: f64) -> TickReport {
        self.read_input();

        if !self.is_physic_updated {
            return TickReport {
                steps: 0,
                throttled: false,
                extra_delta_time: self.extra_delta_time,
                physics_ran: false,
            };
        }

        self.time_at_simulation = time;

        if delta_time.is_finite() && delta_time > 0.0 {
            self.normal_time += delta_time;
        }

        let catch_up = self.physic_tick(fixed_delta_time);
        if catch_up.is_some() {
            self.calculate_extra_delta_time();
        }

        self.update_graphic();

        let CatchUp { steps, throttled } = catch_up.unwrap_or(CatchUp {
            steps: 0,
            throttled: false,
        });

        TickReport {
            steps,
            throttled,
            extra_delta_time: self.extra_delta_time,
            physics_ran: true,
        }
    }

    /// Run fixed steps until `fixed_time` is within one step of `normal_time`.
    ///
    /// Returns `None` when stepping is paused.
    fn physic_tick(&mut self, fixed_delta_time: f64) -> Option<CatchUp> {
        if !(fixed_delta_time.is_finite() && fixed_delta_time > 0.0) {
            return None;
        }
        self.last_fixed_delta_time = fixed_delta_time;

        if fixed_delta_time != self.base_fixed_delta_time {
            self.fixed_time_base = self.fixed_time;
            self.steps_since_base = 0;
            self.base_fixed_delta_time = fixed_delta_time;
        }

        let mut steps: u32 = 0;
        loop {
            let next = self.fixed_time_base + (self.steps_since_base + 1) as f64 * fixed_delta_time;
            if self.normal_time < next {
                break;
            }
            if next <= self.fixed_time {
                log::warn!(
                    "{}: fixed step of {}s is below the resolution of fixed_time {}s, stepping stalled",
                    self.scheduler_name,
                    fixed_delta_time,
                    self.fixed_time
                );
                break;
            }
            if self.max_catch_up_steps.is_some_and(|max| steps >= max) {
                log::warn!(
                    "{}: catch-up capped at {} steps, {:.4}s of simulation deferred",
                    self.scheduler_name,
                    steps,
                    self.normal_time - self.fixed_time
                );
                return Some(CatchUp {
                    steps,
                    throttled: true,
                });
            }

            self.fixed_frame_count += 1;
            self.steps_since_base += 1;
            self.fixed_time = next;

            self.process_input();
            self.update_physic();
            self.simulate_physic(fixed_delta_time);

            steps = steps.saturating_add(1);
        }

        Some(CatchUp {
            steps,
            throttled: false,
        })
    }

    fn calculate_extra_delta_time(&mut self) {
        self.extra_delta_time = (self.normal_time - self.fixed_time) as f32;
    }

    fn read_input(&mut self) {
        log::trace!("{}: {}", self.scheduler_name, TickPhase::ReadInput);
        self.events.emit_read_input();
    }

    fn process_input(&mut self) {
        log::trace!(
            "{}: {} #{}",
            self.scheduler_name,
            TickPhase::ProcessInput,
            self.fixed_frame_count
        );
        self.events.emit_process_input(self.fixed_frame_count);
    }

    fn update_physic(&mut self) {
        log::trace!("{}: {}", self.scheduler_name, TickPhase::PrePhysicsUpdate);
        self.registry.update_physics();
        self.events.emit_pre_physics_update();
    }

    fn simulate_physic(&mut self, fixed_delta_time: f64) {
        log::trace!("{}: {}", self.scheduler_name, TickPhase::WorldStep);
        self.world.advance_world(fixed_delta_time);
    }

    fn update_graphic(&mut self) {
        log::trace!("{}: {}", self.scheduler_name, TickPhase::GraphicsSync);
        self.registry.update_graphics();
        self.events.emit_graphics_sync();
    }

    // ============================================================================
    // Clocks and control surface
    // ============================================================================

    pub fn normal_time(&self) -> f64 {
        self.normal_time
    }

    pub fn fixed_time(&self) -> f64 {
        self.fixed_time
    }

    pub fn fixed_frame_count(&self) -> u64 {
        self.fixed_frame_count
    }

    pub fn extra_delta_time(&self) -> f32 {
        self.extra_delta_time
    }

    pub fn time_at_simulation(&self) -> f64 {
        self.time_at_simulation
    }

    /// Fraction of a fixed step elapsed since the last simulated state, for
    /// render interpolation. Clamped to `[0, 1]`.
    pub fn interpolation_alpha(&self) -> f32 {
        if self.last_fixed_delta_time <= 0.0 {
            return 0.0;
        }
        (self.extra_delta_time as f64 / self.last_fixed_delta_time).clamp(0.0, 1.0) as f32
    }

    pub fn is_physic_updated(&self) -> bool {
        self.is_physic_updated
    }

    /// Open or close the physics gate. Clocks are not reset on re-enable;
    /// time passed while closed is simply never accumulated.
    pub fn set_physic_updated(&mut self, enabled: bool) {
        if self.is_physic_updated != enabled {
            log::debug!("{}: physics {}", self.scheduler_name, if enabled { "enabled" } else { "disabled" });
        }
        self.is_physic_updated = enabled;
        self.config.is_physic_updated = enabled;
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Whether a [`FrameDriver`](super::FrameDriver) drives this scheduler.
    pub fn set_auto_update(&mut self, enabled: bool) {
        self.auto_update = enabled;
        self.config.auto_update = enabled;
    }

    pub fn max_catch_up_steps(&self) -> Option<u32> {
        self.max_catch_up_steps
    }

    /// Cap fixed steps per tick. `Some(0)` is treated as `None` (no cap).
    pub fn set_max_catch_up_steps(&mut self, max: Option<u32>) {
        let max = max.filter(|steps| *steps > 0);
        self.max_catch_up_steps = max;
        self.config.max_catch_up_steps = max;
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.scheduler_name
    }

    /// Zero every clock. Registrations and subscriptions are kept.
    pub fn reset_clocks(&mut self) {
        self.normal_time = 0.0;
        self.fixed_time = 0.0;
        self.fixed_time_base = 0.0;
        self.steps_since_base = 0;
        self.base_fixed_delta_time = 0.0;
        self.fixed_frame_count = 0;
        self.extra_delta_time = 0.0;
        self.time_at_simulation = 0.0;
        log::debug!("{}: clocks reset", self.scheduler_name);
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            scheduler_name: self.scheduler_name.clone(),
            normal_time: self.normal_time,
            fixed_time: self.fixed_time,
            fixed_frame_count: self.fixed_frame_count,
            extra_delta_time: self.extra_delta_time,
            time_at_simulation: self.time_at_simulation,
            is_physic_updated: self.is_physic_updated,
            auto_update: self.auto_update,
            registered_objects: self.registry.len(),
        }
    }

    // ============================================================================
    // Registry and events
    // ============================================================================

    /// Shared registry handle. Participants keep a clone to add or remove
    /// members from inside their own callbacks.
    pub fn registry(&self) -> Rc<PhysicsObjectRegistry> {
        self.registry.clone()
    }

    pub fn add<'a, I>(&self, objects: I) -> usize
    where
        I: IntoIterator<Item = &'a ObjectHandle>,
    {
        self.registry.add(objects)
    }

    pub fn remove<'a, I>(&self, objects: I) -> usize
    where
        I: IntoIterator<Item = &'a ObjectHandle>,
    {
        self.registry.remove(objects)
    }

    pub fn events(&self) -> &PhaseEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut PhaseEvents {
        &mut self.events
    }

    pub fn on_read_input(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        self.events.on_read_input(callback)
    }

    pub fn on_process_input(&mut self, callback: impl FnMut(u64) + 'static) -> SubscriptionId {
        self.events.on_process_input(callback)
    }

    pub fn on_pre_physics_update(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        self.events.on_pre_physics_update(callback)
    }

    pub fn on_graphics_sync(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        self.events.on_graphics_sync(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}
