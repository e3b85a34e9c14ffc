//! Small reusable participants and steppers.

use std::cell::Cell;
use std::rc::Rc;

use tickphys_core::{PhysicsObject, WorldStepper};

/// Participant assembled from closures, for hosts that don't want a type per
/// participant.
pub struct FnObject {
    name: String,
    physics: Box<dyn FnMut()>,
    graphics: Option<Box<dyn FnMut()>>,
}

impl FnObject {
    pub fn new(name: &str, physics: impl FnMut() + 'static) -> Self {
        Self {
            name: name.to_string(),
            physics: Box::new(physics),
            graphics: None,
        }
    }

    pub fn with_graphics(mut self, graphics: impl FnMut() + 'static) -> Self {
        self.graphics = Some(Box::new(graphics));
        self
    }
}

impl PhysicsObject for FnObject {
    fn update_physics(&mut self) {
        (self.physics)();
    }

    fn update_graphics(&mut self) {
        if let Some(graphics) = self.graphics.as_mut() {
            graphics();
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Stepper that only counts. Clones share the same counters, so keep one
/// clone outside the scheduler to read them back.
#[derive(Debug, Clone, Default)]
pub struct StepCounter {
    steps: Rc<Cell<u64>>,
    simulated_time: Rc<Cell<f64>>,
}

impl StepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.steps.get()
    }

    /// Sum of every fixed delta the world was advanced by.
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time.get()
    }
}

impl WorldStepper for StepCounter {
    fn advance_world(&mut self, fixed_delta_time: f64) {
        self.steps.set(self.steps.get() + 1);
        self.simulated_time
            .set(self.simulated_time.get() + fixed_delta_time);
    }
}
