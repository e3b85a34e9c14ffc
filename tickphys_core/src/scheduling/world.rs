/// Advances the simulated world by exactly one fixed step.
///
/// This is the only capability the scheduler consumes from a simulation
/// backend. A 2D or 3D physics world, a network rollback buffer or a test
/// recorder all plug in here. Any `FnMut(f64)` closure is a stepper.
pub trait WorldStepper {
    fn advance_world(&mut self, fixed_delta_time: f64);
}

impl<F> WorldStepper for F
where
    F: FnMut(f64),
{
    fn advance_world(&mut self, fixed_delta_time: f64) {
        self(fixed_delta_time)
    }
}

/// Stepper for hosts that only need the clock and phase events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWorld;

impl WorldStepper for NoopWorld {
    fn advance_world(&mut self, _fixed_delta_time: f64) {}
}
