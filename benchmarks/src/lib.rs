//! Fixtures shared by the tickphys benches.

use std::cell::Cell;
use std::rc::Rc;

use tickphys::prelude::*;

/// Participant doing a token amount of work per hook.
pub struct Integrator {
    position: f64,
    velocity: f64,
    syncs: Rc<Cell<u64>>,
}

impl PhysicsObject for Integrator {
    fn update_physics(&mut self) {
        self.velocity -= 9.81 * 0.02;
        self.position += self.velocity * 0.02;
    }

    fn update_graphics(&mut self) {
        self.syncs.set(self.syncs.get() + 1);
    }
}

/// Scheduler with `objects` registered integrators. The returned handles keep
/// the participants alive for the duration of the bench.
pub fn populated_scheduler(
    objects: usize,
    config: TickConfig,
) -> TickResult<(TickScheduler, Vec<ObjectHandle>)> {
    let scheduler = TickScheduler::new(StepCounter::new()).with_config(config)?;
    let syncs = Rc::new(Cell::new(0));
    let handles: Vec<ObjectHandle> = (0..objects)
        .map(|i| {
            object_handle(Integrator {
                position: i as f64,
                velocity: 0.0,
                syncs: syncs.clone(),
            })
        })
        .collect();
    scheduler.add(&handles);
    Ok((scheduler, handles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_registers_everything() {
        let (mut scheduler, handles) = populated_scheduler(32, TickConfig::standard()).unwrap();
        assert_eq!(scheduler.registry().len(), handles.len());
        assert_eq!(scheduler.tick(0.0, 0.04, 0.02).steps, 2);
    }
}
