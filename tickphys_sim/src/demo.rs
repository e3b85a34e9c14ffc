//! Demo participants: projectiles that fly for a while and then despawn
//! themselves from inside their own physics update.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tickphys::prelude::*;
use tracing::debug;

const GRAVITY: f64 = -9.81;

/// Counters shared by every projectile of one session.
#[derive(Debug, Clone, Default)]
pub struct DemoStats {
    despawned: Rc<Cell<u64>>,
    rendered: Rc<Cell<u64>>,
}

impl DemoStats {
    pub fn despawned(&self) -> u64 {
        self.despawned.get()
    }

    /// Graphics syncs summed over all projectiles.
    pub fn rendered(&self) -> u64 {
        self.rendered.get()
    }
}

pub struct Projectile {
    id: usize,
    position: [f64; 2],
    velocity: [f64; 2],
    remaining_steps: u32,
    fixed_delta_time: f64,
    me: Weak<RefCell<Projectile>>,
    registry: Rc<PhysicsObjectRegistry>,
    stats: DemoStats,
    label: String,
}

impl PhysicsObject for Projectile {
    fn update_physics(&mut self) {
        if self.remaining_steps == 0 {
            return;
        }

        let dt = self.fixed_delta_time;
        self.velocity[1] += GRAVITY * dt;
        self.position[0] += self.velocity[0] * dt;
        self.position[1] += self.velocity[1] * dt;
        self.remaining_steps -= 1;

        if self.remaining_steps == 0 {
            if let Some(me) = self.me.upgrade() {
                let me: ObjectHandle = me;
                self.registry.remove([&me]);
            }
            self.stats.despawned.set(self.stats.despawned.get() + 1);
            debug!(
                "projectile {} despawned at ({:.2}, {:.2})",
                self.id, self.position[0], self.position[1]
            );
        }
    }

    fn update_graphics(&mut self) {
        self.stats.rendered.set(self.stats.rendered.get() + 1);
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Spawn `count` projectiles into `registry`.
///
/// Lifetimes are staggered so despawns are spread over the run. The returned
/// handles own the projectiles; the registry only tracks them.
pub fn spawn_projectiles(
    registry: &Rc<PhysicsObjectRegistry>,
    count: usize,
    fixed_delta_time: f64,
    stats: &DemoStats,
) -> Vec<ObjectHandle> {
    let handles: Vec<ObjectHandle> = (0..count)
        .map(|id| {
            let projectile = Rc::new_cyclic(|me: &Weak<RefCell<Projectile>>| {
                RefCell::new(Projectile {
                    id,
                    position: [0.0, 0.0],
                    velocity: [2.0 + id as f64 * 0.5, 10.0],
                    remaining_steps: 10 + (id as u32 * 7) % 50,
                    fixed_delta_time,
                    me: me.clone(),
                    registry: registry.clone(),
                    stats: stats.clone(),
                    label: format!("projectile_{}", id),
                })
            });
            projectile as ObjectHandle
        })
        .collect();

    registry.add(&handles);
    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectiles_despawn_themselves() {
        let counter = StepCounter::new();
        let mut scheduler = TickScheduler::new(counter.clone());
        let stats = DemoStats::default();
        let handles = spawn_projectiles(&scheduler.registry(), 3, 0.25, &stats);
        assert_eq!(scheduler.registry().len(), 3);

        // Lifetimes are 10, 17 and 24 steps.
        scheduler.tick(0.0, 2.5, 0.25);
        assert_eq!(stats.despawned(), 1);
        assert_eq!(scheduler.registry().len(), 2);

        scheduler.tick(0.0, 5.0, 0.25);
        assert_eq!(stats.despawned(), 3);
        assert!(scheduler.registry().is_empty());
        assert_eq!(counter.steps(), 30);

        // Handles stay valid after despawn; only registration ended.
        assert_eq!(handles.len(), 3);
        assert_eq!(handles[0].borrow().name(), "projectile_0");
    }

    #[test]
    fn test_graphics_counted_per_live_projectile() {
        let mut scheduler = TickScheduler::new(NoopWorld);
        let stats = DemoStats::default();
        let _handles = spawn_projectiles(&scheduler.registry(), 4, 0.25, &stats);

        scheduler.tick(0.0, 0.25, 0.25);
        scheduler.tick(0.0, 0.25, 0.25);

        assert_eq!(stats.rendered(), 8);
        assert_eq!(stats.despawned(), 0);
    }
}
