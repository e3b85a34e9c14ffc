use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A participant in the fixed-step pipeline.
///
/// Both hooks run synchronously from inside a registry pass. A participant may
/// add or remove registry members (itself included) from either hook.
pub trait PhysicsObject {
    /// Advance the object's own physics state for one fixed step.
    ///
    /// Runs after the fixed frame's input has been processed and before the
    /// world stepper integrates, so forces and velocities set here are consumed
    /// by the same step.
    fn update_physics(&mut self);

    /// Sync the visual representation with the simulated state.
    fn update_graphics(&mut self) {}

    /// Name used in log output.
    fn name(&self) -> &str {
        "physics_object"
    }
}

/// Shared handle to a participant. Identity is the allocation, not the value.
pub type ObjectHandle = Rc<RefCell<dyn PhysicsObject>>;

pub(crate) type WeakObjectHandle = Weak<RefCell<dyn PhysicsObject>>;

/// Wrap a participant into an [`ObjectHandle`].
pub fn object_handle<T: PhysicsObject + 'static>(object: T) -> ObjectHandle {
    Rc::new(RefCell::new(object))
}

/// Which participant hook a registry pass invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectPass {
    Physics,
    Graphics,
}

impl ObjectPass {
    pub(crate) fn apply(self, object: &mut dyn PhysicsObject) {
        match self {
            ObjectPass::Physics => object.update_physics(),
            ObjectPass::Graphics => object.update_graphics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        physics: u32,
        graphics: u32,
    }

    impl PhysicsObject for Counter {
        fn update_physics(&mut self) {
            self.physics += 1;
        }

        fn update_graphics(&mut self) {
            self.graphics += 1;
        }
    }

    struct PhysicsOnly;

    impl PhysicsObject for PhysicsOnly {
        fn update_physics(&mut self) {}
    }

    #[test]
    fn test_pass_dispatches_to_matching_hook() {
        let mut counter = Counter { physics: 0, graphics: 0 };
        ObjectPass::Physics.apply(&mut counter);
        ObjectPass::Physics.apply(&mut counter);
        ObjectPass::Graphics.apply(&mut counter);
        assert_eq!(counter.physics, 2);
        assert_eq!(counter.graphics, 1);
    }

    #[test]
    fn test_default_hooks() {
        let mut object = PhysicsOnly;
        ObjectPass::Graphics.apply(&mut object);
        assert_eq!(object.name(), "physics_object");
    }

    #[test]
    fn test_handles_compare_by_allocation() {
        let a = object_handle(PhysicsOnly);
        let b = object_handle(PhysicsOnly);
        assert!(Rc::ptr_eq(&a, &a.clone()));
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
