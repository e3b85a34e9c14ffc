//! Ordered participant registry that can be mutated from inside its own passes.
//!
//! A pass keeps a cursor holding the index of the *next* element to visit; the
//! element currently being called back sits at `cursor - 1`. Removing index `i`
//! while a pass is running decrements the cursor only when `i < cursor`, so
//! removing an already-visited element or the current one never skips the
//! following element, and removing a later element never revisits anything.
//! Elements added mid-pass are appended and visited by the same pass, unless
//! the same participant was already called back in that pass (for example one
//! that removed and re-added itself).

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::object::{ObjectHandle, ObjectPass, WeakObjectHandle};

const DEFAULT_CAPACITY: usize = 256;

struct RegistryState {
    objects: Vec<WeakObjectHandle>,
    iterating: bool,
    cursor: usize,
}

/// Ordered, duplicate-free set of non-owning participant handles.
///
/// The registry never keeps a participant alive. Handles whose last strong
/// reference has been dropped are skipped by passes and pruned once no pass
/// is running.
pub struct PhysicsObjectRegistry {
    state: RefCell<RegistryState>,
}

impl Default for PhysicsObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsObjectRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RefCell::new(RegistryState {
                objects: Vec::with_capacity(capacity),
                iterating: false,
                cursor: 0,
            }),
        }
    }

    /// Pre-allocate room for `additional` more participants.
    pub fn reserve(&self, additional: usize) {
        self.state.borrow_mut().objects.reserve(additional);
    }

    /// Append every object not already registered, preserving order.
    ///
    /// Returns how many objects were actually inserted.
    pub fn add<'a, I>(&self, objects: I) -> usize
    where
        I: IntoIterator<Item = &'a ObjectHandle>,
    {
        let mut state = self.state.borrow_mut();
        let mut inserted = 0;

        for object in objects {
            let weak = Rc::downgrade(object);
            if state.objects.iter().any(|known| known.ptr_eq(&weak)) {
                continue;
            }
            state.objects.push(weak);
            inserted += 1;
        }

        if inserted > 0 {
            log::debug!("Registered {} object(s), {} total", inserted, state.objects.len());
        }
        inserted
    }

    /// Remove every given object by identity. Unknown objects are ignored.
    ///
    /// Safe to call from inside `update_physics` / `update_graphics`, including
    /// for the object currently being called back. Returns how many objects
    /// were removed.
    pub fn remove<'a, I>(&self, objects: I) -> usize
    where
        I: IntoIterator<Item = &'a ObjectHandle>,
    {
        let mut state = self.state.borrow_mut();
        let mut removed = 0;

        for object in objects {
            let weak = Rc::downgrade(object);
            let Some(index) = state.objects.iter().position(|known| known.ptr_eq(&weak)) else {
                continue;
            };

            state.objects.remove(index);
            if state.iterating && index < state.cursor {
                state.cursor -= 1;
            }
            removed += 1;
        }

        if removed > 0 {
            log::debug!("Removed {} object(s), {} remaining", removed, state.objects.len());
        }
        removed
    }

    pub fn contains(&self, object: &ObjectHandle) -> bool {
        let weak = Rc::downgrade(object);
        self.state
            .borrow()
            .objects
            .iter()
            .any(|known| known.ptr_eq(&weak))
    }

    /// Number of registered handles, including ones not yet pruned.
    pub fn len(&self) -> usize {
        self.state.borrow().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a physics or graphics pass is in progress.
    pub fn is_iterating(&self) -> bool {
        self.state.borrow().iterating
    }

    /// Live participants in registration order.
    pub fn handles(&self) -> Vec<ObjectHandle> {
        self.state
            .borrow()
            .objects
            .iter()
            .filter_map(|weak| weak.upgrade())
            .collect()
    }

    /// Drop every registration. A running pass stops after the current callback.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.objects.clear();
        state.cursor = 0;
    }

    /// Call `update_physics` on every participant in order.
    pub(crate) fn update_physics(&self) {
        self.run_pass(ObjectPass::Physics);
    }

    /// Call `update_graphics` on every participant in order.
    pub(crate) fn update_graphics(&self) {
        self.run_pass(ObjectPass::Graphics);
    }

    fn run_pass(&self, pass: ObjectPass) {
        {
            let mut state = self.state.borrow_mut();
            if state.iterating {
                log::warn!("Nested {:?} pass ignored: registry is already iterating", pass);
                return;
            }
            state.iterating = true;
            state.cursor = 0;
        }

        // Holding the weak handles pins each allocation, so an address in
        // `visited` cannot be reused by a new participant during this pass.
        let mut visited: HashSet<*const ()> = HashSet::new();
        let mut pinned: Vec<WeakObjectHandle> = Vec::new();

        loop {
            // The state borrow must be released before the callback runs so the
            // participant can mutate the registry.
            let next = {
                let mut state = self.state.borrow_mut();
                if state.cursor >= state.objects.len() {
                    break;
                }
                let weak = state.objects[state.cursor].clone();
                state.cursor += 1;
                weak
            };

            let Some(object) = next.upgrade() else {
                continue;
            };
            if !visited.insert(next.as_ptr() as *const ()) {
                log::trace!("{:?} update skipped: already visited in this pass", pass);
                continue;
            }
            pinned.push(next);

            match object.try_borrow_mut() {
                Ok(mut guard) => {
                    log::trace!("{:?} update: {}", pass, guard.name());
                    pass.apply(&mut *guard);
                }
                Err(_) => log::warn!("Skipped {:?} update: object is already borrowed", pass),
            };
        }

        let mut state = self.state.borrow_mut();
        state.iterating = false;
        state.cursor = 0;
        state.objects.retain(|weak| weak.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::{object_handle, PhysicsObject};
    use std::rc::Weak;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl PhysicsObject for Recorder {
        fn update_physics(&mut self) {
            self.log.borrow_mut().push(format!("physics:{}", self.label));
        }

        fn update_graphics(&mut self) {
            self.log.borrow_mut().push(format!("graphics:{}", self.label));
        }

        fn name(&self) -> &str {
            self.label
        }
    }

    /// Removes a fixed set of targets (possibly itself) on its first physics update.
    struct Remover {
        label: &'static str,
        log: Log,
        registry: Rc<PhysicsObjectRegistry>,
        targets: Vec<Weak<RefCell<dyn PhysicsObject>>>,
    }

    impl PhysicsObject for Remover {
        fn update_physics(&mut self) {
            self.log.borrow_mut().push(format!("physics:{}", self.label));
            let targets: Vec<ObjectHandle> =
                self.targets.drain(..).filter_map(|t| t.upgrade()).collect();
            self.registry.remove(&targets);
        }
    }

    fn recorder(label: &'static str, log: &Log) -> ObjectHandle {
        object_handle(Recorder { label, log: log.clone() })
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn test_add_is_idempotent() {
        let log = Log::default();
        let registry = PhysicsObjectRegistry::new();
        let a = recorder("a", &log);

        assert_eq!(registry.add([&a]), 1);
        assert_eq!(registry.add([&a]), 0);
        assert_eq!(registry.add([&a, &a]), 0);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&a));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let log = Log::default();
        let registry = PhysicsObjectRegistry::new();
        let (a, b, c) = (recorder("a", &log), recorder("b", &log), recorder("c", &log));

        registry.add([&c, &a]);
        registry.add([&b, &a]);
        registry.update_physics();

        assert_eq!(entries(&log), vec!["physics:c", "physics:a", "physics:b"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let log = Log::default();
        let registry = PhysicsObjectRegistry::new();
        let a = recorder("a", &log);
        let stranger = recorder("x", &log);

        registry.add([&a]);
        assert_eq!(registry.remove([&stranger]), 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove([&a]), 1);
        assert_eq!(registry.remove([&a]), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_does_not_keep_objects_alive() {
        let log = Log::default();
        let registry = PhysicsObjectRegistry::new();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        registry.add([&a, &b]);

        drop(a);
        registry.update_graphics();

        assert_eq!(entries(&log), vec!["graphics:b"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_self_removal_visits_rest_once() {
        let log = Log::default();
        let registry = Rc::new(PhysicsObjectRegistry::new());
        let a = recorder("a", &log);
        let c = recorder("c", &log);
        let b: ObjectHandle = Rc::new_cyclic(|me: &Weak<RefCell<Remover>>| {
            let me: Weak<RefCell<dyn PhysicsObject>> = me.clone();
            RefCell::new(Remover {
                label: "b",
                log: log.clone(),
                registry: registry.clone(),
                targets: vec![me],
            })
        });

        registry.add([&a, &b, &c]);
        registry.update_physics();

        assert_eq!(entries(&log), vec!["physics:a", "physics:b", "physics:c"]);
        assert!(!registry.contains(&b));
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_iterating());
    }

    #[test]
    fn test_removing_visited_element_does_not_revisit() {
        let log = Log::default();
        let registry = Rc::new(PhysicsObjectRegistry::new());
        let a = recorder("a", &log);
        let d = recorder("d", &log);
        let b: ObjectHandle = object_handle(Remover {
            label: "b",
            log: log.clone(),
            registry: registry.clone(),
            targets: vec![Rc::downgrade(&a)],
        });
        let c = recorder("c", &log);

        registry.add([&a, &b, &c, &d]);
        registry.update_physics();

        assert_eq!(
            entries(&log),
            vec!["physics:a", "physics:b", "physics:c", "physics:d"]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_removing_pending_element_skips_it() {
        let log = Log::default();
        let registry = Rc::new(PhysicsObjectRegistry::new());
        let a = recorder("a", &log);
        let c = recorder("c", &log);
        let b: ObjectHandle = object_handle(Remover {
            label: "b",
            log: log.clone(),
            registry: registry.clone(),
            targets: vec![Rc::downgrade(&c)],
        });
        let d = recorder("d", &log);

        registry.add([&a, &b, &c, &d]);
        registry.update_physics();

        assert_eq!(entries(&log), vec!["physics:a", "physics:b", "physics:d"]);
    }

    #[test]
    fn test_added_during_pass_is_visited() {
        struct Spawner {
            registry: Rc<PhysicsObjectRegistry>,
            child: Option<ObjectHandle>,
        }

        impl PhysicsObject for Spawner {
            fn update_physics(&mut self) {
                if let Some(child) = self.child.as_ref() {
                    self.registry.add([child]);
                }
            }
        }

        let log = Log::default();
        let registry = Rc::new(PhysicsObjectRegistry::new());
        let child = recorder("child", &log);
        let spawner = object_handle(Spawner {
            registry: registry.clone(),
            child: Some(child.clone()),
        });

        registry.add([&spawner]);
        registry.update_physics();

        assert_eq!(entries(&log), vec!["physics:child"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clear_during_pass_stops_iteration() {
        struct Clearer {
            registry: Rc<PhysicsObjectRegistry>,
        }

        impl PhysicsObject for Clearer {
            fn update_physics(&mut self) {
                self.registry.clear();
            }
        }

        let log = Log::default();
        let registry = Rc::new(PhysicsObjectRegistry::new());
        let clearer = object_handle(Clearer { registry: registry.clone() });
        let b = recorder("b", &log);

        registry.add([&clearer, &b]);
        registry.update_physics();

        assert!(entries(&log).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_readded_during_pass_is_not_visited_twice() {
        struct Rejoiner {
            registry: Rc<PhysicsObjectRegistry>,
            me: Weak<RefCell<dyn PhysicsObject>>,
            log: Log,
        }

        impl PhysicsObject for Rejoiner {
            fn update_physics(&mut self) {
                self.log.borrow_mut().push("physics:rejoiner".to_string());
                if let Some(me) = self.me.upgrade() {
                    self.registry.remove([&me]);
                    self.registry.add([&me]);
                }
            }
        }

        let log = Log::default();
        let registry = Rc::new(PhysicsObjectRegistry::new());
        let a = recorder("a", &log);
        let rejoiner: ObjectHandle = Rc::new_cyclic(|me: &Weak<RefCell<Rejoiner>>| {
            let me: Weak<RefCell<dyn PhysicsObject>> = me.clone();
            RefCell::new(Rejoiner {
                registry: registry.clone(),
                me,
                log: log.clone(),
            })
        });
        let c = recorder("c", &log);

        registry.add([&a, &rejoiner, &c]);
        registry.update_physics();

        assert_eq!(
            entries(&log),
            vec!["physics:a", "physics:rejoiner", "physics:c"]
        );
        assert!(registry.contains(&rejoiner));
        assert_eq!(registry.len(), 3);

        // Re-adding moved it to the back; the next pass visits it once, last.
        log.borrow_mut().clear();
        registry.update_physics();
        assert_eq!(
            entries(&log),
            vec!["physics:a", "physics:c", "physics:rejoiner"]
        );
    }
}
