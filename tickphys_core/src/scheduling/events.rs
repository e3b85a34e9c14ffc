//! Phase notifications.
//!
//! Every phase has its own ordered subscriber list. Subscribers run
//! synchronously in subscription order; unsubscribing keeps the order of the
//! remaining subscribers.

use std::fmt;

/// The phases of a tick, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TickPhase {
    /// Once per tick, before anything else, even with physics disabled.
    ReadInput,
    /// Once per fixed step, carrying the new fixed frame count.
    ProcessInput,
    /// Once per fixed step: registry physics pass, then subscribers.
    PrePhysicsUpdate,
    /// Once per fixed step: the injected world stepper.
    WorldStep,
    /// Once per physics-enabled tick: registry visual pass, then subscribers.
    GraphicsSync,
}

impl fmt::Display for TickPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickPhase::ReadInput => write!(f, "read-input"),
            TickPhase::ProcessInput => write!(f, "process-input"),
            TickPhase::PrePhysicsUpdate => write!(f, "pre-physics-update"),
            TickPhase::WorldStep => write!(f, "world-step"),
            TickPhase::GraphicsSync => write!(f, "graphics-sync"),
        }
    }
}

/// Token returned by every subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Channel<F: ?Sized> {
    subscribers: Vec<(SubscriptionId, Box<F>)>,
}

impl<F: ?Sized> Default for Channel<F> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<F: ?Sized> Channel<F> {
    fn push(&mut self, id: SubscriptionId, callback: Box<F>) {
        self.subscribers.push((id, callback));
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(known, _)| *known != id);
        self.subscribers.len() != before
    }

    fn len(&self) -> usize {
        self.subscribers.len()
    }
}

impl Channel<dyn FnMut()> {
    fn emit(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback();
        }
    }
}

impl Channel<dyn FnMut(u64)> {
    fn emit(&mut self, fixed_frame_count: u64) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(fixed_frame_count);
        }
    }
}

/// Subscriber lists for the four public notifications.
#[derive(Default)]
pub struct PhaseEvents {
    next_id: u64,
    read_input: Channel<dyn FnMut()>,
    process_input: Channel<dyn FnMut(u64)>,
    pre_physics_update: Channel<dyn FnMut()>,
    graphics_sync: Channel<dyn FnMut()>,
}

impl PhaseEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Fired once per tick, first, regardless of the physics gate.
    pub fn on_read_input(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.read_input.push(id, Box::new(callback));
        id
    }

    /// Fired once per fixed step with the step's fixed frame count.
    pub fn on_process_input(&mut self, callback: impl FnMut(u64) + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.process_input.push(id, Box::new(callback));
        id
    }

    /// Fired once per fixed step, after every participant's `update_physics`.
    pub fn on_pre_physics_update(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.pre_physics_update.push(id, Box::new(callback));
        id
    }

    /// Fired once per physics-enabled tick, after every participant's `update_graphics`.
    pub fn on_graphics_sync(&mut self, callback: impl FnMut() + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.graphics_sync.push(id, Box::new(callback));
        id
    }

    /// Remove a subscription from whichever phase holds it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.read_input.remove(id)
            || self.process_input.remove(id)
            || self.pre_physics_update.remove(id)
            || self.graphics_sync.remove(id)
    }

    /// Number of subscribers attached to `phase`. `WorldStep` has none.
    pub fn subscriber_count(&self, phase: TickPhase) -> usize {
        match phase {
            TickPhase::ReadInput => self.read_input.len(),
            TickPhase::ProcessInput => self.process_input.len(),
            TickPhase::PrePhysicsUpdate => self.pre_physics_update.len(),
            TickPhase::WorldStep => 0,
            TickPhase::GraphicsSync => self.graphics_sync.len(),
        }
    }

    pub(crate) fn emit_read_input(&mut self) {
        self.read_input.emit();
    }

    pub(crate) fn emit_process_input(&mut self, fixed_frame_count: u64) {
        self.process_input.emit(fixed_frame_count);
    }

    pub(crate) fn emit_pre_physics_update(&mut self) {
        self.pre_physics_update.emit();
    }

    pub(crate) fn emit_graphics_sync(&mut self) {
        self.graphics_sync.emit();
    }
}
