//! # Core participant types
//!
//! - **PhysicsObject**: the trait every participant implements
//! - **ObjectHandle**: shared handle hosts keep; the registry only holds weak copies
//! - **PhysicsObjectRegistry**: ordered membership that survives mutation mid-pass
//!
//! ## Participant Lifecycle
//!
//! 1. **Spawn** - host creates the object and wraps it with [`object_handle`]
//! 2. **Register** - `add()` appends it to the registry (duplicates ignored)
//! 3. **Update** - `update_physics()` once per fixed step, `update_graphics()` once per frame
//! 4. **Despawn** - `remove()` or simply dropping the last strong handle

pub mod object;
pub mod registry;

pub use object::{object_handle, ObjectHandle, PhysicsObject};
pub use registry::PhysicsObjectRegistry;
