pub mod atomic;
pub mod component;
pub mod coupled;
pub mod coupling;
pub mod message;
pub mod port;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle used across the model graph: a port is referenced by its
/// owning component, by the model that declared it, and by couplings. The
/// kernel is single-threaded by design, so plain reference counting is
/// enough.
pub type Shared<T> = Rc<RefCell<T>>;

pub use atomic::{Atomic, AtomicState, ACTIVE, PASSIVE};
pub use component::{Component, ComponentUid};
pub use coupled::{ChildModel, Coupled};
pub use coupling::Coupling;
pub use message::{Message, MessageData};
pub use port::Port;
