use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::error::SimulationError;
use crate::modeling::component::ComponentUid;
use crate::modeling::message::{Message, MessageData};
use crate::modeling::Shared;

/// Typed, ordered message bag attached to exactly one component.
///
/// The element type is fixed at creation and enforced on every insertion
/// and on coupling construction. Values are appended in FIFO order within
/// one simulation cycle and the whole bag is cleared at the end of it.
pub struct Port {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    parent: Option<ComponentUid>,
    bag: Vec<Message>,
}

impl Port {
    /// Create a detached port carrying values of type `T`.
    ///
    /// The returned handle is shared between the owning component, the
    /// model that declared it, and any couplings referencing it.
    pub fn new<T: MessageData>(name: &str) -> Shared<Port> {
        Rc::new(RefCell::new(Port {
            name: name.to_string(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            parent: None,
            bag: Vec::new(),
        }))
    }

    /// Name of the port.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the declared element type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of values currently stored in the bag.
    pub fn len(&self) -> usize {
        self.bag.len()
    }

    /// True if the bag holds no values.
    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }

    /// Remove every value from the bag. The declared type is unchanged.
    pub fn clear(&mut self) {
        self.bag.clear();
    }

    /// Append a single value.
    ///
    /// Fails with a type mismatch if `T` is not the declared element type;
    /// the bag is left untouched on that path.
    pub fn add_value<T: MessageData>(&mut self, value: T) -> Result<(), SimulationError> {
        self.check_type::<T>()?;
        self.bag.push(Message::new(value));
        Ok(())
    }

    /// Append many values in order.
    ///
    /// The type check runs once, before any value is appended, so a
    /// mismatch never partially mutates the bag.
    pub fn add_values<T, I>(&mut self, values: I) -> Result<(), SimulationError>
    where
        T: MessageData,
        I: IntoIterator<Item = T>,
    {
        self.check_type::<T>()?;
        self.bag.extend(values.into_iter().map(Message::new));
        Ok(())
    }

    /// Read the first value in the bag.
    pub fn first_value<T: MessageData>(&self) -> Result<T, SimulationError> {
        let msg = self
            .bag
            .first()
            .ok_or_else(|| SimulationError::EmptyPort(self.name.clone()))?;
        self.downcast(msg)
    }

    /// Read every value in the bag, in append order.
    pub fn values<T: MessageData>(&self) -> Result<Vec<T>, SimulationError> {
        self.check_type::<T>()?;
        self.bag.iter().map(|msg| self.downcast(msg)).collect()
    }

    /// The owning component, if this port has been claimed.
    pub fn parent(&self) -> Option<ComponentUid> {
        self.parent
    }

    /// Claim this port for a component. Called once, at declaration time.
    pub(crate) fn set_parent(&mut self, uid: ComponentUid) {
        self.parent = Some(uid);
    }

    pub(crate) fn element_type(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn messages(&self) -> &[Message] {
        &self.bag
    }

    /// Append already-wrapped messages, used by coupling propagation.
    pub(crate) fn add_messages(&mut self, messages: &[Message]) -> Result<(), SimulationError> {
        if let Some(msg) = messages.iter().find(|msg| msg.type_id() != self.type_id) {
            return Err(self.mismatch(msg.type_name()));
        }
        self.bag.extend_from_slice(messages);
        Ok(())
    }

    fn check_type<T: MessageData>(&self) -> Result<(), SimulationError> {
        if TypeId::of::<T>() != self.type_id {
            let err = self.mismatch(std::any::type_name::<T>());
            trace!("rejected insertion on '{}': {}", self.name, err);
            return Err(err);
        }
        Ok(())
    }

    fn downcast<T: MessageData>(&self, msg: &Message) -> Result<T, SimulationError> {
        msg.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| self.mismatch(std::any::type_name::<T>()))
    }

    fn mismatch(&self, found: &'static str) -> SimulationError {
        SimulationError::TypeMismatch {
            port: self.name.clone(),
            expected: self.type_name,
            found,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("len", &self.bag.len())
            .finish()
    }
}
