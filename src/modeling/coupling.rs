use std::fmt;
use std::rc::Rc;

use crate::error::SimulationError;
use crate::modeling::port::Port;
use crate::modeling::Shared;

/// Directed, type-checked edge between two ports.
///
/// Propagation is a copy-append from the source bag to the destination
/// bag; the source keeps its values until the surrounding clear phase.
pub struct Coupling {
    from: Shared<Port>,
    to: Shared<Port>,
}

impl fmt::Debug for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coupling").finish_non_exhaustive()
    }
}

impl Coupling {
    /// Create a coupling between two ports.
    ///
    /// Fails if the ports carry different element types, or if source and
    /// destination are the same port (the edge would be a self-loop).
    pub fn new(from: &Shared<Port>, to: &Shared<Port>) -> Result<Self, SimulationError> {
        if Rc::ptr_eq(from, to) {
            return Err(SimulationError::InvalidCoupling(format!(
                "source and destination are the same port '{}'",
                from.borrow().name()
            )));
        }
        {
            let (from_ref, to_ref) = (from.borrow(), to.borrow());
            if from_ref.element_type() != to_ref.element_type() {
                return Err(SimulationError::TypeMismatch {
                    port: to_ref.name().to_string(),
                    expected: to_ref.type_name(),
                    found: from_ref.type_name(),
                });
            }
        }
        Ok(Self {
            from: Rc::clone(from),
            to: Rc::clone(to),
        })
    }

    /// Source port of the coupling.
    pub fn port_from(&self) -> &Shared<Port> {
        &self.from
    }

    /// Destination port of the coupling.
    pub fn port_to(&self) -> &Shared<Port> {
        &self.to
    }

    /// Copy every value in the source port to the destination port.
    pub fn propagate_values(&self) -> Result<(), SimulationError> {
        let from = self.from.borrow();
        self.to.borrow_mut().add_messages(from.messages())
    }
}

impl fmt::Display for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {})", self.from.borrow(), self.to.borrow())
    }
}
