use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::error::SimulationError;
use crate::modeling::port::Port;
use crate::modeling::Shared;

/// Instance identity of a component.
///
/// Ports and child components carry the uid of their owner as a weak
/// back-reference; coupling classification compares uids instead of
/// chasing ownership edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentUid(Uuid);

impl ComponentUid {
    pub(crate) fn new() -> Self {
        ComponentUid(Uuid::new_v4())
    }
}

impl fmt::Display for ComponentUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named node of the model tree: ordered input/output port lists plus a
/// weak reference to the parent component.
///
/// Names must be unique among siblings; the uid is unique per instance.
pub struct Component {
    name: String,
    uid: ComponentUid,
    parent: Option<ComponentUid>,
    in_ports: Vec<Shared<Port>>,
    out_ports: Vec<Shared<Port>>,
}

impl Component {
    /// Create a component with no ports and no parent.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            uid: ComponentUid::new(),
            parent: None,
            in_ports: Vec::new(),
            out_ports: Vec::new(),
        }
    }

    /// Name of the component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance identity of the component.
    pub fn uid(&self) -> ComponentUid {
        self.uid
    }

    /// Identity of the parent component, if any.
    pub fn parent(&self) -> Option<ComponentUid> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, uid: ComponentUid) {
        self.parent = Some(uid);
    }

    /// Declare an input port, claiming it for this component.
    pub fn add_in_port(&mut self, port: &Shared<Port>) {
        port.borrow_mut().set_parent(self.uid);
        self.in_ports.push(Rc::clone(port));
    }

    /// Declare an output port, claiming it for this component.
    pub fn add_out_port(&mut self, port: &Shared<Port>) {
        port.borrow_mut().set_parent(self.uid);
        self.out_ports.push(Rc::clone(port));
    }

    /// Input port with the given name.
    pub fn get_in_port(&self, name: &str) -> Result<Shared<Port>, SimulationError> {
        self.find_port(&self.in_ports, name)
    }

    /// Output port with the given name.
    pub fn get_out_port(&self, name: &str) -> Result<Shared<Port>, SimulationError> {
        self.find_port(&self.out_ports, name)
    }

    /// All input ports, in declaration order.
    pub fn in_ports(&self) -> &[Shared<Port>] {
        &self.in_ports
    }

    /// All output ports, in declaration order.
    pub fn out_ports(&self) -> &[Shared<Port>] {
        &self.out_ports
    }

    /// True if none of the input ports holds a value.
    pub fn is_input_empty(&self) -> bool {
        self.in_ports.iter().all(|port| port.borrow().is_empty())
    }

    /// Empty every input and output port. Idempotent.
    pub fn clear_ports(&self) {
        for port in self.in_ports.iter().chain(self.out_ports.iter()) {
            port.borrow_mut().clear();
        }
    }

    fn find_port(
        &self,
        ports: &[Shared<Port>],
        name: &str,
    ) -> Result<Shared<Port>, SimulationError> {
        ports
            .iter()
            .find(|port| port.borrow().name() == name)
            .cloned()
            .ok_or_else(|| SimulationError::UnknownPort {
                component: self.name.clone(),
                port: name.to_string(),
            })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: Inports [", self.name)?;
        for port in &self.in_ports {
            write!(f, " {}", port.borrow().name())?;
        }
        write!(f, " ] Outports [")?;
        for port in &self.out_ports {
            write!(f, " {}", port.borrow().name())?;
        }
        write!(f, " ]")
    }
}
