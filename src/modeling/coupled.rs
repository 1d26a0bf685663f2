use crate::error::SimulationError;
use crate::modeling::atomic::Atomic;
use crate::modeling::component::{Component, ComponentUid};
use crate::modeling::coupling::Coupling;
use crate::modeling::port::Port;
use crate::modeling::Shared;

/// A child of a coupled model: either an atomic model behind its behavior
/// trait, or a nested coupled model.
pub enum ChildModel {
    Atomic(Box<dyn Atomic>),
    Coupled(Coupled),
}

impl std::fmt::Debug for ChildModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChildModel::Atomic(_) => f.write_str("Atomic(..)"),
            ChildModel::Coupled(_) => f.write_str("Coupled(..)"),
        }
    }
}

impl ChildModel {
    /// Name of the child.
    pub fn name(&self) -> &str {
        self.component().name()
    }

    /// The child's underlying component.
    pub fn component(&self) -> &Component {
        match self {
            ChildModel::Atomic(model) => model.component(),
            ChildModel::Coupled(model) => model.component(),
        }
    }

    fn set_parent(&mut self, uid: ComponentUid) {
        match self {
            ChildModel::Atomic(model) => model.component_mut().set_parent(uid),
            ChildModel::Coupled(model) => model.component_mut().set_parent(uid),
        }
    }
}

/// A component that owns child components and the coupling sets wiring
/// them together, forming the model tree.
///
/// Couplings are classified on declaration: EIC if the source port belongs
/// to this model, EOC if the destination port does, IC otherwise.
pub struct Coupled {
    component: Component,
    components: Vec<ChildModel>,
    ic: Vec<Coupling>,
    eic: Vec<Coupling>,
    eoc: Vec<Coupling>,
}

impl Coupled {
    /// Create an empty coupled model.
    pub fn new(name: &str) -> Self {
        Self {
            component: Component::new(name),
            components: Vec::new(),
            ic: Vec::new(),
            eic: Vec::new(),
            eoc: Vec::new(),
        }
    }

    /// Name of the coupled model.
    pub fn name(&self) -> &str {
        self.component.name()
    }

    /// The underlying component.
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// The underlying component, mutably.
    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }

    /// Declare an input port on the coupled model itself.
    pub fn add_in_port(&mut self, port: &Shared<Port>) {
        self.component.add_in_port(port);
    }

    /// Declare an output port on the coupled model itself.
    pub fn add_out_port(&mut self, port: &Shared<Port>) {
        self.component.add_out_port(port);
    }

    /// Input port with the given name.
    pub fn get_in_port(&self, name: &str) -> Result<Shared<Port>, SimulationError> {
        self.component.get_in_port(name)
    }

    /// Output port with the given name.
    pub fn get_out_port(&self, name: &str) -> Result<Shared<Port>, SimulationError> {
        self.component.get_out_port(name)
    }

    /// Take ownership of an atomic model as a child.
    pub fn add_component<A: Atomic + 'static>(&mut self, model: A) {
        self.add_child(ChildModel::Atomic(Box::new(model)));
    }

    /// Take ownership of a coupled model as a child.
    pub fn add_coupled(&mut self, model: Coupled) {
        self.add_child(ChildModel::Coupled(model));
    }

    fn add_child(&mut self, mut child: ChildModel) {
        child.set_parent(self.component.uid());
        self.components.push(child);
    }

    /// All children, in insertion order.
    pub fn components(&self) -> &[ChildModel] {
        &self.components
    }

    /// Child with the given name.
    pub fn component_by_name(&self, name: &str) -> Result<&ChildModel, SimulationError> {
        self.components
            .iter()
            .find(|child| child.name() == name)
            .ok_or_else(|| SimulationError::UnknownComponent {
                parent: self.name().to_string(),
                child: name.to_string(),
            })
    }

    /// Declare a coupling from `from` to `to`.
    ///
    /// Both ports must already be claimed by a component and must carry
    /// the same element type; the coupling is then classified into the
    /// EIC, EOC, or IC set by comparing the port parents against this
    /// model.
    pub fn add_coupling(
        &mut self,
        from: &Shared<Port>,
        to: &Shared<Port>,
    ) -> Result<(), SimulationError> {
        let from_parent = from
            .borrow()
            .parent()
            .ok_or_else(|| SimulationError::DetachedPort(from.borrow().name().to_string()))?;
        let to_parent = to
            .borrow()
            .parent()
            .ok_or_else(|| SimulationError::DetachedPort(to.borrow().name().to_string()))?;
        let coupling = Coupling::new(from, to)?;
        if from_parent == self.component.uid() {
            self.eic.push(coupling);
        } else if to_parent == self.component.uid() {
            self.eoc.push(coupling);
        } else {
            self.ic.push(coupling);
        }
        Ok(())
    }

    /// The internal coupling set.
    pub fn ic(&self) -> &[Coupling] {
        &self.ic
    }

    /// The external-input coupling set.
    pub fn eic(&self) -> &[Coupling] {
        &self.eic
    }

    /// The external-output coupling set.
    pub fn eoc(&self) -> &[Coupling] {
        &self.eoc
    }

    /// Number of components in the tree rooted here, split into
    /// `(atomic, coupled)`. Counts this model itself as one coupled.
    pub fn count_components(&self) -> (usize, usize) {
        let (mut n_atomic, mut n_coupled) = (0, 1);
        for child in &self.components {
            match child {
                ChildModel::Atomic(_) => n_atomic += 1,
                ChildModel::Coupled(model) => {
                    let (a, c) = model.count_components();
                    n_atomic += a;
                    n_coupled += c;
                }
            }
        }
        (n_atomic, n_coupled)
    }

    /// Number of couplings in the tree rooted here, split into
    /// `(ic, eic, eoc)`.
    pub fn count_couplings(&self) -> (usize, usize, usize) {
        let (mut n_ic, mut n_eic, mut n_eoc) = (self.ic.len(), self.eic.len(), self.eoc.len());
        for child in &self.components {
            if let ChildModel::Coupled(model) = child {
                let (ic, eic, eoc) = model.count_couplings();
                n_ic += ic;
                n_eic += eic;
                n_eoc += eoc;
            }
        }
        (n_ic, n_eic, n_eoc)
    }

    /// True if none of this model's own input ports holds a value.
    pub fn is_input_empty(&self) -> bool {
        self.component.is_input_empty()
    }

    /// Empty this model's own input and output ports.
    pub fn clear_ports(&self) {
        self.component.clear_ports();
    }

    /// Move the children out, leaving the ports and coupling sets behind.
    /// Used by the coordinator when the simulation hierarchy takes
    /// ownership of the model tree.
    pub(crate) fn take_components(&mut self) -> Vec<ChildModel> {
        std::mem::take(&mut self.components)
    }
}
