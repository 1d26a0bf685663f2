use log::{debug, warn};

use crate::error::SimulationError;
use crate::modeling::coupled::{ChildModel, Coupled};
use crate::modeling::message::MessageData;
use crate::modeling::port::Port;
use crate::modeling::Shared;
use crate::simulation::clock::Clock;
use crate::simulation::simulator::{AbstractSimulator, Simulator, SimulatorBase};

/// Recursive composite simulator over a coupled model.
///
/// One simulator is built per child component (a nested `Coordinator` for
/// coupled children, a leaf `Simulator` for atomic ones), all sharing one
/// clock. Each cycle advances the clock to the minimum child `t_next`,
/// then runs collect, transition, and clear in that strict order.
///
/// The per-child work inside `collect` and `transition` touches disjoint
/// port sets and could be fanned out across workers in the future, with
/// barriers around `propagate_output`/`propagate_input`: no child may
/// transition before input propagation has completed, no propagation may
/// start while children are mid-phase, and each destination port may have
/// at most one writer context per phase. The current implementation is
/// single-threaded and fully deterministic.
pub struct Coordinator {
    base: SimulatorBase,
    model: Coupled,
    simulators: Vec<Box<dyn AbstractSimulator>>,
    total_iterations: u64,
    initialized: bool,
    exited: bool,
}

impl Coordinator {
    /// Create a coordinator for a coupled model on an existing clock.
    pub fn new(clock: Shared<Clock>, model: Coupled) -> Self {
        Self {
            base: SimulatorBase::new(clock),
            model,
            simulators: Vec::new(),
            total_iterations: 0,
            initialized: false,
            exited: false,
        }
    }

    /// Create a fresh clock at `initial_time` and a coordinator driving
    /// `model` as the root of a simulation.
    pub fn new_root(initial_time: f64, model: Coupled) -> Self {
        Self::new(Clock::shared(initial_time), model)
    }

    /// The coupled model associated with this coordinator.
    pub fn model(&self) -> &Coupled {
        &self.model
    }

    /// The shared simulation clock.
    pub fn clock(&self) -> &Shared<Clock> {
        self.base.clock()
    }

    /// The children simulators, one per child component.
    pub fn simulators(&self) -> &[Box<dyn AbstractSimulator>] {
        &self.simulators
    }

    /// Number of iterations simulated so far.
    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    /// Instantiate one simulator per child component, moving the children
    /// into the simulation hierarchy. Runs exactly once, from
    /// `initialize`.
    fn build_hierarchy(&mut self) {
        for child in self.model.take_components() {
            let simulator: Box<dyn AbstractSimulator> = match child {
                ChildModel::Coupled(coupled) => {
                    Box::new(Coordinator::new(self.base.clock().clone(), coupled))
                }
                ChildModel::Atomic(atomic) => {
                    Box::new(Simulator::new(self.base.clock().clone(), atomic))
                }
            };
            self.simulators.push(simulator);
        }
    }

    /// Copy values along every IC and EOC coupling.
    fn propagate_output(&mut self) -> Result<(), SimulationError> {
        for coupling in self.model.ic().iter().chain(self.model.eoc()) {
            coupling.propagate_values()?;
        }
        Ok(())
    }

    /// Copy values along every EIC coupling, so children see externally
    /// injected values before their own transitions run.
    fn propagate_input(&mut self) -> Result<(), SimulationError> {
        for coupling in self.model.eic() {
            coupling.propagate_values()?;
        }
        Ok(())
    }

    /// Inject values into a port after waiting an elapsed time `e`.
    ///
    /// The event must not fall past this coordinator's next scheduled
    /// event: on an out-of-bounds elapsed time the injection fails
    /// synchronously and the clock, ports, and timing fields are left
    /// untouched. On success the clock advances to the injection time and
    /// a transition cycle runs immediately.
    pub fn sim_inject<T, I>(
        &mut self,
        elapsed: f64,
        port: &Shared<Port>,
        values: I,
    ) -> Result<(), SimulationError>
    where
        T: MessageData,
        I: IntoIterator<Item = T>,
    {
        if !self.initialized {
            return Err(SimulationError::NotInitialized);
        }
        let time = self.base.time() + elapsed;
        if time > self.base.t_next() {
            let err = SimulationError::InjectionOutOfBounds {
                t_last: self.base.t_last(),
                elapsed,
                t_next: self.base.t_next(),
            };
            warn!("{}", err);
            return Err(err);
        }
        port.borrow_mut().add_values(values)?;
        debug!("injected input on '{}' at t = {}", port.borrow().name(), time);
        self.base.clock().borrow_mut().set_time(time);
        self.transition()?;
        self.clear();
        Ok(())
    }

    /// Run a single simulation cycle: advance the clock to `t_next`, then
    /// collect, transition, clear. Never in any other order.
    fn simulate_iteration(&mut self) -> Result<(), SimulationError> {
        let t_next = self.base.t_next();
        self.base.clock().borrow_mut().set_time(t_next);
        debug!("=== iteration {} | t = {} ===", self.total_iterations, t_next);
        self.collect()?;
        self.transition()?;
        self.clear();
        self.total_iterations += 1;
        Ok(())
    }

    /// Run up to `num_iterations` cycles, stopping early at quiescence
    /// (no event scheduled anywhere in the hierarchy).
    pub fn simulate_iterations(&mut self, mut num_iterations: u64) -> Result<(), SimulationError> {
        if !self.initialized {
            return Err(SimulationError::NotInitialized);
        }
        while num_iterations > 0 && self.base.t_next() < f64::INFINITY {
            self.simulate_iteration()?;
            num_iterations -= 1;
        }
        Ok(())
    }

    /// Run cycles until the next event would fall past
    /// `clock + time_interval`, then force the clock to that end time.
    pub fn simulate_time(&mut self, time_interval: f64) -> Result<(), SimulationError> {
        if !self.initialized {
            return Err(SimulationError::NotInitialized);
        }
        let t_final = self.base.time() + time_interval;
        while self.base.time() < f64::INFINITY && self.base.t_next() < t_final {
            self.simulate_iteration()?;
        }
        self.base.clock().borrow_mut().set_time(t_final);
        Ok(())
    }
}

impl AbstractSimulator for Coordinator {
    /// Build the simulator hierarchy, initialize every child, and compute
    /// this node's first `t_next`. Fails if called twice.
    fn initialize(&mut self) -> Result<(), SimulationError> {
        if self.initialized {
            return Err(SimulationError::AlreadyInitialized);
        }
        self.build_hierarchy();
        for simulator in &mut self.simulators {
            simulator.initialize()?;
        }
        let t = self.base.time();
        self.base.set_t_last(t);
        let ta = self.time_advance();
        self.base.set_t_next(t + ta);
        self.initialized = true;
        Ok(())
    }

    /// Cascade `exit` to every child simulator. Callable exactly once.
    fn exit(&mut self) -> Result<(), SimulationError> {
        if !self.initialized {
            return Err(SimulationError::NotInitialized);
        }
        if self.exited {
            return Err(SimulationError::AlreadyExited);
        }
        for simulator in &mut self.simulators {
            simulator.exit()?;
        }
        self.exited = true;
        Ok(())
    }

    /// Minimum child `t_next` minus the current clock time. Infinite for
    /// a coordinator with no children.
    fn time_advance(&self) -> f64 {
        let mut t_next = f64::INFINITY;
        for simulator in &self.simulators {
            t_next = t_next.min(simulator.t_next());
        }
        t_next - self.base.time()
    }

    /// Collect outputs from every child, then propagate them along the IC
    /// and EOC couplings.
    fn collect(&mut self) -> Result<(), SimulationError> {
        for simulator in &mut self.simulators {
            simulator.collect()?;
        }
        self.propagate_output()
    }

    /// Propagate inputs along the EIC couplings, run every child's
    /// transition, then recompute `t_last`/`t_next`.
    fn transition(&mut self) -> Result<(), SimulationError> {
        self.propagate_input()?;
        for simulator in &mut self.simulators {
            simulator.transition()?;
        }
        let t = self.base.time();
        self.base.set_t_last(t);
        let ta = self.time_advance();
        self.base.set_t_next(t + ta);
        Ok(())
    }

    /// Clear every child, then this coupled model's own ports.
    fn clear(&mut self) {
        for simulator in &mut self.simulators {
            simulator.clear();
        }
        self.model.clear_ports();
    }

    fn t_last(&self) -> f64 {
        self.base.t_last()
    }

    fn t_next(&self) -> f64 {
        self.base.t_next()
    }
}
