use log::trace;

use crate::error::SimulationError;
use crate::modeling::atomic::Atomic;
use crate::modeling::Shared;
use crate::simulation::clock::Clock;

/// Operations every simulator exposes to its parent coordinator, plus the
/// timing state (`t_last`, `t_next`) the scheduling algorithm reads.
pub trait AbstractSimulator {
    /// Prepare the node for simulation and compute its first `t_next`.
    fn initialize(&mut self) -> Result<(), SimulationError>;

    /// Tear down after the run. Cascades through the hierarchy.
    fn exit(&mut self) -> Result<(), SimulationError>;

    /// Time remaining until this node's next scheduled event.
    fn time_advance(&self) -> f64;

    /// Invoke output functions of imminent models.
    fn collect(&mut self) -> Result<(), SimulationError>;

    /// Run the transition functions due at the current clock time.
    fn transition(&mut self) -> Result<(), SimulationError>;

    /// Empty every port below this node.
    fn clear(&mut self);

    /// Time of this node's last transition.
    fn t_last(&self) -> f64;

    /// Absolute time of this node's next scheduled event.
    fn t_next(&self) -> f64;
}

/// Timing state common to leaf simulators and coordinators: the shared
/// clock plus the `t_last`/`t_next` pair, recomputed every step.
pub struct SimulatorBase {
    clock: Shared<Clock>,
    t_last: f64,
    t_next: f64,
}

impl SimulatorBase {
    /// Create timing state bound to the given clock.
    pub fn new(clock: Shared<Clock>) -> Self {
        Self {
            clock,
            t_last: 0.0,
            t_next: 0.0,
        }
    }

    /// The shared simulation clock.
    pub fn clock(&self) -> &Shared<Clock> {
        &self.clock
    }

    /// Current time on the shared clock.
    pub fn time(&self) -> f64 {
        self.clock.borrow().time()
    }

    /// Time of the last transition.
    pub fn t_last(&self) -> f64 {
        self.t_last
    }

    /// Set the time of the last transition.
    pub fn set_t_last(&mut self, t_last: f64) {
        self.t_last = t_last;
    }

    /// Absolute time of the next scheduled event.
    pub fn t_next(&self) -> f64 {
        self.t_next
    }

    /// Set the absolute time of the next scheduled event.
    pub fn set_t_next(&mut self, t_next: f64) {
        self.t_next = t_next;
    }
}

/// Leaf simulator driving one atomic model.
///
/// The parent coordinator calls `collect`, `transition`, and `clear` once
/// per cycle; the three-way transition dispatch lives here.
pub struct Simulator {
    base: SimulatorBase,
    model: Box<dyn Atomic>,
}

impl Simulator {
    /// Create a simulator for an atomic model on the given clock.
    pub fn new(clock: Shared<Clock>, model: Box<dyn Atomic>) -> Self {
        Self {
            base: SimulatorBase::new(clock),
            model,
        }
    }

    /// The atomic model attached to this simulator.
    pub fn model(&self) -> &dyn Atomic {
        self.model.as_ref()
    }
}

impl AbstractSimulator for Simulator {
    fn initialize(&mut self) -> Result<(), SimulationError> {
        self.model.initialize()?;
        let t = self.base.time();
        self.base.set_t_last(t);
        self.base.set_t_next(t + self.model.time_advance());
        Ok(())
    }

    fn exit(&mut self) -> Result<(), SimulationError> {
        self.model.exit()
    }

    fn time_advance(&self) -> f64 {
        self.model.time_advance()
    }

    fn collect(&mut self) -> Result<(), SimulationError> {
        if self.base.time() == self.base.t_next() {
            self.model.output()?;
        }
        Ok(())
    }

    fn transition(&mut self) -> Result<(), SimulationError> {
        let t = self.base.time();
        let input_empty = self.model.component().is_input_empty();
        if !input_empty || t == self.base.t_next() {
            if input_empty {
                // Timed out with no input: internal transition.
                trace!("'{}' internal transition at t = {}", self.model.component().name(), t);
                self.model.internal_transition()?;
            } else {
                let elapsed = t - self.base.t_last();
                if t == self.base.t_next() {
                    // Timeout and input coincide: confluent transition.
                    trace!("'{}' confluent transition at t = {}", self.model.component().name(), t);
                    self.model.confluent_transition(elapsed)?;
                } else {
                    // Input only: external transition.
                    trace!("'{}' external transition at t = {}", self.model.component().name(), t);
                    self.model.external_transition(elapsed)?;
                }
            }
            self.base.set_t_last(t);
            self.base.set_t_next(t + self.model.time_advance());
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.model.component().clear_ports();
    }

    fn t_last(&self) -> f64 {
        self.base.t_last()
    }

    fn t_next(&self) -> f64 {
        self.base.t_next()
    }
}
