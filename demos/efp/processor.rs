use pdevs::error::SimulationError;
use pdevs::modeling::atomic::{Atomic, AtomicState, ACTIVE, PASSIVE};
use pdevs::modeling::port::Port;
use pdevs::modeling::Shared;

use crate::job::Job;

/// Serves one job at a time for a fixed processing time. Jobs arriving
/// while busy are dropped; an arrival only shortens the bookkeeping of the
/// remaining service time.
pub struct Processor {
    state: AtomicState,
    i_in: Shared<Port>,
    o_out: Shared<Port>,
    current_job: Job,
    processing_time: f64,
}

impl Processor {
    pub fn new(name: &str, processing_time: f64) -> Self {
        let mut state = AtomicState::new(name);
        let i_in = Port::new::<Job>("iIn");
        let o_out = Port::new::<Job>("oOut");
        state.component_mut().add_in_port(&i_in);
        state.component_mut().add_out_port(&o_out);
        Self {
            state,
            i_in,
            o_out,
            current_job: Job::default(),
            processing_time,
        }
    }

    pub fn in_port(&self) -> Shared<Port> {
        self.i_in.clone()
    }

    pub fn out_port(&self) -> Shared<Port> {
        self.o_out.clone()
    }
}

impl Atomic for Processor {
    fn state(&self) -> &AtomicState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AtomicState {
        &mut self.state
    }

    fn initialize(&mut self) -> Result<(), SimulationError> {
        self.passivate();
        Ok(())
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.passivate();
        Ok(())
    }

    fn external_transition(&mut self, elapsed: f64) -> Result<(), SimulationError> {
        if self.phase_is(PASSIVE) {
            self.current_job = self.i_in.borrow().first_value::<Job>()?;
            let processing_time = self.processing_time;
            self.hold_in(ACTIVE, processing_time);
        } else {
            let remaining = self.state().sigma() - elapsed;
            self.hold_in(ACTIVE, remaining);
        }
        Ok(())
    }

    fn output(&mut self) -> Result<(), SimulationError> {
        self.o_out.borrow_mut().add_value(self.current_job.clone())?;
        Ok(())
    }
}
