use pdevs::error::SimulationError;
use pdevs::modeling::atomic::{Atomic, AtomicState, ACTIVE};
use pdevs::modeling::port::Port;
use pdevs::modeling::Shared;

use crate::job::Job;

/// Watches jobs entering and leaving the processor for a fixed observation
/// window, then reports throughput and turnaround statistics and tells the
/// generator to stop.
pub struct Transducer {
    state: AtomicState,
    i_arrived: Shared<Port>,
    i_solved: Shared<Port>,
    o_out: Shared<Port>,
    jobs_arrived: Vec<Job>,
    jobs_solved: Vec<Job>,
    observation_time: f64,
    total_ta: f64,
    clock: f64,
}

impl Transducer {
    pub fn new(name: &str, observation_time: f64) -> Self {
        let mut state = AtomicState::new(name);
        let i_arrived = Port::new::<Job>("iArrived");
        let i_solved = Port::new::<Job>("iSolved");
        let o_out = Port::new::<Job>("oOut");
        state.component_mut().add_in_port(&i_arrived);
        state.component_mut().add_in_port(&i_solved);
        state.component_mut().add_out_port(&o_out);
        Self {
            state,
            i_arrived,
            i_solved,
            o_out,
            jobs_arrived: Vec::new(),
            jobs_solved: Vec::new(),
            observation_time,
            total_ta: 0.0,
            clock: 0.0,
        }
    }

    pub fn arrived_port(&self) -> Shared<Port> {
        self.i_arrived.clone()
    }

    pub fn solved_port(&self) -> Shared<Port> {
        self.i_solved.clone()
    }

    pub fn out_port(&self) -> Shared<Port> {
        self.o_out.clone()
    }

    fn report(&self) {
        let mut throughput = 0.0;
        let mut avg_ta_time = 0.0;
        if !self.jobs_solved.is_empty() {
            avg_ta_time = self.total_ta / self.jobs_solved.len() as f64;
            if self.clock > 0.0 {
                throughput = self.jobs_solved.len() as f64 / self.clock;
            }
        }
        println!("End time: {}", self.clock);
        println!("Jobs arrived: {}", self.jobs_arrived.len());
        println!("Jobs solved: {}", self.jobs_solved.len());
        println!("Average TA: {}", avg_ta_time);
        println!("Throughput: {}", throughput);
    }
}

impl Atomic for Transducer {
    fn state(&self) -> &AtomicState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AtomicState {
        &mut self.state
    }

    fn initialize(&mut self) -> Result<(), SimulationError> {
        let observation_time = self.observation_time;
        self.hold_in(ACTIVE, observation_time);
        Ok(())
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        let sigma = self.state().sigma();
        self.clock += sigma;
        if self.phase_is(ACTIVE) {
            self.report();
            self.hold_in("done", 0.0);
        } else {
            self.passivate();
        }
        Ok(())
    }

    fn external_transition(&mut self, elapsed: f64) -> Result<(), SimulationError> {
        self.clock += elapsed;
        if self.phase_is(ACTIVE) {
            if !self.i_arrived.borrow().is_empty() {
                let mut job = self.i_arrived.borrow().first_value::<Job>()?;
                job.time = self.clock;
                println!("Start job {} @ t = {}", job.id, self.clock);
                self.jobs_arrived.push(job);
            }
            if !self.i_solved.borrow().is_empty() {
                let mut job = self.i_solved.borrow().first_value::<Job>()?;
                self.total_ta += self.clock - job.time;
                println!("Finish job {} @ t = {}", job.id, self.clock);
                job.time = self.clock;
                self.jobs_solved.push(job);
            }
        }
        let phase = self.state().phase().to_string();
        let remaining = self.state().sigma() - elapsed;
        self.hold_in(&phase, remaining);
        Ok(())
    }

    fn output(&mut self) -> Result<(), SimulationError> {
        if self.phase_is("done") {
            self.o_out.borrow_mut().add_value(Job::default())?;
        }
        Ok(())
    }
}
