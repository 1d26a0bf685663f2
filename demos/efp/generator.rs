use pdevs::error::SimulationError;
use pdevs::modeling::atomic::{Atomic, AtomicState, ACTIVE};
use pdevs::modeling::port::Port;
use pdevs::modeling::Shared;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};

use crate::job::Job;

enum Period {
    Fixed(f64),
    Exponential { distribution: Exp<f64>, rng: StdRng },
}

/// Emits a fresh job after every period; any incoming message on the stop
/// port passivates it for the rest of the run.
pub struct Generator {
    state: AtomicState,
    i_start: Shared<Port>,
    i_stop: Shared<Port>,
    o_out: Shared<Port>,
    job_counter: u64,
    period: Period,
}

impl Generator {
    pub fn new(name: &str, period: f64) -> Self {
        Self::with_period(name, Period::Fixed(period))
    }

    /// Generator with exponentially distributed periods, seeded for
    /// reproducible runs.
    pub fn with_exponential_period(name: &str, mean_period: f64, seed: u64) -> Self {
        let distribution = Exp::new(1.0 / mean_period).expect("mean period must be positive");
        Self::with_period(
            name,
            Period::Exponential {
                distribution,
                rng: StdRng::seed_from_u64(seed),
            },
        )
    }

    fn with_period(name: &str, period: Period) -> Self {
        let mut state = AtomicState::new(name);
        let i_start = Port::new::<Job>("iStart");
        let i_stop = Port::new::<Job>("iStop");
        let o_out = Port::new::<Job>("oOut");
        state.component_mut().add_in_port(&i_start);
        state.component_mut().add_in_port(&i_stop);
        state.component_mut().add_out_port(&o_out);
        Self {
            state,
            i_start,
            i_stop,
            o_out,
            job_counter: 0,
            period,
        }
    }

    pub fn start_port(&self) -> Shared<Port> {
        self.i_start.clone()
    }

    pub fn stop_port(&self) -> Shared<Port> {
        self.i_stop.clone()
    }

    pub fn out_port(&self) -> Shared<Port> {
        self.o_out.clone()
    }

    fn next_period(&mut self) -> f64 {
        match &mut self.period {
            Period::Fixed(period) => *period,
            Period::Exponential { distribution, rng } => distribution.sample(rng),
        }
    }
}

impl Atomic for Generator {
    fn state(&self) -> &AtomicState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AtomicState {
        &mut self.state
    }

    fn initialize(&mut self) -> Result<(), SimulationError> {
        self.job_counter = 1;
        let period = self.next_period();
        self.hold_in(ACTIVE, period);
        Ok(())
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.job_counter += 1;
        let period = self.next_period();
        self.hold_in(ACTIVE, period);
        Ok(())
    }

    fn external_transition(&mut self, _elapsed: f64) -> Result<(), SimulationError> {
        self.passivate();
        Ok(())
    }

    fn output(&mut self) -> Result<(), SimulationError> {
        let job = Job::new(&self.job_counter.to_string());
        self.o_out.borrow_mut().add_value(job)?;
        Ok(())
    }
}
