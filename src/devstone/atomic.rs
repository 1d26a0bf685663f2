use crate::devstone::TransitionCounters;
use crate::error::SimulationError;
use crate::modeling::atomic::{Atomic, AtomicState, ACTIVE};
use crate::modeling::port::Port;
use crate::modeling::Shared;

/// The DEVStone atomic: passive until stimulated, then active for
/// `prep_time` before emitting and passivating again. Every transition is
/// recorded in the shared counters.
pub struct DevStoneAtomic {
    state: AtomicState,
    i_in: Shared<Port>,
    o_out: Shared<Port>,
    use_out: bool,
    prep_time: f64,
    counters: TransitionCounters,
}

impl DevStoneAtomic {
    pub(crate) fn new(
        name: &str,
        prep_time: f64,
        use_out: bool,
        counters: &TransitionCounters,
    ) -> Self {
        let mut state = AtomicState::new(name);
        let i_in = Port::new::<i32>("iIn");
        let o_out = Port::new::<i32>("oOut");
        state.component_mut().add_in_port(&i_in);
        state.component_mut().add_out_port(&o_out);
        Self {
            state,
            i_in,
            o_out,
            use_out,
            prep_time,
            counters: counters.clone(),
        }
    }

    pub(crate) fn in_port(&self) -> Shared<Port> {
        self.i_in.clone()
    }

    pub(crate) fn out_port(&self) -> Shared<Port> {
        self.o_out.clone()
    }
}

impl Atomic for DevStoneAtomic {
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
        self.counters.record_internal();
        self.passivate();
        Ok(())
    }

    fn external_transition(&mut self, _elapsed: f64) -> Result<(), SimulationError> {
        self.counters.record_external();
        let prep_time = self.prep_time;
        self.hold_in(ACTIVE, prep_time);
        Ok(())
    }

    fn output(&mut self) -> Result<(), SimulationError> {
        if self.use_out {
            self.o_out.borrow_mut().add_value(0i32)?;
        }
        Ok(())
    }
}
