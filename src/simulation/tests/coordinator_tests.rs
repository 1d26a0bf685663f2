use std::cell::Cell;
use std::rc::Rc;

use crate::error::SimulationError;
use crate::modeling::atomic::{Atomic, AtomicState, ACTIVE};
use crate::modeling::coupled::Coupled;
use crate::modeling::port::Port;
use crate::modeling::Shared;
use crate::simulation::coordinator::Coordinator;
use crate::simulation::simulator::AbstractSimulator;

// One-shot model: waits `sigma` once, then passivates forever. External
// input re-arms it. Transition counts are observed through shared cells
// because the coordinator takes ownership of the model.
struct OneShot {
    state: AtomicState,
    i_in: Shared<Port>,
    sigma: f64,
    internal_count: Rc<Cell<u32>>,
    external_count: Rc<Cell<u32>>,
}

impl OneShot {
    fn new(name: &str, sigma: f64) -> Self {
        let mut state = AtomicState::new(name);
        let i_in = Port::new::<i32>("iIn");
        state.component_mut().add_in_port(&i_in);
        Self {
            state,
            i_in,
            sigma,
            internal_count: Rc::new(Cell::new(0)),
            external_count: Rc::new(Cell::new(0)),
        }
    }

    fn in_port(&self) -> Shared<Port> {
        self.i_in.clone()
    }

    fn counters(&self) -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        (self.internal_count.clone(), self.external_count.clone())
    }
}

impl Atomic for OneShot {
    fn state(&self) -> &AtomicState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AtomicState {
        &mut self.state
    }

    fn initialize(&mut self) -> Result<(), SimulationError> {
        let sigma = self.sigma;
        self.hold_in(ACTIVE, sigma);
        Ok(())
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.internal_count.set(self.internal_count.get() + 1);
        self.passivate();
        Ok(())
    }

    fn external_transition(&mut self, _elapsed: f64) -> Result<(), SimulationError> {
        self.external_count.set(self.external_count.get() + 1);
        let sigma = self.sigma;
        self.hold_in(ACTIVE, sigma);
        Ok(())
    }

    fn output(&mut self) -> Result<(), SimulationError> {
        Ok(())
    }
}

#[test]
fn test_time_advance_is_minimum_child_t_next() {
    let mut model = Coupled::new("top");
    model.add_component(OneShot::new("fast", 5.0));
    model.add_component(OneShot::new("slow", 7.0));

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();
    assert_eq!(coordinator.t_next(), 5.0);
    assert_eq!(coordinator.time_advance(), 5.0);
}

#[test]
fn test_childless_coordinator_has_infinite_time_advance() {
    let mut coordinator = Coordinator::new_root(0.0, Coupled::new("empty"));
    coordinator.initialize().unwrap();
    assert_eq!(coordinator.time_advance(), f64::INFINITY);
    assert_eq!(coordinator.t_next(), f64::INFINITY);
}

#[test]
fn test_initialize_runs_exactly_once() {
    let mut coordinator = Coordinator::new_root(0.0, Coupled::new("empty"));
    coordinator.initialize().unwrap();
    assert_eq!(
        coordinator.initialize().unwrap_err(),
        SimulationError::AlreadyInitialized
    );
}

#[test]
fn test_driving_before_initialize_fails() {
    let mut model = Coupled::new("top");
    let top_in = Port::new::<i32>("iIn");
    model.add_in_port(&top_in);

    let mut coordinator = Coordinator::new_root(0.0, model);
    assert_eq!(
        coordinator.simulate_iterations(1).unwrap_err(),
        SimulationError::NotInitialized
    );
    assert_eq!(
        coordinator.simulate_time(1.0).unwrap_err(),
        SimulationError::NotInitialized
    );
    assert_eq!(
        coordinator.sim_inject(0.0, &top_in, vec![1i32]).unwrap_err(),
        SimulationError::NotInitialized
    );
}

#[test]
fn test_exit_is_callable_exactly_once() {
    let mut coordinator = Coordinator::new_root(0.0, Coupled::new("empty"));
    assert_eq!(
        coordinator.exit().unwrap_err(),
        SimulationError::NotInitialized
    );
    coordinator.initialize().unwrap();
    coordinator.exit().unwrap();
    assert_eq!(
        coordinator.exit().unwrap_err(),
        SimulationError::AlreadyExited
    );
}

#[test]
fn test_out_of_bounds_injection_leaves_state_untouched() {
    let mut model = Coupled::new("top");
    let top_in = Port::new::<i32>("iIn");
    model.add_in_port(&top_in);
    let child = OneShot::new("child", 5.0);
    let child_in = child.in_port();
    model.add_component(child);
    model.add_coupling(&top_in, &child_in).unwrap();

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();

    let err = coordinator.sim_inject(10.0, &top_in, vec![1i32]).unwrap_err();
    assert!(matches!(err, SimulationError::InjectionOutOfBounds { .. }));
    // nothing moved: clock, timing fields, and the port are untouched
    assert_eq!(coordinator.clock().borrow().time(), 0.0);
    assert_eq!(coordinator.t_last(), 0.0);
    assert_eq!(coordinator.t_next(), 5.0);
    assert!(top_in.borrow().is_empty());
}

#[test]
fn test_injection_advances_clock_and_runs_a_cycle() {
    let mut model = Coupled::new("top");
    let top_in = Port::new::<i32>("iIn");
    model.add_in_port(&top_in);
    let child = OneShot::new("child", 5.0);
    let child_in = child.in_port();
    let (internal_count, external_count) = child.counters();
    model.add_component(child);
    model.add_coupling(&top_in, &child_in).unwrap();

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();

    coordinator.sim_inject(2.0, &top_in, vec![1i32]).unwrap();
    assert_eq!(coordinator.clock().borrow().time(), 2.0);
    assert_eq!(external_count.get(), 1);
    assert_eq!(internal_count.get(), 0);
    // the injected value re-armed the child at t = 2
    assert_eq!(coordinator.t_next(), 7.0);
    // the cycle ended with a clear
    assert!(top_in.borrow().is_empty());
    assert!(child_in.borrow().is_empty());
}

#[test]
fn test_injection_is_accepted_exactly_at_the_bound() {
    let mut model = Coupled::new("top");
    let top_in = Port::new::<i32>("iIn");
    model.add_in_port(&top_in);
    let child = OneShot::new("child", 5.0);
    let child_in = child.in_port();
    model.add_component(child);
    model.add_coupling(&top_in, &child_in).unwrap();

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();

    // t == t_next is still in bounds
    coordinator.sim_inject(5.0, &top_in, vec![1i32]).unwrap();
    assert_eq!(coordinator.clock().borrow().time(), 5.0);
}

#[test]
fn test_simulate_iterations_stops_at_quiescence() {
    let mut model = Coupled::new("top");
    let child = OneShot::new("child", 1.0);
    let (internal_count, _) = child.counters();
    model.add_component(child);

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();
    coordinator.simulate_iterations(100).unwrap();

    assert_eq!(internal_count.get(), 1);
    assert_eq!(coordinator.total_iterations(), 1);
    assert_eq!(coordinator.t_next(), f64::INFINITY);
}

#[test]
fn test_simulate_time_forces_the_clock_to_the_end_time() {
    let mut model = Coupled::new("top");
    let child = OneShot::new("child", 1.0);
    model.add_component(child);

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();
    coordinator.simulate_time(10.0).unwrap();

    assert_eq!(coordinator.clock().borrow().time(), 10.0);
    assert_eq!(coordinator.total_iterations(), 1);
}

#[test]
fn test_nested_coordinators_share_one_clock() {
    let mut inner = Coupled::new("inner");
    let child = OneShot::new("child", 3.0);
    let (internal_count, _) = child.counters();
    inner.add_component(child);

    let mut top = Coupled::new("top");
    top.add_coupled(inner);

    let mut coordinator = Coordinator::new_root(0.0, top);
    coordinator.initialize().unwrap();
    assert_eq!(coordinator.t_next(), 3.0);
    coordinator.simulate_iterations(10).unwrap();
    assert_eq!(internal_count.get(), 1);
    assert_eq!(coordinator.clock().borrow().time(), 3.0);
    assert_eq!(coordinator.t_next(), f64::INFINITY);
}
