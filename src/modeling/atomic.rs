use crate::error::SimulationError;
use crate::modeling::component::Component;

/// Conventional phase of a model waiting for input.
pub const PASSIVE: &str = "passive";
/// Conventional phase of a model about to emit output.
pub const ACTIVE: &str = "active";

/// Common state of every atomic model: the underlying component plus the
/// `phase`/`sigma` pair the DEVS scheduling algorithm operates on.
///
/// `sigma` is the remaining time until the next internal event and is
/// never negative; `f64::INFINITY` means no internal event is scheduled.
pub struct AtomicState {
    component: Component,
    phase: String,
    sigma: f64,
}

impl AtomicState {
    /// Create the state for a named atomic model, passive with an
    /// infinite sigma.
    pub fn new(name: &str) -> Self {
        Self {
            component: Component::new(name),
            phase: PASSIVE.to_string(),
            sigma: f64::INFINITY,
        }
    }

    /// The underlying component.
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// The underlying component, mutably.
    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }

    /// Current phase tag.
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Set the phase tag.
    pub fn set_phase(&mut self, phase: &str) {
        self.phase = phase.to_string();
    }

    /// Remaining time until the next internal event.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Set the remaining time until the next internal event.
    pub fn set_sigma(&mut self, sigma: f64) {
        debug_assert!(sigma >= 0.0, "sigma must be non-negative");
        self.sigma = sigma;
    }

    /// Set phase and sigma in one step.
    pub fn hold_in(&mut self, phase: &str, sigma: f64) {
        self.set_phase(phase);
        self.set_sigma(sigma);
    }

    /// Phase "active" with an immediate timeout.
    pub fn activate(&mut self) {
        self.hold_in(ACTIVE, 0.0);
    }

    /// Phase "passive" with no scheduled timeout.
    pub fn passivate(&mut self) {
        self.hold_in(PASSIVE, f64::INFINITY);
    }

    /// Keep the given phase with no scheduled timeout.
    pub fn passivate_in(&mut self, phase: &str) {
        self.hold_in(phase, f64::INFINITY);
    }

    /// True if the current phase is `phase`.
    pub fn phase_is(&self, phase: &str) -> bool {
        self.phase == phase
    }
}

/// Behavior of an atomic DEVS model.
///
/// The transition and output callbacks are required methods, so a model
/// that forgets one simply does not compile. Phase and sigma must only be
/// mutated inside the callbacks, through the state helpers; `output` must
/// not touch them at all.
pub trait Atomic {
    /// The model's phase/sigma state and underlying component.
    fn state(&self) -> &AtomicState;

    /// Mutable access to the model's state.
    fn state_mut(&mut self) -> &mut AtomicState;

    /// Set up the model before the first simulation cycle.
    fn initialize(&mut self) -> Result<(), SimulationError>;

    /// Tear down after the last simulation cycle.
    fn exit(&mut self) -> Result<(), SimulationError> {
        Ok(())
    }

    /// Internal transition, triggered when the current state times out
    /// with no pending input.
    fn internal_transition(&mut self) -> Result<(), SimulationError>;

    /// External transition, triggered by input arriving before the
    /// timeout. `elapsed` is the time since the last state change.
    fn external_transition(&mut self, elapsed: f64) -> Result<(), SimulationError>;

    /// Confluent transition, triggered when input arrives exactly at the
    /// timeout. The default runs the internal transition and then the
    /// external transition with elapsed 0; models that need the opposite
    /// order (or a custom merge) override this.
    fn confluent_transition(&mut self, elapsed: f64) -> Result<(), SimulationError> {
        let _ = elapsed;
        self.internal_transition()?;
        self.external_transition(0.0)
    }

    /// Output function, invoked right before an internal or confluent
    /// transition consumes the timeout. May append messages to the
    /// model's own output ports.
    fn output(&mut self) -> Result<(), SimulationError>;

    /// Time remaining until the next internal event. Defaults to sigma.
    fn time_advance(&self) -> f64 {
        self.state().sigma()
    }

    /// The underlying component.
    fn component(&self) -> &Component {
        self.state().component()
    }

    /// The underlying component, mutably.
    fn component_mut(&mut self) -> &mut Component {
        self.state_mut().component_mut()
    }

    /// Set phase and sigma in one step.
    fn hold_in(&mut self, phase: &str, sigma: f64) {
        self.state_mut().hold_in(phase, sigma);
    }

    /// Phase "active" with an immediate timeout.
    fn activate(&mut self) {
        self.state_mut().activate();
    }

    /// Phase "passive" with no scheduled timeout.
    fn passivate(&mut self) {
        self.state_mut().passivate();
    }

    /// Keep the given phase with no scheduled timeout.
    fn passivate_in(&mut self, phase: &str) {
        self.state_mut().passivate_in(phase);
    }

    /// True if the current phase is `phase`.
    fn phase_is(&self, phase: &str) -> bool {
        self.state().phase_is(phase)
    }
}
