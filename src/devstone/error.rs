use thiserror::Error;

use crate::devstone::Topology;
use crate::error::SimulationError;

/// Validation and construction errors of the DEVStone generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DevStoneError {
    /// A topology name that is not one of LI, HI, HO, HOmod.
    #[error("unknown DEVStone topology '{0}'")]
    UnknownTopology(String),

    /// A depth or width outside the legal range for the topology.
    #[error("dimension error (topology: {topology}, field: {field}, value: {value})")]
    Dimension {
        topology: Topology,
        field: &'static str,
        value: usize,
    },

    /// A negative delay in the timing configuration.
    #[error("timing config error (field: {field}, value: {value})")]
    Timing { field: &'static str, value: f64 },

    /// A kernel error raised while wiring the generated model.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
