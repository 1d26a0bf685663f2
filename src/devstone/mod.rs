//! DEVStone synthetic benchmark models.
//!
//! DEVStone generates deeply nested coupled models with a known shape, used
//! to stress and measure simulation engines. Four topologies are supported:
//! LI (low level of interconnections), HI (high input couplings), HO (HI
//! plus output couplings), and HOmod (a triangular grid of atomics per
//! level). Models are built entirely through the public modeling API.

mod atomic;
mod coupled;
mod error;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::modeling::coupled::Coupled;

pub use error::DevStoneError;

/// Shape of a DEVStone model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    #[serde(rename = "LI")]
    Li,
    #[serde(rename = "HI")]
    Hi,
    #[serde(rename = "HO")]
    Ho,
    #[serde(rename = "HOmod")]
    HoMod,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Li => "LI",
            Topology::Hi => "HI",
            Topology::Ho => "HO",
            Topology::HoMod => "HOmod",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Topology {
    type Err = DevStoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LI" => Ok(Topology::Li),
            "HI" => Ok(Topology::Hi),
            "HO" => Ok(Topology::Ho),
            "HOmod" => Ok(Topology::HoMod),
            other => Err(DevStoneError::UnknownTopology(other.to_string())),
        }
    }
}

/// Dimensions and timing of a DEVStone model.
///
/// `int_delay` and `ext_delay` are carried for benchmark-configuration
/// compatibility; only `prep_time` shapes the event schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevStoneConfig {
    pub topology: Topology,
    pub depth: usize,
    pub width: usize,
    pub int_delay: f64,
    pub ext_delay: f64,
    pub prep_time: f64,
}

impl DevStoneConfig {
    /// Configuration with the given shape and zero delays.
    pub fn new(topology: Topology, depth: usize, width: usize) -> Self {
        Self {
            topology,
            depth,
            width,
            int_delay: 0.0,
            ext_delay: 0.0,
            prep_time: 0.0,
        }
    }

    /// Check shape and timing constraints: depth >= 1, width >= 1 (>= 2
    /// for HOmod), and non-negative delays.
    pub fn validate(&self) -> Result<(), DevStoneError> {
        if self.depth < 1 {
            return Err(DevStoneError::Dimension {
                topology: self.topology,
                field: "depth",
                value: self.depth,
            });
        }
        let minimum_width = match self.topology {
            Topology::HoMod => 2,
            _ => 1,
        };
        if self.width < minimum_width {
            return Err(DevStoneError::Dimension {
                topology: self.topology,
                field: "width",
                value: self.width,
            });
        }
        for (field, value) in [
            ("int_delay", self.int_delay),
            ("ext_delay", self.ext_delay),
            ("prep_time", self.prep_time),
        ] {
            if value < 0.0 {
                return Err(DevStoneError::Timing { field, value });
            }
        }
        Ok(())
    }
}

/// Transition counters shared by every atomic of one DEVStone model.
///
/// The simulator tree takes ownership of the models when the hierarchy is
/// built, so observation happens through these cloned handles instead of a
/// post-run walk of the tree.
#[derive(Clone)]
pub struct TransitionCounters {
    internal: Rc<Cell<u64>>,
    external: Rc<Cell<u64>>,
}

impl TransitionCounters {
    fn new() -> Self {
        Self {
            internal: Rc::new(Cell::new(0)),
            external: Rc::new(Cell::new(0)),
        }
    }

    /// Internal transitions executed so far.
    pub fn internal(&self) -> u64 {
        self.internal.get()
    }

    /// External transitions executed so far.
    pub fn external(&self) -> u64 {
        self.external.get()
    }

    /// All transitions executed so far.
    pub fn total(&self) -> u64 {
        self.internal() + self.external()
    }

    pub(crate) fn record_internal(&self) {
        self.internal.set(self.internal.get() + 1);
    }

    pub(crate) fn record_external(&self) {
        self.external.set(self.external.get() + 1);
    }
}

/// A generated DEVStone model plus the counter handles observing it.
pub struct DevStone {
    model: Coupled,
    counters: TransitionCounters,
}

impl fmt::Debug for DevStone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevStone").finish_non_exhaustive()
    }
}

impl DevStone {
    /// Build a DEVStone model with the given name and configuration.
    pub fn new(name: &str, config: DevStoneConfig) -> Result<Self, DevStoneError> {
        config.validate()?;
        let counters = TransitionCounters::new();
        let model = coupled::build(name, &config, config.depth, &counters)?;
        Ok(Self { model, counters })
    }

    /// The generated coupled model.
    pub fn model(&self) -> &Coupled {
        &self.model
    }

    /// Give up the model, e.g. to hand it to a root coordinator. Counter
    /// handles obtained before stay valid.
    pub fn into_model(self) -> Coupled {
        self.model
    }

    /// A cloned handle onto the model's transition counters.
    pub fn counters(&self) -> TransitionCounters {
        self.counters.clone()
    }
}
