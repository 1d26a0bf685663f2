//! Experimental frame / processor demo.
//!
//! Runs the generator / processor / transducer scenario until the
//! transducer closes its observation window and stops the generator.
//!
//! Usage: efp [generator_period] [processor_period] [observation_time]
//!        efp --stochastic <mean_period> [processor_period] [observation_time] [seed]

mod ef;
mod efp;
mod generator;
mod job;
mod processor;
mod transducer;

use std::process;

use pdevs::error::SimulationError;
use pdevs::simulation::coordinator::Coordinator;
use pdevs::simulation::simulator::AbstractSimulator;

use crate::efp::Efp;
use crate::generator::Generator;

struct Options {
    stochastic: bool,
    generator_period: f64,
    processor_period: f64,
    observation_time: f64,
    seed: u64,
}

fn parse_args() -> Options {
    let mut options = Options {
        stochastic: false,
        generator_period: 1.0,
        processor_period: 3.0,
        observation_time: 100.0,
        seed: 1234,
    };
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--stochastic" {
            options.stochastic = true;
        } else {
            match arg.parse::<f64>() {
                Ok(value) => positional.push(value),
                Err(_) => {
                    eprintln!("unrecognized argument '{}'", arg);
                    process::exit(1);
                }
            }
        }
    }
    if let Some(&period) = positional.first() {
        options.generator_period = period;
    }
    if let Some(&period) = positional.get(1) {
        options.processor_period = period;
    }
    if let Some(&time) = positional.get(2) {
        options.observation_time = time;
    }
    if let Some(&seed) = positional.get(3) {
        options.seed = seed as u64;
    }
    options
}

fn run(options: Options) -> Result<(), SimulationError> {
    let generator = if options.stochastic {
        Generator::with_exponential_period("generator", options.generator_period, options.seed)
    } else {
        Generator::new("generator", options.generator_period)
    };
    let model = Efp::new(
        "efp",
        generator,
        options.processor_period,
        options.observation_time,
    )?;

    let mut coordinator = Coordinator::new_root(0.0, model.into_model());
    coordinator.initialize()?;
    coordinator.simulate_time(f64::INFINITY)?;
    coordinator.exit()?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run(parse_args()) {
        eprintln!("simulation failed: {}", err);
        process::exit(1);
    }
}
