use pdevs::error::SimulationError;
use pdevs::modeling::coupled::Coupled;
use pdevs::modeling::port::Port;
use pdevs::modeling::Shared;

use crate::ef::Ef;
use crate::generator::Generator;
use crate::job::Job;
use crate::processor::Processor;

/// Experimental frame coupled to a processor: the classic generator /
/// processor / transducer queueing scenario.
pub struct Efp {
    model: Coupled,
    i_start: Shared<Port>,
}

impl Efp {
    pub fn new(
        name: &str,
        generator: Generator,
        processor_period: f64,
        transducer_period: f64,
    ) -> Result<Efp, SimulationError> {
        let mut model = Coupled::new(name);
        let i_start = Port::new::<Job>("iStart");
        model.add_in_port(&i_start);

        let ef = Ef::new("ef", generator, transducer_period)?;
        let (ef_start, ef_in, ef_out) = (ef.start_port(), ef.in_port(), ef.out_port());
        model.add_coupled(ef.into_model());

        let processor = Processor::new("processor", processor_period);
        let (proc_in, proc_out) = (processor.in_port(), processor.out_port());
        model.add_component(processor);

        model.add_coupling(&ef_out, &proc_in)?;
        model.add_coupling(&proc_out, &ef_in)?;
        model.add_coupling(&i_start, &ef_start)?;

        Ok(Efp { model, i_start })
    }

    #[allow(dead_code)]
    pub fn start_port(&self) -> Shared<Port> {
        self.i_start.clone()
    }

    pub fn into_model(self) -> Coupled {
        self.model
    }
}
