use pdevs::error::SimulationError;
use pdevs::modeling::coupled::Coupled;
use pdevs::modeling::port::Port;
use pdevs::modeling::Shared;

use crate::generator::Generator;
use crate::job::Job;
use crate::transducer::Transducer;

/// Experimental frame: a generator and a transducer behind one boundary.
/// Jobs leave through `oOut`, solved jobs come back through `iIn`, and the
/// transducer stops the generator when the observation window closes.
pub struct Ef {
    model: Coupled,
    i_start: Shared<Port>,
    i_in: Shared<Port>,
    o_out: Shared<Port>,
}

impl Ef {
    pub fn new(
        name: &str,
        generator: Generator,
        observation_time: f64,
    ) -> Result<Ef, SimulationError> {
        let mut model = Coupled::new(name);
        let i_start = Port::new::<Job>("iStart");
        let i_in = Port::new::<Job>("iIn");
        let o_out = Port::new::<Job>("oOut");
        model.add_in_port(&i_start);
        model.add_in_port(&i_in);
        model.add_out_port(&o_out);

        let (gen_start, gen_stop, gen_out) = (
            generator.start_port(),
            generator.stop_port(),
            generator.out_port(),
        );
        model.add_component(generator);

        let transducer = Transducer::new("transducer", observation_time);
        let (tr_arrived, tr_solved, tr_out) = (
            transducer.arrived_port(),
            transducer.solved_port(),
            transducer.out_port(),
        );
        model.add_component(transducer);

        model.add_coupling(&i_in, &tr_solved)?;
        model.add_coupling(&gen_out, &o_out)?;
        model.add_coupling(&gen_out, &tr_arrived)?;
        model.add_coupling(&tr_out, &gen_stop)?;
        model.add_coupling(&i_start, &gen_start)?;

        Ok(Ef {
            model,
            i_start,
            i_in,
            o_out,
        })
    }

    pub fn start_port(&self) -> Shared<Port> {
        self.i_start.clone()
    }

    pub fn in_port(&self) -> Shared<Port> {
        self.i_in.clone()
    }

    pub fn out_port(&self) -> Shared<Port> {
        self.o_out.clone()
    }

    pub fn into_model(self) -> Coupled {
        self.model
    }
}
