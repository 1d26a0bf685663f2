//! DEVStone benchmark driver.
//!
//! Builds a DEVStone model of the requested topology, injects one event,
//! and runs it to quiescence, reporting wall-clock times and transition
//! counts.
//!
//! Flags: -t topology (LI | HI | HO | HOmod, required)
//!        -n name  -d depth  -w width
//!        -i internal delay  -e external delay  -p preparation time

use std::process;
use std::time::Instant;

use pdevs::devstone::{DevStone, DevStoneConfig, DevStoneError, Topology};
use pdevs::simulation::coordinator::Coordinator;
use pdevs::simulation::simulator::AbstractSimulator;

struct Options {
    name: String,
    config: DevStoneConfig,
}

fn usage() -> ! {
    eprintln!("use the following flags to configure the DEVStone model under study:");
    eprintln!("  -t topology of the DEVStone model: LI | HI | HO | HOmod (required)");
    eprintln!("  -n name of the DEVStone model (default \"devstone\")");
    eprintln!("  -d depth of the top DEVStone model (default 1)");
    eprintln!("  -w width of the top DEVStone model (default 1)");
    eprintln!("  -i internal delay of atomic models (default 0)");
    eprintln!("  -e external delay of atomic models (default 0)");
    eprintln!("  -p preparation time of atomic models (default 0)");
    process::exit(1);
}

fn parse_args() -> Options {
    let mut name = "devstone".to_string();
    let mut topology: Option<Topology> = None;
    let mut config = DevStoneConfig::new(Topology::Li, 1, 1);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let Some(value) = iter.next() else { usage() };
        let parsed = match flag.as_str() {
            "-t" => value.parse::<Topology>().map(|t| topology = Some(t)).is_ok(),
            "-n" => {
                name = value.clone();
                true
            }
            "-d" => value.parse().map(|d| config.depth = d).is_ok(),
            "-w" => value.parse().map(|w| config.width = w).is_ok(),
            "-i" => value.parse().map(|i| config.int_delay = i).is_ok(),
            "-e" => value.parse().map(|e| config.ext_delay = e).is_ok(),
            "-p" => value.parse().map(|p| config.prep_time = p).is_ok(),
            _ => false,
        };
        if !parsed {
            eprintln!("invalid flag or value: {} {}", flag, value);
            usage();
        }
    }
    let Some(topology) = topology else {
        eprintln!("a topology is required");
        usage();
    };
    config.topology = topology;
    Options { name, config }
}

fn run(options: Options) -> Result<(), DevStoneError> {
    let config = options.config;
    println!(
        "name: {}, topology: {}, depth: {}, width: {}, intDelay: {}, extDelay: {}, prepTime: {}",
        options.name,
        config.topology,
        config.depth,
        config.width,
        config.int_delay,
        config.ext_delay,
        config.prep_time
    );

    let start = Instant::now();
    let devstone = DevStone::new(&options.name, config)?;
    let counters = devstone.counters();
    let (n_atomic, n_coupled) = devstone.model().count_components();
    println!("model creation time: {:?}", start.elapsed());
    println!("components: {} atomic, {} coupled", n_atomic, n_coupled);

    let model = devstone.into_model();
    let i_in = model.get_in_port("iIn")?;
    let i_in2 = match config.topology {
        Topology::Ho | Topology::HoMod => Some(model.get_in_port("iIn2")?),
        _ => None,
    };

    let setup_start = Instant::now();
    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize()?;
    coordinator.sim_inject(0.0, &i_in, vec![0i32])?;
    if let Some(i_in2) = &i_in2 {
        coordinator.sim_inject(0.0, i_in2, vec![0i32])?;
    }
    println!("engine setup time: {:?}", setup_start.elapsed());

    let simulation_start = Instant::now();
    coordinator.simulate_time(f64::INFINITY)?;
    coordinator.exit()?;
    println!("simulation time: {:?}", simulation_start.elapsed());
    println!(
        "transitions: {} internal, {} external, {} total",
        counters.internal(),
        counters.external(),
        counters.total()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run(parse_args()) {
        eprintln!("benchmark failed: {}", err);
        process::exit(1);
    }
}
