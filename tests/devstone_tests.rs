use pdevs::devstone::{DevStone, DevStoneConfig, DevStoneError, Topology};
use pdevs::simulation::coordinator::Coordinator;
use pdevs::simulation::simulator::AbstractSimulator;

const MAX_DEPTH: usize = 5;
const MAX_WIDTH: usize = 5;

fn expected_components(topology: Topology, depth: usize, width: usize) -> (usize, usize) {
    let n_atomic = match topology {
        Topology::HoMod => 1 + (depth - 1) * ((width - 1) + width * (width - 1) / 2),
        _ => 1 + (depth - 1) * (width - 1),
    };
    (n_atomic, depth)
}

fn expected_couplings(topology: Topology, depth: usize, width: usize) -> (usize, usize, usize) {
    let n_eic = match topology {
        Topology::HoMod => 1 + (depth - 1) * (1 + 2 * (width - 1)),
        Topology::Ho => 1 + (depth - 1) * (width + 1),
        _ => 1 + (depth - 1) * width,
    };
    let n_ic = match topology {
        Topology::Li => 0,
        Topology::Hi | Topology::Ho => {
            if width > 1 {
                (depth - 1) * (width - 2)
            } else {
                0
            }
        }
        Topology::HoMod => (depth - 1) * ((width - 1) * (width - 1) + (width - 1) * width / 2),
    };
    let n_eoc = match topology {
        Topology::Ho => 1 + (depth - 1) * width,
        _ => depth,
    };
    (n_ic, n_eic, n_eoc)
}

fn expected_external_events(topology: Topology, depth: usize, width: usize) -> u64 {
    match topology {
        Topology::Li => (1 + (depth - 1) * (width - 1)) as u64,
        Topology::Hi | Topology::Ho => (1 + (depth - 1) * width * (width - 1) / 2) as u64,
        Topology::HoMod => unreachable!("HOmod events are checked case by case"),
    }
}

fn widths(topology: Topology) -> std::ops::RangeInclusive<usize> {
    let initial_width = match topology {
        Topology::HoMod => 2,
        _ => 1,
    };
    initial_width..=MAX_WIDTH
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let config = DevStoneConfig::new(Topology::Li, 0, 1);
    assert!(matches!(
        DevStone::new("name", config).unwrap_err(),
        DevStoneError::Dimension { field: "depth", .. }
    ));

    let config = DevStoneConfig::new(Topology::Li, 1, 0);
    assert!(matches!(
        DevStone::new("name", config).unwrap_err(),
        DevStoneError::Dimension { field: "width", .. }
    ));

    // HOmod needs at least two columns
    let config = DevStoneConfig::new(Topology::HoMod, 2, 1);
    assert!(matches!(
        DevStone::new("name", config).unwrap_err(),
        DevStoneError::Dimension { field: "width", .. }
    ));

    let mut config = DevStoneConfig::new(Topology::HoMod, 2, 2);
    config.ext_delay = -1.0;
    assert!(matches!(
        DevStone::new("name", config).unwrap_err(),
        DevStoneError::Timing {
            field: "ext_delay",
            ..
        }
    ));

    let config = DevStoneConfig::new(Topology::HoMod, 2, 2);
    assert!(DevStone::new("name", config).is_ok());
}

#[test]
fn test_unknown_topology_names_are_rejected() {
    assert_eq!(
        "invalid".parse::<Topology>().unwrap_err(),
        DevStoneError::UnknownTopology("invalid".to_string())
    );
    for name in ["LI", "HI", "HO", "HOmod"] {
        let topology: Topology = name.parse().unwrap();
        assert_eq!(topology.to_string(), name);
    }
}

#[test]
fn test_generated_models_have_the_expected_shape() {
    for topology in [Topology::Li, Topology::Hi, Topology::Ho, Topology::HoMod] {
        for depth in 1..=MAX_DEPTH {
            for width in widths(topology) {
                let config = DevStoneConfig::new(topology, depth, width);
                let devstone = DevStone::new("devstone", config).unwrap();
                let (n_atomic, n_coupled) = devstone.model().count_components();
                let (n_ic, n_eic, n_eoc) = devstone.model().count_couplings();
                let case = format!("topology: {}; dimension: ({},{})", topology, depth, width);
                assert_eq!(
                    (n_atomic, n_coupled),
                    expected_components(topology, depth, width),
                    "unexpected components for {}",
                    case
                );
                assert_eq!(
                    (n_ic, n_eic, n_eoc),
                    expected_couplings(topology, depth, width),
                    "unexpected couplings for {}",
                    case
                );
            }
        }
    }
}

#[test]
fn test_simulated_event_counts_match_the_topology() {
    for topology in [Topology::Li, Topology::Hi, Topology::Ho] {
        for depth in 1..=MAX_DEPTH {
            for width in widths(topology) {
                let config = DevStoneConfig::new(topology, depth, width);
                let devstone = DevStone::new("devstone", config).unwrap();
                let counters = devstone.counters();
                let model = devstone.into_model();
                let i_in = model.get_in_port("iIn").unwrap();

                let mut coordinator = Coordinator::new_root(0.0, model);
                coordinator.initialize().unwrap();
                coordinator.sim_inject(0.0, &i_in, vec![0i32]).unwrap();
                coordinator.simulate_time(f64::INFINITY).unwrap();
                coordinator.exit().unwrap();

                let case = format!("topology: {}; dimension: ({},{})", topology, depth, width);
                assert_eq!(
                    counters.external(),
                    expected_external_events(topology, depth, width),
                    "unexpected external transitions for {}",
                    case
                );
                // every stimulus eventually times out exactly once
                assert_eq!(
                    counters.internal(),
                    counters.external(),
                    "unexpected internal transitions for {}",
                    case
                );
            }
        }
    }
}

#[test]
fn test_homod_events_with_both_inputs_stimulated() {
    let config = DevStoneConfig::new(Topology::HoMod, 2, 2);
    let devstone = DevStone::new("devstone", config).unwrap();
    let counters = devstone.counters();
    let model = devstone.into_model();
    let i_in = model.get_in_port("iIn").unwrap();
    let i_in2 = model.get_in_port("iIn2").unwrap();

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();
    coordinator.sim_inject(0.0, &i_in, vec![0i32]).unwrap();
    coordinator.sim_inject(0.0, &i_in2, vec![0i32]).unwrap();
    coordinator.simulate_time(f64::INFINITY).unwrap();
    coordinator.exit().unwrap();

    // innermost atomic: 1; first-row atomic: 2 (direct + second row);
    // second-row atomic: 1
    assert_eq!(counters.external(), 4);
    assert_eq!(counters.internal(), 4);
    assert_eq!(counters.total(), 8);
}

#[test]
fn test_prep_time_stretches_the_schedule() {
    let mut config = DevStoneConfig::new(Topology::Li, 3, 3);
    config.prep_time = 2.0;
    let devstone = DevStone::new("devstone", config).unwrap();
    let counters = devstone.counters();
    let model = devstone.into_model();
    let i_in = model.get_in_port("iIn").unwrap();

    let mut coordinator = Coordinator::new_root(0.0, model);
    coordinator.initialize().unwrap();
    coordinator.sim_inject(0.0, &i_in, vec![0i32]).unwrap();
    // all atomics activated at t = 0 and hold for prep_time
    assert_eq!(coordinator.t_next(), 2.0);
    coordinator.simulate_time(f64::INFINITY).unwrap();
    assert_eq!(counters.external(), 5);
    assert_eq!(counters.internal(), 5);
}
