use crate::devstone::atomic::DevStoneAtomic;
use crate::devstone::{DevStoneConfig, DevStoneError, Topology, TransitionCounters};
use crate::modeling::coupled::Coupled;
use crate::modeling::port::Port;
use crate::modeling::Shared;

/// Build the coupled DEVStone model for one level of the recursion.
///
/// Level `depth` wraps the model for `depth - 1`; the innermost level
/// holds a single atomic. Every level declares `iIn`/`oOut`, plus `iIn2`
/// for HO and HOmod and `oOut2` for HO.
pub(crate) fn build(
    name: &str,
    config: &DevStoneConfig,
    depth: usize,
    counters: &TransitionCounters,
) -> Result<Coupled, DevStoneError> {
    let mut model = Coupled::new(&format!("{}_{}", name, depth - 1));
    let i_in = Port::new::<i32>("iIn");
    let o_out = Port::new::<i32>("oOut");
    model.add_in_port(&i_in);
    model.add_out_port(&o_out);

    let mut i_in2: Option<Shared<Port>> = None;
    let mut o_out2: Option<Shared<Port>> = None;
    if matches!(config.topology, Topology::Ho | Topology::HoMod) {
        let port = Port::new::<i32>("iIn2");
        model.add_in_port(&port);
        i_in2 = Some(port);
        if config.topology == Topology::Ho {
            let port = Port::new::<i32>("oOut2");
            model.add_out_port(&port);
            o_out2 = Some(port);
        }
    }

    if depth == 1 {
        // Innermost coupled model only contains an atomic model.
        let atomic = DevStoneAtomic::new("atomic_0_0", config.prep_time, true, counters);
        let (a_in, a_out) = (atomic.in_port(), atomic.out_port());
        model.add_component(atomic);
        model.add_coupling(&i_in, &a_in)?;
        model.add_coupling(&a_out, &o_out)?;
        return Ok(model);
    }

    let sub = build(name, config, depth - 1, counters)?;
    let sub_in = sub.get_in_port("iIn")?;
    let sub_out = sub.get_out_port("oOut")?;
    let sub_in2 = if matches!(config.topology, Topology::Ho | Topology::HoMod) {
        Some(sub.get_in_port("iIn2")?)
    } else {
        None
    };
    model.add_coupled(sub);
    model.add_coupling(&i_in, &sub_in)?;
    model.add_coupling(&sub_out, &o_out)?;
    if config.topology == Topology::Ho {
        if let (Some(own_in2), Some(sub_in2)) = (&i_in2, &sub_in2) {
            model.add_coupling(own_in2, sub_in2)?;
        }
    }

    if config.topology == Topology::HoMod {
        if let (Some(i_in2), Some(sub_in2)) = (&i_in2, &sub_in2) {
            add_homod_atomics(&mut model, config, depth, counters, i_in2, sub_in2)?;
        }
    } else {
        add_simple_atomics(&mut model, config, depth, counters, &i_in, o_out2.as_ref())?;
    }
    Ok(model)
}

/// One row of `width - 1` atomics. LI couples them to the level input
/// only; HI chains each atomic's output into the next one; HO additionally
/// mirrors every atomic output on the level's second output port.
fn add_simple_atomics(
    model: &mut Coupled,
    config: &DevStoneConfig,
    depth: usize,
    counters: &TransitionCounters,
    i_in: &Shared<Port>,
    o_out2: Option<&Shared<Port>>,
) -> Result<(), DevStoneError> {
    let use_out = matches!(config.topology, Topology::Hi | Topology::Ho);
    let mut prev_out: Option<Shared<Port>> = None;
    for i in 0..config.width.saturating_sub(1) {
        let atomic = DevStoneAtomic::new(
            &format!("atomic_{}_{}", depth - 1, i),
            config.prep_time,
            use_out,
            counters,
        );
        let (a_in, a_out) = (atomic.in_port(), atomic.out_port());
        model.add_component(atomic);
        model.add_coupling(i_in, &a_in)?;
        if config.topology != Topology::Li {
            if let Some(prev) = &prev_out {
                model.add_coupling(prev, &a_in)?;
            }
            if let Some(o_out2) = o_out2 {
                model.add_coupling(&a_out, o_out2)?;
            }
        }
        prev_out = Some(a_out);
    }
    Ok(())
}

/// The HOmod triangular grid: a first full row feeding the nested model's
/// second input, then successively shorter rows feeding the row above.
fn add_homod_atomics(
    model: &mut Coupled,
    config: &DevStoneConfig,
    depth: usize,
    counters: &TransitionCounters,
    i_in2: &Shared<Port>,
    sub_in2: &Shared<Port>,
) -> Result<(), DevStoneError> {
    let width = config.width;
    let mut prev_row: Vec<Shared<Port>> = Vec::new();
    for i in 0..width {
        let initial_j = if i > 1 { i - 1 } else { 0 };
        let mut row = Vec::with_capacity(width - 1 - initial_j);
        for j in initial_j..width.saturating_sub(1) {
            let atomic = DevStoneAtomic::new(
                &format!("atomic_{}_{}_{}", depth - 1, i, j),
                config.prep_time,
                true,
                counters,
            );
            let (a_in, a_out) = (atomic.in_port(), atomic.out_port());
            model.add_component(atomic);
            if i == 0 {
                // First row of atomic models.
                model.add_coupling(i_in2, &a_in)?;
                model.add_coupling(&a_out, sub_in2)?;
            } else {
                if j == initial_j {
                    // First atomic of the row receives the level input.
                    model.add_coupling(i_in2, &a_in)?;
                }
                if i == 1 {
                    // Second row feeds every atomic of the first row.
                    for prev_in in &prev_row {
                        model.add_coupling(&a_out, prev_in)?;
                    }
                } else {
                    model.add_coupling(&a_out, &prev_row[j - initial_j + 1])?;
                }
            }
            row.push(a_in);
        }
        prev_row = row;
    }
    Ok(())
}
