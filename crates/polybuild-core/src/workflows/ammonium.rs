use super::fragments::{alkane, fragment};
use crate::core::fragments::library::FragmentLibrary;
use crate::core::models::compound::Compound;
use crate::core::models::error::GraphError;
use crate::core::models::compound::PORT_LABEL_BASE;
use crate::core::models::labels::{LabelSpec, LabelTarget, indexed_name};
use crate::engine::config::{AmmoniumOptions, SubstituentSource};
use crate::engine::error::EngineError;
use crate::engine::fusion::fuse;
use crate::engine::selection::{PortChoice, check_port_list, check_substituent_count, select_port};
use std::collections::HashSet;
use tracing::{info, instrument};

const SUBSTITUENT_LABEL: &str = "substituent";

/// A quaternary ammonium centre with up to four substituents.
///
/// Substituent `i` is bonded to the centre's `port[i]`. Ports of a substituent
/// other than the one it bonds through are hoisted to the top level under
/// their own labels. The centre's unused ports stay on the root, renumbered
/// from `port[0]`.
///
/// Alkyl substituents bond through their `up` end. Custom fragments follow the
/// usual port choice: a single port is used automatically, several need an
/// entry in the port list.
#[instrument(skip_all, fields(substituents = options.substituents))]
pub fn ammonium(library: &FragmentLibrary, options: AmmoniumOptions) -> Result<Compound, EngineError> {
    options.validate()?;
    let requested = options.substituents;
    check_substituent_count(requested, options.source.provided())?;

    let substituents = match options.source {
        SubstituentSource::None => Vec::new(),
        SubstituentSource::Alkane(lengths) => broadcast(lengths, requested)
            .into_iter()
            .map(|n| {
                let chain = alkane(library, n, false, true)?;
                let choice = select_port(&chain, Some("up"))?;
                Ok((chain, choice))
            })
            .collect::<Result<Vec<_>, EngineError>>()?,
        SubstituentSource::Custom { fragments, ports } => {
            check_port_list(ports.as_deref(), fragments.len())?;
            let ports = ports.unwrap_or_else(|| vec![None; fragments.len()]);
            broadcast(fragments.into_iter().zip(ports).collect(), requested)
                .into_iter()
                .map(|(compound, port)| {
                    let choice = select_port(&compound, port.as_deref())?;
                    Ok((compound, choice))
                })
                .collect::<Result<Vec<_>, EngineError>>()?
        }
    };
    assemble(library, substituents)
}

fn assemble(
    library: &FragmentLibrary,
    substituents: Vec<(Compound, PortChoice)>,
) -> Result<Compound, EngineError> {
    let mut centre = fragment(library, "ammonium")?;
    let root = centre.root();
    let slots: Vec<_> = centre
        .ports_of(root)
        .into_iter()
        .map(|(_, port)| port)
        .collect();
    check_hoisted_names(&centre, slots.len(), &substituents)?;

    let count = substituents.len();
    let mut hoisted = Vec::new();
    for ((compound, choice), slot) in substituents.into_iter().zip(slots) {
        let fused = fuse(
            &mut centre,
            slot,
            compound,
            choice.port,
            LabelSpec::indexed(SUBSTITUENT_LABEL),
        )?;
        for (label, port) in choice.others {
            hoisted.push((label, fused.handle(port)?));
        }
    }
    for (label, port) in hoisted {
        centre.hoist(root, port, &label)?;
    }

    info!(
        "Built ammonium with {} substituent(s): {} atoms, {} open ports",
        count,
        centre.atom_count(),
        centre.port_count()
    );
    Ok(centre)
}

/// Repeats a single entry `n` times; longer lists are returned as they are.
fn broadcast<T: Clone>(items: Vec<T>, n: usize) -> Vec<T> {
    match items.as_slice() {
        [single] if n > 1 => vec![single.clone(); n],
        _ => items,
    }
}

/// Hoisted labels must not collide with each other or with any name the
/// finished centre carries: its atoms, the substituent sequence and the
/// renumbered `port[i]` of its unused slots.
fn check_hoisted_names(
    centre: &Compound,
    slots: usize,
    substituents: &[(Compound, PortChoice)],
) -> Result<(), GraphError> {
    let n = substituents.len();
    let open = slots.saturating_sub(n);

    let mut taken: HashSet<String> = centre
        .labels(centre.root())
        .into_iter()
        .flat_map(|registry| registry.iter())
        .filter(|(_, target)| match target {
            LabelTarget::Node(id) => centre.port(*id).is_none(),
            LabelTarget::Sequence(ids) => ids.iter().all(|id| centre.port(*id).is_none()),
        })
        .map(|(name, _)| name.to_string())
        .collect();
    if open > 0 {
        taken.insert(PORT_LABEL_BASE.to_string());
        taken.extend((0..open).map(|i| indexed_name(PORT_LABEL_BASE, i)));
    }
    if n > 0 {
        taken.insert(SUBSTITUENT_LABEL.to_string());
        taken.extend((0..n).map(|i| indexed_name(SUBSTITUENT_LABEL, i)));
    }

    for (compound, choice) in substituents {
        for (label, _) in &choice.others {
            if !taken.insert(label.clone()) {
                return Err(GraphError::LabelExists {
                    label: label.clone(),
                    group: compound.name().to_string(),
                });
            }
        }
    }
    Ok(())
}
