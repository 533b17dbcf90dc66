use super::config::ConfigError;
use crate::core::models::compound::Compound;
use crate::core::models::ids::NodeId;
use std::collections::HashSet;

/// The port chosen on a fragment, plus every other labelled port it exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortChoice {
    pub label: String,
    pub port: NodeId,
    pub others: Vec<(String, NodeId)>,
}

/// Picks the port of `compound`'s top-level namespace to bond through.
///
/// With a requested label, that label (or any alias of the same port) must
/// name one of the fragment's ports. Without one, the fragment must expose
/// exactly one port. A port reachable under several labels counts once, under
/// its first label.
pub fn select_port(compound: &Compound, requested: Option<&str>) -> Result<PortChoice, ConfigError> {
    let labelled = compound.ports_of(compound.root());
    let mut seen = HashSet::new();
    let candidates: Vec<(String, NodeId)> = labelled
        .iter()
        .filter(|(_, id)| seen.insert(*id))
        .cloned()
        .collect();
    let labels = || candidates.iter().map(|(label, _)| label.clone()).collect::<Vec<_>>();

    if candidates.is_empty() {
        return Err(ConfigError::NoFreePort {
            fragment: compound.name().to_string(),
        });
    }

    let (label, port) = match requested {
        Some(name) => labelled
            .iter()
            .find(|(label, _)| label == name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownPort {
                fragment: compound.name().to_string(),
                port: name.to_string(),
                candidates: labels(),
            })?,
        None if candidates.len() == 1 => candidates[0].clone(),
        None => {
            return Err(ConfigError::AmbiguousPort {
                fragment: compound.name().to_string(),
                candidates: labels(),
            });
        }
    };

    let others = candidates
        .into_iter()
        .filter(|(_, id)| *id != port)
        .collect();
    Ok(PortChoice {
        label,
        port,
        others,
    })
}

/// Checks how many substituents were supplied against how many were requested.
///
/// A single substituent is broadcast to every requested slot; otherwise the
/// counts must match exactly.
pub fn check_substituent_count(requested: usize, provided: usize) -> Result<(), ConfigError> {
    match (requested, provided) {
        (0, 0) => Ok(()),
        (0, provided) => Err(ConfigError::SubstituentsWithoutCount { provided }),
        (_, 1) => Ok(()),
        (requested, provided) if requested == provided => Ok(()),
        (requested, provided) => Err(ConfigError::SubstituentCount {
            requested,
            provided,
        }),
    }
}

/// Checks that an explicit per-fragment port list, if any, has one entry per
/// fragment.
pub fn check_port_list(ports: Option<&[Option<String>]>, fragments: usize) -> Result<(), ConfigError> {
    match ports {
        Some(ports) if ports.len() != fragments => Err(ConfigError::PortListLength {
            expected: fragments,
            provided: ports.len(),
        }),
        _ => Ok(()),
    }
}
