use super::error::EngineError;
use crate::core::models::compound::Compound;
use crate::core::models::error::GraphError;
use crate::core::models::ids::NodeId;
use crate::core::models::port::Port;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Replaces every bond to a sentinel atom with a port on the surviving atom.
///
/// Each severed bond yields one port anchored on its non-sentinel end, pointing
/// towards where the sentinel was and sitting half the bond length away. The
/// sentinel atoms are then removed together with anything anchored on them.
/// Sentinel names are compared case-insensitively.
///
/// Compounds without any bond to a sentinel are left untouched, so calling this
/// twice is the same as calling it once.
///
/// # Return
///
/// The number of ports created.
///
/// # Errors
///
/// Returns [`GraphError::DegenerateOrientation`] if a sentinel sits exactly on
/// its bonded partner. Nothing is modified in that case.
pub fn atom_to_port(compound: &mut Compound, sentinel: &str) -> Result<usize, EngineError> {
    let sentinels: HashSet<NodeId> = compound
        .atoms()
        .into_iter()
        .filter(|(_, atom)| atom.is_type(sentinel))
        .map(|(id, _)| id)
        .collect();

    let severed: Vec<(NodeId, NodeId)> = compound
        .bonds()
        .iter()
        .filter(|bond| sentinels.contains(&bond.atom1_id) || sentinels.contains(&bond.atom2_id))
        .map(|bond| (bond.atom1_id, bond.atom2_id))
        .collect();

    if severed.is_empty() {
        trace!("No bonds to sentinel '{}' found; nothing to convert", sentinel);
        return Ok(0);
    }

    let mut new_ports = Vec::new();
    for &(a, b) in &severed {
        for (kept, cut) in [(a, b), (b, a)] {
            if sentinels.contains(&kept) {
                continue;
            }
            let kept_position = compound.expect_atom(kept)?.position;
            let cut_position = compound.expect_atom(cut)?.position;
            let bond_vector = cut_position - kept_position;
            let port = Port::new(kept, &kept_position, &bond_vector, bond_vector.norm() / 2.0)
                .ok_or(GraphError::DegenerateOrientation)?;
            let parent = compound
                .node(kept)
                .and_then(|node| node.parent())
                .unwrap_or_else(|| compound.root());
            new_ports.push((parent, port));
        }
    }

    for &(a, b) in &severed {
        compound.remove_bond(a, b);
    }
    let created = new_ports.len();
    for (parent, port) in new_ports {
        compound.add_port(parent, port, None)?;
    }
    for id in sentinels {
        if compound.contains(id) {
            compound.remove(id)?;
        }
    }

    debug!(
        "Converted {} sentinel bond(s) into {} port(s) on '{}'",
        severed.len(),
        created,
        compound.name()
    );
    Ok(created)
}
