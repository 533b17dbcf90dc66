use super::error::EngineError;
use crate::core::models::compound::Compound;
use crate::core::models::error::GraphError;
use crate::core::models::ids::NodeId;
use crate::core::models::labels::LabelSpec;
use crate::core::models::topology::BondOrder;
use crate::core::utils::geometry::alignment_transform;
use std::collections::HashMap;
use tracing::debug;

/// The result of a fusion: the group now holding the moved fragment, and the
/// translation from the fragment's old handles to their new ones.
#[derive(Debug, Clone)]
pub struct Fused {
    pub group: NodeId,
    handles: HashMap<NodeId, NodeId>,
}

impl Fused {
    /// The new handle of a node that belonged to the moved fragment.
    pub fn handle(&self, old: NodeId) -> Result<NodeId, GraphError> {
        self.handles
            .get(&old)
            .copied()
            .ok_or(GraphError::NodeNotFound { id: old })
    }
}

/// Moves `moving` onto `stationary` so that the two ports meet, then joins them.
///
/// `moving` is rigidly transformed until its port coincides with
/// `stationary_port` and faces it, added to the root of `stationary` under
/// `label`, and bonded anchor to anchor. Both ports are consumed.
///
/// The destination label may already exist only when it names the stationary
/// port itself, since that port disappears as part of the fusion.
///
/// # Return
///
/// A [`Fused`] naming the new group. Handles of `moving` are invalid after the
/// call; translate them with [`Fused::handle`].
///
/// # Errors
///
/// Geometry errors if either port is gone or its anchor atom no longer exists;
/// [`GraphError::LabelExists`] if `label` is taken. All checks run before
/// anything is modified.
pub fn fuse(
    stationary: &mut Compound,
    stationary_port: NodeId,
    mut moving: Compound,
    moving_port: NodeId,
    label: impl Into<LabelSpec>,
) -> Result<Fused, EngineError> {
    let label = label.into();
    let root = stationary.root();

    let target = stationary.expect_port(stationary_port)?.clone();
    if stationary.atom(target.anchor).is_none() {
        return Err(GraphError::AnchorMissing {
            port: stationary_port,
            anchor: target.anchor,
        }
        .into());
    }
    let source = moving.expect_port(moving_port)?.clone();
    if moving.atom(source.anchor).is_none() {
        return Err(GraphError::AnchorMissing {
            port: moving_port,
            anchor: source.anchor,
        }
        .into());
    }

    let replaces_port = match &label {
        LabelSpec::Fixed(name) => names_port_directly(stationary, name, stationary_port),
        LabelSpec::Indexed(_) => false,
    };
    if !replaces_port {
        stationary.check_label_free(root, &label)?;
    }

    let isometry = alignment_transform(
        &source.position,
        &source.orientation,
        &target.position,
        &target.orientation,
    );
    moving.transform_subtree(moving.root(), &isometry);

    let fragment_name = moving.name().to_string();
    stationary.remove(stationary_port)?;
    let (group, map) = stationary.graft(root, moving, Some(label))?;

    let moved_port = *map
        .get(&moving_port)
        .ok_or(GraphError::MissingPort { id: moving_port })?;
    let moved_anchor = *map.get(&source.anchor).ok_or(GraphError::AnchorMissing {
        port: moving_port,
        anchor: source.anchor,
    })?;
    stationary.remove(moved_port)?;
    stationary.add_bond(target.anchor, moved_anchor, BondOrder::Single)?;

    debug!(
        "Fused '{}' into '{}' ({} atoms, {} open ports)",
        fragment_name,
        stationary.name(),
        stationary.atom_count(),
        stationary.port_count()
    );
    Ok(Fused {
        group,
        handles: map,
    })
}

/// Whether `name` is a fixed label or hoisted alias of `port` in the root
/// namespace. Such a name is freed when the port is consumed; indexed names are
/// not, because removing the port renumbers its siblings.
fn names_port_directly(compound: &Compound, name: &str, port: NodeId) -> bool {
    let root = compound.root();
    let own_label = compound.node(port).is_some_and(|node| {
        node.parent() == Some(root) && matches!(node.label_spec(), LabelSpec::Fixed(own) if own == name)
    });
    let alias = compound
        .labels(root)
        .is_some_and(|labels| labels.aliases().iter().any(|(alias, target)| alias == name && *target == port));
    own_label || alias
}
