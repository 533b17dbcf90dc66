use crate::core::models::atom::Atom;
use crate::core::models::compound::Compound;
use crate::core::models::error::GraphError;
use crate::core::models::ids::NodeId;
use crate::core::models::labels::LabelSpec;
use crate::core::models::port::Port;
use crate::engine::config::{BetaineOptions, ConfigError};
use crate::engine::error::EngineError;
use crate::engine::fusion::fuse;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info, instrument};

/// Bead-to-bead distance used when none is given.
pub const DEFAULT_BOND_LENGTH: f64 = 1.0;

const BEAD_PORTS: [(&str, [f64; 3]); 4] = [
    ("up", [0.0, 1.0, 0.0]),
    ("down", [0.0, -1.0, 0.0]),
    ("branch_up", [1.0, 0.0, 0.0]),
    ("branch_down", [-1.0, 0.0, 0.0]),
];

/// A single coarse-grained particle with `n_ports` ports.
///
/// Ports are added in the order `up` (+y), `down` (-y), `branch_up` (+x) and
/// `branch_down` (-x), each half a bond length from the particle.
pub fn bead(name: &str, n_ports: usize, bond_length: f64) -> Result<Compound, EngineError> {
    if !(1..=BEAD_PORTS.len()).contains(&n_ports) {
        return Err(ConfigError::InvalidParameter {
            parameter: "n_ports",
            reason: format!("a bead has between 1 and 4 ports, got {}", n_ports),
        }
        .into());
    }
    if !(bond_length.is_finite() && bond_length > 0.0) {
        return Err(ConfigError::InvalidParameter {
            parameter: "bond_length",
            reason: format!("bond length must be positive, got {}", bond_length),
        }
        .into());
    }

    let mut bead = Compound::new(name);
    let root = bead.root();
    let particle = bead.add_atom(root, Atom::bead(name, Point3::origin()), None)?;
    for (label, [x, y, z]) in BEAD_PORTS.into_iter().take(n_ports) {
        let port = Port::new(
            particle,
            &Point3::origin(),
            &Vector3::new(x, y, z),
            bond_length / 2.0,
        )
        .ok_or(GraphError::DegenerateOrientation)?;
        bead.add_port(root, port, Some(LabelSpec::fixed(label)))?;
    }
    Ok(bead)
}

/// A coarse-grained betaine: a bead backbone with a pendant
/// spacer-cation-spacer-anion side chain on its middle bead.
///
/// The first backbone bead's `up` is exposed as `up`; the last bead's `down`
/// is exposed as `down`, or removed when `cap_group` is set.
#[instrument(skip_all, fields(backbone_length = options.backbone_length))]
pub fn betaine(options: BetaineOptions) -> Result<Compound, EngineError> {
    options.validate()?;

    let mut betaine = Compound::new("Betaine");
    let root = betaine.root();
    let middle = options.backbone_length / 2;

    let first = betaine.add(
        root,
        bead("_B", if middle == 0 { 3 } else { 2 }, DEFAULT_BOND_LENGTH)?,
        Some(LabelSpec::indexed("_B")),
    )?;
    let up = betaine.lookup_in(first, "up")?;
    let mut down = betaine.lookup_in(first, "down")?;
    let mut side = betaine.get_in(first, "branch_up");

    for i in 1..options.backbone_length {
        let n_ports = if i == middle { 3 } else { 2 };
        let group = extend(&mut betaine, down, bead("_B", n_ports, DEFAULT_BOND_LENGTH)?)?;
        down = betaine.lookup_in(group, "down")?;
        if i == middle {
            side = Some(betaine.lookup_in(group, "branch_up")?);
        }
    }
    let mut side = side.ok_or_else(|| GraphError::LabelNotFound {
        label: "branch_up".to_string(),
    })?;

    let mut pendant = Vec::new();
    if options.polar_backbone {
        pendant.push(("_P", 2));
    }
    let spacer = options.spacer_backbone - usize::from(options.polar_backbone);
    pendant.extend(std::iter::repeat_n(("_BP", 2), spacer));
    pendant.push(("_C", 2));
    pendant.extend(std::iter::repeat_n(("_BP", 2), options.spacer_ion));

    for (name, n_ports) in pendant {
        let group = extend(&mut betaine, side, bead(name, n_ports, DEFAULT_BOND_LENGTH)?)?;
        side = betaine.lookup_in(group, "down")?;
    }
    extend(&mut betaine, side, bead("_A", 1, DEFAULT_BOND_LENGTH)?)?;

    betaine.hoist(root, up, "up")?;
    if options.cap_group {
        betaine.remove(down)?;
    } else {
        betaine.hoist(root, down, "down")?;
    }

    info!(
        "Built betaine: {} beads, {} open ports",
        betaine.atom_count(),
        betaine.port_count()
    );
    Ok(betaine)
}

/// Fuses `bead` through its `up` port onto `port` and returns the new group.
fn extend(compound: &mut Compound, port: NodeId, bead: Compound) -> Result<NodeId, EngineError> {
    let up = bead.lookup("up")?;
    let label = LabelSpec::indexed(bead.name());
    let fused = fuse(compound, port, bead, up, label)?;
    debug!("Extended '{}' to {} beads", compound.name(), compound.atom_count());
    Ok(fused.group)
}
