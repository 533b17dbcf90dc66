use crate::core::models::atom::Atom;
use crate::core::models::compound::Compound;
use crate::core::models::labels::LabelSpec;
use crate::core::models::port::Port;
use crate::core::models::topology::BondOrder;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// A single atom of a fragment template, as written in the library file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TemplateAtom {
    pub name: String,
    /// Element symbol. Defaults to the atom name.
    #[serde(default)]
    pub element: Option<String>,
    pub position: [f64; 3],
}

/// A bond between two atoms of a template, given by their indices.
///
/// Written either as a bare pair (`[0, 1]`, single bond) or as a table with an
/// explicit order (`{ atoms = [0, 1], order = "double" }`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TemplateBond {
    Pair([usize; 2]),
    Ordered { atoms: [usize; 2], order: String },
}

impl TemplateBond {
    pub fn atoms(&self) -> [usize; 2] {
        match self {
            Self::Pair(atoms) | Self::Ordered { atoms, .. } => *atoms,
        }
    }
}

/// A port declared directly on a template instead of through a cut atom.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TemplatePort {
    pub label: String,
    pub anchor: usize,
    pub direction: [f64; 3],
    pub separation: f64,
}

/// The full description of a rigid fragment.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FragmentTemplate {
    pub atoms: Vec<TemplateAtom>,
    #[serde(default)]
    pub bonds: Vec<TemplateBond>,
    #[serde(default)]
    pub ports: Vec<TemplatePort>,
}

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid fragment template '{fragment}': {reason}")]
    InvalidTemplate { fragment: String, reason: String },
    #[error("Unknown fragment '{0}'")]
    UnknownFragment(String),
}

impl FragmentTemplate {
    /// Builds a fresh compound named `name` from this template.
    ///
    /// Atoms are added in file order (and therefore labelled `C[0]`, `C[1]`,
    /// ...), followed by bonds and explicitly declared ports. Cut atoms are left
    /// in place; converting them to ports is the engine's job.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateLoadError::InvalidTemplate`] if the template has no
    /// atoms, a bond or port references an atom index out of range, a bond
    /// order cannot be parsed, or a port has a zero direction or a non-positive
    /// separation.
    pub fn build(&self, name: &str) -> Result<Compound, TemplateLoadError> {
        let invalid = |reason: String| TemplateLoadError::InvalidTemplate {
            fragment: name.to_string(),
            reason,
        };

        if self.atoms.is_empty() {
            return Err(invalid("template has no atoms".to_string()));
        }

        let mut compound = Compound::new(name);
        let root = compound.root();

        let mut atom_ids = Vec::with_capacity(self.atoms.len());
        for atom_data in &self.atoms {
            let mut atom = Atom::new(&atom_data.name, Point3::from(atom_data.position));
            if let Some(element) = &atom_data.element {
                atom.element = Some(element.clone());
            }
            let id = compound
                .add_atom(root, atom, None)
                .map_err(|e| invalid(e.to_string()))?;
            atom_ids.push(id);
        }

        for bond in &self.bonds {
            let [i, j] = bond.atoms();
            if i == j {
                return Err(invalid(format!("atom {} is bonded to itself", i)));
            }
            let (Some(&a), Some(&b)) = (atom_ids.get(i), atom_ids.get(j)) else {
                return Err(invalid(format!(
                    "bond [{}, {}] references a non-existent atom",
                    i, j
                )));
            };
            let order = match bond {
                TemplateBond::Pair(_) => BondOrder::Single,
                TemplateBond::Ordered { order, .. } => BondOrder::from_str(order)
                    .map_err(|_| invalid(format!("unknown bond order '{}'", order)))?,
            };
            compound
                .add_bond(a, b, order)
                .map_err(|e| invalid(e.to_string()))?;
        }

        for port_data in &self.ports {
            let anchor = *atom_ids.get(port_data.anchor).ok_or_else(|| {
                invalid(format!(
                    "port '{}' is anchored on non-existent atom {}",
                    port_data.label, port_data.anchor
                ))
            })?;
            if port_data.separation <= 0.0 {
                return Err(invalid(format!(
                    "port '{}' must have a positive separation",
                    port_data.label
                )));
            }
            let anchor_position = Point3::from(self.atoms[port_data.anchor].position);
            let port = Port::new(
                anchor,
                &anchor_position,
                &Vector3::from(port_data.direction),
                port_data.separation,
            )
            .ok_or_else(|| invalid(format!("port '{}' has a zero direction", port_data.label)))?;
            compound
                .add_port(root, port, Some(LabelSpec::fixed(port_data.label.as_str())))
                .map_err(|e| invalid(e.to_string()))?;
        }

        Ok(compound)
    }
}
