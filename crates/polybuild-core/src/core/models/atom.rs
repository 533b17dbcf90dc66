use nalgebra::Point3;

/// A single particle of a compound: an atom in all-atom fragments or a bead in
/// coarse-grained ones.
///
/// Atoms are owned by exactly one [`Compound`](super::compound::Compound) and are
/// destroyed together with every bond that touches them when removed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom as read from the fragment (e.g., "C", "H", "_B").
    pub name: String,
    /// The chemical element symbol. Coarse-grained beads have none.
    pub element: Option<String>,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` whose element is inferred from its name.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom, also used as its element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: Some(name.to_string()),
            position,
        }
    }

    /// Creates a particle without an element, as used for coarse-grained beads.
    pub fn bead(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: None,
            position,
        }
    }

    pub fn with_element(mut self, element: Option<&str>) -> Self {
        self.element = element.map(str::to_string);
        self
    }

    /// The key this atom contributes to a compound's composition: its element
    /// symbol, or its name for element-less particles.
    pub fn composition_key(&self) -> &str {
        self.element.as_deref().unwrap_or(&self.name)
    }

    /// Case-insensitive comparison of the atom name against an atom type.
    pub fn is_type(&self, atom_type: &str) -> bool {
        self.name.eq_ignore_ascii_case(atom_type)
    }
}
