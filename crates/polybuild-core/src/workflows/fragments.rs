use crate::core::fragments::library::FragmentLibrary;
use crate::core::models::atom::Atom;
use crate::core::models::compound::Compound;
use crate::core::models::ids::NodeId;
use crate::core::models::labels::LabelSpec;
use crate::engine::config::ConfigError;
use crate::engine::convert::atom_to_port;
use crate::engine::error::EngineError;
use crate::engine::fusion::fuse;
use nalgebra::Point3;
use phf::{Set, phf_set};
use tracing::{debug, instrument};

static MONATOMIC_IONS: Set<&'static str> = phf_set! {
    "H", "Li", "Na", "K", "Rb", "Cs", "Mg", "Ca", "Sr", "Ba", "F", "Cl", "Br", "I",
};

/// Loads a fragment from the library and turns its cut atoms into ports.
pub fn fragment(library: &FragmentLibrary, name: &str) -> Result<Compound, EngineError> {
    let mut compound = library.instantiate(name)?;
    atom_to_port(&mut compound, library.sentinel())?;
    Ok(compound)
}

/// A carbon with four tetrahedral ports, `port[0]` to `port[3]`.
pub fn quaternary_carbon(library: &FragmentLibrary) -> Result<Compound, EngineError> {
    fragment(library, "c_quaternary")
}

/// A methylene unit with ports `up` and `down`.
pub fn ch2(library: &FragmentLibrary) -> Result<Compound, EngineError> {
    fragment(library, "ch2")
}

/// A hydrogen atom with a single port `up`.
pub fn hydrogen(library: &FragmentLibrary) -> Result<Compound, EngineError> {
    fragment(library, "hydrogen")
}

/// An ester group -C(=O)O-: `port[0]` on the carbon, `port[1]` on the oxygen.
/// The ionic form (carboxylate) has no `port[1]`.
pub fn ester(library: &FragmentLibrary, ion: bool) -> Result<Compound, EngineError> {
    let mut ester = fragment(library, "ester")?;
    if ion {
        drop_port(&mut ester, "port[1]")?;
    }
    Ok(ester)
}

/// An amide group -C(=O)NH-: `port[0]` on the carbon, `port[1]` on the nitrogen.
pub fn amide(library: &FragmentLibrary) -> Result<Compound, EngineError> {
    fragment(library, "amide")
}

/// A sulfonate group: `port[0]` on the sulfur, `port[1]` on an oxygen. The
/// ionic form has no `port[1]`.
pub fn sulfonate(library: &FragmentLibrary, ion: bool) -> Result<Compound, EngineError> {
    let mut sulfonate = fragment(library, "sulfonate")?;
    if ion {
        drop_port(&mut sulfonate, "port[1]")?;
    }
    Ok(sulfonate)
}

pub fn phenyl(library: &FragmentLibrary) -> Result<Compound, EngineError> {
    fragment(library, "phenyl")
}

/// A methyl group with a single port `up`.
pub fn methyl(library: &FragmentLibrary) -> Result<Compound, EngineError> {
    alkane(library, 1, false, true)
}

/// A linear chain of `n` methylene units.
///
/// An end that is not capped with hydrogen stays open as `up` (front) or
/// `down` (end) on the chain itself.
#[instrument(skip_all, fields(n = n))]
pub fn alkane(
    library: &FragmentLibrary,
    n: usize,
    cap_front: bool,
    cap_end: bool,
) -> Result<Compound, EngineError> {
    if n == 0 {
        return Err(ConfigError::InvalidParameter {
            parameter: "n",
            reason: "an alkane needs at least one carbon".to_string(),
        }
        .into());
    }

    let mut alkane = Compound::new("Alkane");
    let root = alkane.root();

    let first = alkane.add(root, ch2(library)?, Some(LabelSpec::indexed("CH2")))?;
    let front = alkane.lookup_in(first, "up")?;
    let mut tail = alkane.lookup_in(first, "down")?;

    for _ in 1..n {
        let unit = ch2(library)?;
        let up = unit.lookup("up")?;
        let fused = fuse(&mut alkane, tail, unit, up, LabelSpec::indexed("CH2"))?;
        tail = alkane.lookup_in(fused.group, "down")?;
    }

    if cap_front {
        cap_with_hydrogen(library, &mut alkane, front, "cap front")?;
    } else {
        alkane.hoist(root, front, "up")?;
    }
    if cap_end {
        cap_with_hydrogen(library, &mut alkane, tail, "cap end")?;
    } else {
        alkane.hoist(root, tail, "down")?;
    }

    debug!(
        "Built alkane with {} carbons ({} atoms)",
        n,
        alkane.atom_count()
    );
    Ok(alkane)
}

/// A single-atom ion of one of the supported elements.
pub fn monatomic_ion(element: &str) -> Result<Compound, EngineError> {
    if !MONATOMIC_IONS.contains(element) {
        return Err(ConfigError::UnknownElement {
            element: element.to_string(),
        }
        .into());
    }
    let mut ion = Compound::new(element);
    let root = ion.root();
    ion.add_atom(root, Atom::new(element, Point3::origin()), None)?;
    Ok(ion)
}

/// Closes `port` of `compound` with a hydrogen atom registered under `label`.
pub fn cap_with_hydrogen(
    library: &FragmentLibrary,
    compound: &mut Compound,
    port: NodeId,
    label: &str,
) -> Result<NodeId, EngineError> {
    let cap = hydrogen(library)?;
    let up = cap.lookup("up")?;
    Ok(fuse(compound, port, cap, up, label)?.group)
}

/// Caps every open port of `compound`, nested ones included, with hydrogen.
pub fn terminate(library: &FragmentLibrary, mut compound: Compound) -> Result<Compound, EngineError> {
    let mut capped = 0;
    while let Some(&port) = compound.ports().first() {
        let cap = hydrogen(library)?;
        let up = cap.lookup("up")?;
        fuse(&mut compound, port, cap, up, LabelSpec::indexed("terminal H"))?;
        capped += 1;
    }
    debug!("Terminated '{}' with {} hydrogens", compound.name(), capped);
    Ok(compound)
}

fn drop_port(compound: &mut Compound, label: &str) -> Result<(), EngineError> {
    let port = compound.lookup(label)?;
    compound.expect_port(port)?;
    compound.remove(port)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorCategory;

    fn library() -> FragmentLibrary {
        FragmentLibrary::builtin().unwrap()
    }

    fn port_labels(compound: &Compound) -> Vec<String> {
        compound
            .ports_of(compound.root())
            .into_iter()
            .map(|(label, _)| label)
            .collect()
    }

    mod alkane {
        use super::*;

        #[test]
        fn fully_capped_alkane_has_no_ports() {
            let propane = alkane(&library(), 3, true, true).unwrap();
            assert_eq!(propane.atom_count(), 11);
            assert_eq!(propane.bond_count(), 10);
            assert_eq!(propane.port_count(), 0);
            assert_eq!(propane.composition().get("C"), Some(&3));
            assert_eq!(propane.composition().get("H"), Some(&8));
        }

        #[test]
        fn uncapped_ends_are_exposed_at_top_level() {
            let chain = alkane(&library(), 2, false, false).unwrap();
            assert_eq!(port_labels(&chain), ["up", "down"]);
            assert_eq!(chain.port_count(), 2);
            assert_eq!(chain.atom_count(), 6);

            let front = chain.lookup("up").unwrap();
            assert_eq!(chain.resolve(&["CH2[0]", "up"]).unwrap(), front);
            let end = chain.lookup("down").unwrap();
            assert_eq!(chain.resolve(&["CH2[1]", "down"]).unwrap(), end);
        }

        #[test]
        fn methyl_exposes_only_up() {
            let methyl = methyl(&library()).unwrap();
            assert_eq!(port_labels(&methyl), ["up"]);
            assert_eq!(methyl.atom_count(), 4);
        }

        #[test]
        fn zero_length_is_a_configuration_error() {
            let err = alkane(&library(), 0, true, true).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Configuration);
        }

        #[test]
        fn consecutive_carbons_are_bonded_at_carbon_distance() {
            let chain = alkane(&library(), 2, true, true).unwrap();
            let c0 = chain.resolve(&["CH2[0]", "C[0]"]).unwrap();
            let c1 = chain.resolve(&["CH2[1]", "C[0]"]).unwrap();
            assert!(chain.bonded_neighbors(c0).unwrap().contains(&c1));
            let distance =
                (chain.atom(c0).unwrap().position - chain.atom(c1).unwrap().position).norm();
            assert!((distance - 1.54).abs() < 1e-3);
        }
    }

    mod groups {
        use super::*;

        #[test]
        fn ionic_ester_keeps_only_the_carbon_port() {
            let ionic = ester(&library(), true).unwrap();
            let neutral = ester(&library(), false).unwrap();
            assert_eq!(port_labels(&ionic), ["port[0]"]);
            assert_eq!(port_labels(&neutral), ["port[0]", "port[1]"]);
            assert_eq!(ionic.atom_count(), neutral.atom_count());
        }

        #[test]
        fn ionic_sulfonate_keeps_only_the_sulfur_port() {
            let sulfonate = sulfonate(&library(), true).unwrap();
            assert_eq!(port_labels(&sulfonate), ["port[0]"]);
            let port = sulfonate.port(sulfonate.lookup("port[0]").unwrap()).unwrap();
            assert_eq!(sulfonate.atom(port.anchor).unwrap().name, "S");
        }

        #[test]
        fn amide_and_phenyl_expose_their_ports() {
            assert_eq!(port_labels(&amide(&library()).unwrap()), ["port[0]", "port[1]"]);
            assert_eq!(port_labels(&phenyl(&library()).unwrap()), ["port[0]"]);
        }

        #[test]
        fn hydrogen_cap_closes_a_port() {
            let library = library();
            let mut carbon = quaternary_carbon(&library).unwrap();
            let port = carbon.lookup("port[2]").unwrap();

            let cap = cap_with_hydrogen(&library, &mut carbon, port, "cap").unwrap();

            assert_eq!(carbon.get("cap"), Some(cap));
            assert_eq!(carbon.port_count(), 3);
            assert_eq!(carbon.bond_count(), 1);
        }
    }

    #[test]
    fn terminate_caps_nested_ports() {
        let library = library();
        let mut chain = alkane(&library, 2, false, true).unwrap();
        let root = chain.root();
        let front = chain.lookup("up").unwrap();
        chain.hoist(root, front, "front").unwrap();
        let atoms = chain.atom_count();

        let capped = terminate(&library, chain).unwrap();

        assert_eq!(capped.port_count(), 0);
        assert_eq!(capped.atom_count(), atoms + 1);
        assert!(capped.get("terminal H[0]").is_some());
    }

    mod ions {
        use super::*;

        #[test]
        fn supported_ions_are_single_atoms() {
            for element in ["Na", "Cl", "Mg", "I"] {
                let ion = monatomic_ion(element).unwrap();
                assert_eq!(ion.atom_count(), 1);
                assert_eq!(ion.port_count(), 0);
                assert_eq!(ion.composition().get(element), Some(&1));
            }
        }

        #[test]
        fn unsupported_element_is_rejected() {
            let err = monatomic_ion("Fe").unwrap_err();
            assert!(matches!(
                err,
                EngineError::Config(ConfigError::UnknownElement { ref element }) if element == "Fe"
            ));
            assert!(monatomic_ion("na").is_err());
        }
    }
}
