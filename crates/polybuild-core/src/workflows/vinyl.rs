use super::fragments::{amide, cap_with_hydrogen, ch2, ester, methyl, quaternary_carbon};
use crate::core::fragments::library::FragmentLibrary;
use crate::core::models::compound::Compound;
use crate::core::models::error::GraphError;
use crate::core::models::ids::NodeId;
use crate::engine::config::{Substituent, VinylOptions};
use crate::engine::error::EngineError;
use crate::engine::fusion::fuse;
use crate::engine::selection::{PortChoice, select_port};
use tracing::{debug, info};

/// What occupies the chiral position that does not carry the branch.
#[derive(Debug, Clone, Copy)]
enum Filler {
    Hydrogen,
    Methyl,
}

/// The linker between the backbone and the branch position, if any.
#[derive(Debug, Clone, Copy)]
enum Linker {
    None,
    Amide,
    Ester,
}

impl Filler {
    fn label(self) -> &'static str {
        match self {
            Self::Hydrogen => "hydrogen",
            Self::Methyl => "methyl",
        }
    }
}

impl Linker {
    fn label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Amide => Some("amide"),
            Self::Ester => Some("ester"),
        }
    }
}

/// -CH2-CH(R)- where R is the functional group, or hydrogen.
pub fn ethylene(library: &FragmentLibrary, options: VinylOptions) -> Result<Compound, EngineError> {
    vinyl(library, "Ethylene", Filler::Hydrogen, Linker::None, options)
}

/// -CH2-CH(C(=O)NH-R)-.
pub fn acrylamide(library: &FragmentLibrary, options: VinylOptions) -> Result<Compound, EngineError> {
    vinyl(library, "Acrylamide", Filler::Hydrogen, Linker::Amide, options)
}

/// -CH2-C(CH3)(C(=O)O-R)-.
pub fn methacrylate(
    library: &FragmentLibrary,
    options: VinylOptions,
) -> Result<Compound, EngineError> {
    vinyl(library, "Methacrylate", Filler::Methyl, Linker::Ester, options)
}

/// Builds a vinyl repeat unit around a quaternary carbon.
///
/// `port[0]` of the carbon carries the CH2, `port[1]` and `port[2]` are the
/// chiral positions holding the branch and the filler, and `port[3]` is the
/// `up` end of the unit. The CH2's free port is the `down` end.
///
/// The functional group's port is chosen, and every name that will be hoisted
/// is checked, before the compound is assembled.
fn vinyl(
    library: &FragmentLibrary,
    name: &str,
    filler: Filler,
    linker: Linker,
    options: VinylOptions,
) -> Result<Compound, EngineError> {
    options.validate()?;
    let VinylOptions {
        functional_group,
        cap_branch,
        cap_ternary,
        cap_primary,
        chiral_switch,
    } = options;

    let ternary_label = if cap_ternary { "cap ternary" } else { "up" };
    let primary_label = if cap_primary { "cap primary" } else { "down" };
    let group = match functional_group {
        Some(Substituent { compound, port }) => {
            let choice = select_port(&compound, port.as_deref())?;
            let mut reserved = vec![
                "quaternary C",
                "CH2",
                filler.label(),
                ternary_label,
                primary_label,
                "functional group",
            ];
            reserved.extend(linker.label());
            check_hoisted_names(&compound, &choice, &reserved)?;
            Some((compound, choice))
        }
        None => None,
    };

    let mut monomer = Compound::new(name);
    let root = monomer.root();
    let core = monomer.add(root, quaternary_carbon(library)?, Some("quaternary C".into()))?;
    let slots = [
        monomer.lookup_in(core, "port[0]")?,
        monomer.lookup_in(core, "port[1]")?,
        monomer.lookup_in(core, "port[2]")?,
        monomer.lookup_in(core, "port[3]")?,
    ];
    let (branch_slot, filler_slot) = if chiral_switch {
        (slots[2], slots[1])
    } else {
        (slots[1], slots[2])
    };

    let methylene = ch2(library)?;
    let up = methylene.lookup("up")?;
    let methylene = fuse(&mut monomer, slots[0], methylene, up, "CH2")?;
    let down = monomer.lookup_in(methylene.group, "down")?;

    match filler {
        Filler::Hydrogen => {
            cap_with_hydrogen(library, &mut monomer, filler_slot, filler.label())?;
        }
        Filler::Methyl => {
            let methyl = methyl(library)?;
            let up = methyl.lookup("up")?;
            fuse(&mut monomer, filler_slot, methyl, up, filler.label())?;
        }
    }

    if cap_ternary {
        cap_with_hydrogen(library, &mut monomer, slots[3], ternary_label)?;
    } else {
        monomer.hoist(root, slots[3], ternary_label)?;
    }
    if cap_primary {
        cap_with_hydrogen(library, &mut monomer, down, primary_label)?;
    } else {
        monomer.hoist(root, down, primary_label)?;
    }

    let open = match linker {
        Linker::None => branch_slot,
        Linker::Amide => attach_linker(&mut monomer, branch_slot, amide(library)?, "amide")?,
        Linker::Ester => attach_linker(&mut monomer, branch_slot, ester(library, false)?, "ester")?,
    };

    match group {
        Some((compound, choice)) => {
            let fused = fuse(&mut monomer, open, compound, choice.port, "functional group")?;
            let hoisted = choice
                .others
                .into_iter()
                .map(|(label, port)| Ok((label, fused.handle(port)?)))
                .collect::<Result<Vec<_>, GraphError>>()?;
            for (label, port) in hoisted {
                monomer.hoist(root, port, &label)?;
            }
        }
        None if cap_branch => {
            cap_with_hydrogen(library, &mut monomer, open, "cap branch")?;
        }
        None => monomer.hoist(root, open, "branch")?,
    }

    info!(
        "Built {} monomer: {} atoms, {} open ports",
        name,
        monomer.atom_count(),
        monomer.port_count()
    );
    Ok(monomer)
}

/// Fuses a two-port linker onto `slot` through its `port[0]` and returns its
/// remaining port.
fn attach_linker(
    monomer: &mut Compound,
    slot: NodeId,
    linker: Compound,
    label: &str,
) -> Result<NodeId, EngineError> {
    let near = linker.lookup("port[0]")?;
    let far = linker.lookup("port[1]")?;
    let fused = fuse(monomer, slot, linker, near, label)?;
    debug!("Attached {} linker to the backbone", label);
    Ok(fused.handle(far)?)
}

/// Rejects functional groups whose leftover ports would be hoisted under a name
/// the monomer's root already uses.
fn check_hoisted_names(
    compound: &Compound,
    choice: &PortChoice,
    reserved: &[&str],
) -> Result<(), GraphError> {
    match choice
        .others
        .iter()
        .find(|(label, _)| reserved.contains(&label.as_str()))
    {
        Some((label, _)) => Err(GraphError::LabelExists {
            label: label.clone(),
            group: compound.name().to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::fragments::{alkane, phenyl, terminate};
    use crate::core::models::atom::Atom;
    use crate::core::models::labels::LabelSpec;
    use crate::core::models::port::Port;
    use crate::engine::config::ConfigError;
    use nalgebra::{Point3, Vector3};
    use crate::engine::error::ErrorCategory;

    fn library() -> FragmentLibrary {
        FragmentLibrary::builtin().unwrap()
    }

    fn port_labels(compound: &Compound) -> Vec<String> {
        let mut labels: Vec<String> = compound
            .ports_of(compound.root())
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        labels.sort();
        labels
    }

    mod backbone {
        use super::*;

        #[test]
        fn default_ethylene_exposes_both_backbone_ends() {
            let monomer = ethylene(&library(), VinylOptions::default()).unwrap();
            assert_eq!(monomer.atom_count(), 6);
            assert_eq!(monomer.composition().get("C"), Some(&2));
            assert_eq!(monomer.composition().get("H"), Some(&4));
            assert_eq!(port_labels(&monomer), ["down", "up"]);
        }

        #[test]
        fn capping_both_ends_leaves_no_ports() {
            let options = VinylOptions::builder()
                .cap_ternary(true)
                .cap_primary(true)
                .build()
                .unwrap();
            let monomer = ethylene(&library(), options).unwrap();
            assert_eq!(monomer.port_count(), 0);
            assert_eq!(monomer.atom_count(), 8);
            assert!(monomer.get("cap ternary").is_some());
            assert!(monomer.get("cap primary").is_some());
        }

        #[test]
        fn uncapped_branch_is_exposed() {
            let options = VinylOptions::builder().cap_branch(false).build().unwrap();
            let monomer = ethylene(&library(), options).unwrap();
            assert_eq!(port_labels(&monomer), ["branch", "down", "up"]);
            assert_eq!(monomer.atom_count(), 5);
        }

        #[test]
        fn hoisted_ports_are_the_nested_ports() {
            let monomer = ethylene(&library(), VinylOptions::default()).unwrap();
            assert_eq!(
                monomer.lookup("down").unwrap(),
                monomer.resolve(&["CH2", "down"]).unwrap()
            );
            let up = monomer.lookup("up").unwrap();
            let carbon = monomer.resolve(&["quaternary C", "C[0]"]).unwrap();
            assert_eq!(monomer.port(up).unwrap().anchor, carbon);
        }

        #[test]
        fn backbone_carbons_are_bonded() {
            let monomer = ethylene(&library(), VinylOptions::default()).unwrap();
            let core = monomer.resolve(&["quaternary C", "C[0]"]).unwrap();
            let methylene = monomer.resolve(&["CH2", "C[0]"]).unwrap();
            assert!(monomer.bonded_neighbors(core).unwrap().contains(&methylene));
        }
    }

    mod chirality {
        use super::*;

        #[test]
        fn switch_keeps_composition_and_moves_the_branch() {
            let library = library();
            let left = methacrylate(&library, VinylOptions::default()).unwrap();
            let options = VinylOptions::builder().chiral_switch(true).build().unwrap();
            let right = methacrylate(&library, options).unwrap();

            assert_eq!(left.composition(), right.composition());
            assert_eq!(left.bond_count(), right.bond_count());
            assert_eq!(left.port_count(), right.port_count());

            let position = |monomer: &Compound| {
                let carbon = monomer.resolve(&["ester", "C[0]"]).unwrap();
                monomer.atom(carbon).unwrap().position
            };
            assert!((position(&left) - position(&right)).norm() > 0.5);
        }
    }

    mod linkers {
        use super::*;

        #[test]
        fn methacrylate_carries_methyl_and_capped_ester() {
            let monomer = methacrylate(&library(), VinylOptions::default()).unwrap();
            assert_eq!(monomer.atom_count(), 12);
            assert!(monomer.get("methyl").is_some());
            assert!(monomer.get("ester").is_some());
            assert_eq!(port_labels(&monomer), ["down", "up"]);
        }

        #[test]
        fn acrylamide_counts() {
            let monomer = acrylamide(&library(), VinylOptions::default()).unwrap();
            assert_eq!(monomer.atom_count(), 10);
            assert_eq!(monomer.composition().get("N"), Some(&1));
        }

        #[test]
        fn open_ester_oxygen_is_exposed_as_branch() {
            let options = VinylOptions::builder().cap_branch(false).build().unwrap();
            let monomer = methacrylate(&library(), options).unwrap();
            let branch = monomer.lookup("branch").unwrap();
            let anchor = monomer.port(branch).unwrap().anchor;
            assert_eq!(monomer.atom(anchor).unwrap().name, "O");
        }
    }

    mod functional_groups {
        use super::*;

        #[test]
        fn phenyl_makes_styrene() {
            let library = library();
            let group = Substituent::new(phenyl(&library).unwrap());
            let options = VinylOptions::builder().functional_group(group).build().unwrap();
            let styrene = ethylene(&library, options).unwrap();
            assert_eq!(styrene.atom_count(), 16);
            assert_eq!(styrene.composition().get("C"), Some(&8));
            assert_eq!(port_labels(&styrene), ["down", "up"]);
        }

        #[test]
        fn group_with_several_ports_needs_a_port_name() {
            let library = library();
            let chain = alkane(&library, 2, false, false).unwrap();
            let options = VinylOptions::builder()
                .functional_group(Substituent::new(chain))
                .build()
                .unwrap();
            let err = methacrylate(&library, options).unwrap_err();
            assert!(matches!(
                err,
                EngineError::Config(ConfigError::AmbiguousPort { .. })
            ));
        }

        #[test]
        fn leftover_ports_are_hoisted_with_their_labels() {
            let library = library();
            let chain = alkane(&library, 2, false, false).unwrap();
            let options = VinylOptions::builder()
                .functional_group(Substituent::new(chain).with_port("up"))
                .cap_primary(true)
                .build()
                .unwrap();
            let monomer = acrylamide(&library, options).unwrap();

            assert_eq!(port_labels(&monomer), ["down", "up"]);
            assert_eq!(
                monomer.lookup("down").unwrap(),
                monomer
                    .resolve(&["functional group", "CH2[1]", "down"])
                    .unwrap()
            );
        }

        #[test]
        fn colliding_leftover_port_is_rejected() {
            let library = library();
            let chain = alkane(&library, 2, false, false).unwrap();
            let options = VinylOptions::builder()
                .functional_group(Substituent::new(chain).with_port("up"))
                .build()
                .unwrap();
            let err = ethylene(&library, options).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Configuration);
        }

        fn two_port_group(second: &str) -> Compound {
            let mut group = Compound::new("R");
            let root = group.root();
            let carbon = group
                .add_atom(root, Atom::new("C", Point3::origin()), None)
                .unwrap();
            for (label, direction) in [("attach", Vector3::x()), (second, -Vector3::x())] {
                let port = Port::new(carbon, &Point3::origin(), &direction, 0.7).unwrap();
                group.add_port(root, port, Some(LabelSpec::fixed(label))).unwrap();
            }
            group
        }

        #[test]
        fn leftover_port_may_not_shadow_a_backbone_part() {
            let library = library();
            for taken in ["methyl", "ester", "quaternary C", "functional group"] {
                let options = VinylOptions::builder()
                    .functional_group(Substituent::new(two_port_group(taken)).with_port("attach"))
                    .build()
                    .unwrap();
                let err = methacrylate(&library, options).unwrap_err();
                assert!(
                    matches!(&err, EngineError::Graph(GraphError::LabelExists { label, .. }) if label == taken),
                    "{}: {:?}",
                    taken,
                    err
                );
                assert_eq!(err.category(), ErrorCategory::Configuration);
            }
        }

        #[test]
        fn free_leftover_name_is_exposed() {
            let library = library();
            let options = VinylOptions::builder()
                .functional_group(Substituent::new(two_port_group("tail")).with_port("attach"))
                .build()
                .unwrap();
            let monomer = methacrylate(&library, options).unwrap();
            assert_eq!(port_labels(&monomer), ["down", "tail", "up"]);
            assert_eq!(
                monomer.lookup("tail").unwrap(),
                monomer.resolve(&["functional group", "tail"]).unwrap()
            );
        }

        #[test]
        fn unknown_port_name_is_rejected() {
            let library = library();
            let options = VinylOptions::builder()
                .functional_group(Substituent::new(phenyl(&library).unwrap()).with_port("tail"))
                .build()
                .unwrap();
            let err = ethylene(&library, options).unwrap_err();
            assert!(matches!(
                err,
                EngineError::Config(ConfigError::UnknownPort { .. })
            ));
        }
    }

    #[test]
    fn terminate_fills_every_port() {
        let library = library();
        let monomer = methacrylate(&library, VinylOptions::default()).unwrap();
        let atoms = monomer.atom_count();
        let molecule = terminate(&library, monomer).unwrap();
        assert_eq!(molecule.port_count(), 0);
        assert_eq!(molecule.atom_count(), atoms + 2);
    }
}
