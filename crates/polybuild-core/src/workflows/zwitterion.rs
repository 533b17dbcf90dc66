use super::ammonium::ammonium;
use super::fragments::{alkane, ester, sulfonate};
use super::vinyl::{acrylamide, methacrylate};
use crate::core::fragments::library::FragmentLibrary;
use crate::core::models::compound::Compound;
use crate::core::models::ids::NodeId;
use crate::engine::config::{AmmoniumOptions, SubstituentSource, VinylOptions, ZwitterionOptions};
use crate::engine::error::EngineError;
use crate::engine::fusion::fuse;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy)]
enum Backbone {
    Methacrylate,
    Acrylamide,
}

impl Backbone {
    fn label(self) -> &'static str {
        match self {
            Self::Methacrylate => "methacrylate",
            Self::Acrylamide => "acrylamide",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Anion {
    Carboxylate,
    Sulfonate,
}

/// Carboxybetaine methacrylate.
pub fn cbma(library: &FragmentLibrary, options: ZwitterionOptions) -> Result<Compound, EngineError> {
    zwitterion(library, "CBMA", Backbone::Methacrylate, Anion::Carboxylate, options)
}

/// Sulfobetaine acrylamide.
pub fn sbaa(library: &FragmentLibrary, options: ZwitterionOptions) -> Result<Compound, EngineError> {
    zwitterion(library, "SBAA", Backbone::Acrylamide, Anion::Sulfonate, options)
}

/// Sulfobetaine methacrylate.
pub fn sbma(library: &FragmentLibrary, options: ZwitterionOptions) -> Result<Compound, EngineError> {
    zwitterion(library, "SBMA", Backbone::Methacrylate, Anion::Sulfonate, options)
}

/// backbone - spacer - N+(CH3)2 - spacer - anion, with the backbone's `up` and
/// `down` exposed on the monomer.
#[instrument(skip_all, fields(monomer = name))]
fn zwitterion(
    library: &FragmentLibrary,
    name: &str,
    backbone: Backbone,
    anion: Anion,
    options: ZwitterionOptions,
) -> Result<Compound, EngineError> {
    options.validate()?;

    let vinyl = VinylOptions {
        cap_branch: false,
        chiral_switch: options.switch_backbone_chiral,
        ..VinylOptions::default()
    };
    let unit = match backbone {
        Backbone::Methacrylate => methacrylate(library, vinyl)?,
        Backbone::Acrylamide => acrylamide(library, vinyl)?,
    };

    let mut monomer = Compound::new(name);
    let root = monomer.root();
    let group = monomer.add(root, unit, Some(backbone.label().into()))?;
    let up = monomer.lookup_in(group, "up")?;
    let down = monomer.lookup_in(group, "down")?;
    let branch = monomer.lookup_in(group, "branch")?;

    let tail = extend_with_spacer(library, &mut monomer, branch, options.spacer_backbone, "spacer backbone")?;

    let cation = ammonium(
        library,
        AmmoniumOptions {
            substituents: 2,
            source: SubstituentSource::Alkane(vec![1]),
        },
    )?;
    let inward = cation.lookup("port[0]")?;
    let outward = cation.lookup("port[1]")?;
    let cation = fuse(&mut monomer, tail, cation, inward, "ammonium")?;
    let outward = cation.handle(outward)?;

    let tail = extend_with_spacer(library, &mut monomer, outward, options.spacer_ion, "spacer ion")?;

    let (anion, label) = match anion {
        Anion::Carboxylate => (ester(library, true)?, "ester"),
        Anion::Sulfonate => (sulfonate(library, true)?, "sulfonate"),
    };
    let port = anion.lookup("port[0]")?;
    fuse(&mut monomer, tail, anion, port, label)?;

    monomer.hoist(root, up, "up")?;
    monomer.hoist(root, down, "down")?;

    info!(
        "Built {} monomer: {} atoms, {} bonds",
        name,
        monomer.atom_count(),
        monomer.bond_count()
    );
    Ok(monomer)
}

/// Fuses an open-ended alkane of `n` carbons onto `port` and returns the
/// chain's far end.
fn extend_with_spacer(
    library: &FragmentLibrary,
    monomer: &mut Compound,
    port: NodeId,
    n: usize,
    label: &str,
) -> Result<NodeId, EngineError> {
    let spacer = alkane(library, n, false, false)?;
    let up = spacer.lookup("up")?;
    let down = spacer.lookup("down")?;
    let fused = fuse(monomer, port, spacer, up, label)?;
    Ok(fused.handle(down)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ConfigError;

    fn library() -> FragmentLibrary {
        FragmentLibrary::builtin().unwrap()
    }

    fn formula(compound: &Compound) -> Vec<(String, usize)> {
        compound.composition().into_iter().collect()
    }

    #[test]
    fn cbma_has_the_carboxybetaine_formula() {
        let monomer = cbma(&library(), ZwitterionOptions::default()).unwrap();
        assert_eq!(
            formula(&monomer),
            [
                ("C".to_string(), 11),
                ("H".to_string(), 19),
                ("N".to_string(), 1),
                ("O".to_string(), 4)
            ]
        );
        assert_eq!(monomer.atom_count(), 35);
        assert_eq!(monomer.bond_count(), 34);
    }

    #[test]
    fn sulfobetaines_carry_sulfur_and_only_backbone_ports() {
        let library = library();
        let sbma = sbma(&library, ZwitterionOptions::default()).unwrap();
        let sbaa = sbaa(&library, ZwitterionOptions::default()).unwrap();

        assert_eq!(sbma.composition().get("S"), Some(&1));
        assert_eq!(sbma.atom_count(), 36);
        assert_eq!(sbaa.atom_count(), 34);
        assert_eq!(sbaa.composition().get("N"), Some(&2));
        for monomer in [&sbma, &sbaa] {
            let ports: Vec<_> = monomer
                .ports_of(monomer.root())
                .into_iter()
                .map(|(label, _)| label)
                .collect();
            assert_eq!(ports, ["up", "down"]);
            assert_eq!(monomer.port_count(), 2);
        }
    }

    #[test]
    fn spacer_lengths_add_methylene_units() {
        let library = library();
        let short = cbma(&library, ZwitterionOptions::default()).unwrap();
        let options = ZwitterionOptions {
            spacer_backbone: 3,
            spacer_ion: 4,
            ..ZwitterionOptions::default()
        };
        let long = cbma(&library, options).unwrap();
        assert_eq!(long.atom_count(), short.atom_count() + 3 * 3);
    }

    #[test]
    fn backbone_chirality_switch_keeps_the_formula() {
        let library = library();
        let options = ZwitterionOptions {
            switch_backbone_chiral: true,
            ..ZwitterionOptions::default()
        };
        let left = sbma(&library, ZwitterionOptions::default()).unwrap();
        let right = sbma(&library, options).unwrap();
        assert_eq!(left.composition(), right.composition());
        assert_eq!(left.bond_count(), right.bond_count());
    }

    #[test]
    fn zero_spacer_is_rejected() {
        let options = ZwitterionOptions {
            spacer_backbone: 0,
            ..ZwitterionOptions::default()
        };
        let err = cbma(&library(), options).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::InvalidParameter {
                parameter: "spacer_backbone",
                ..
            })
        ));
    }

    #[test]
    fn hoisted_ends_belong_to_the_backbone() {
        let monomer = cbma(&library(), ZwitterionOptions::default()).unwrap();
        assert_eq!(
            monomer.lookup("down").unwrap(),
            monomer.resolve(&["methacrylate", "CH2", "down"]).unwrap()
        );
    }
}
