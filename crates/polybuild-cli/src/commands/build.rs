use crate::cli::BuildArgs;
use crate::config::{BuildRequest, MonomerRequest, PartialBuildConfig};
use crate::error::Result;
use polybuild::core::fragments::library::FragmentLibrary;
use polybuild::core::models::compound::Compound;
use polybuild::engine::error::EngineError;
use polybuild::workflows::{ammonium, coarse, fragments, vinyl, zwitterion};
use std::collections::HashSet;
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    let request = PartialBuildConfig::from_file(&args.config)?.merge_with_cli(&args)?;
    let compound = build(request)?;
    print!("{}", summarize(&compound));
    Ok(())
}

fn build(request: BuildRequest) -> Result<Compound> {
    let BuildRequest {
        library,
        monomer,
        terminate,
    } = request;

    let mut compound = build_monomer(&library, monomer)?;
    if terminate {
        info!("Capping all open ports with hydrogen.");
        compound = fragments::terminate(&library, compound)?;
    }
    Ok(compound)
}

fn build_monomer(
    library: &FragmentLibrary,
    monomer: MonomerRequest,
) -> std::result::Result<Compound, EngineError> {
    match monomer {
        MonomerRequest::Ethylene(options) => vinyl::ethylene(library, options),
        MonomerRequest::Acrylamide(options) => vinyl::acrylamide(library, options),
        MonomerRequest::Methacrylate(options) => vinyl::methacrylate(library, options),
        MonomerRequest::Ammonium(options) => ammonium::ammonium(library, options),
        MonomerRequest::Cbma(options) => zwitterion::cbma(library, options),
        MonomerRequest::Sbaa(options) => zwitterion::sbaa(library, options),
        MonomerRequest::Sbma(options) => zwitterion::sbma(library, options),
        MonomerRequest::Alkane {
            n,
            cap_front,
            cap_end,
        } => fragments::alkane(library, n, cap_front, cap_end),
        MonomerRequest::Fragment(name) => fragments::fragment(library, &name),
        MonomerRequest::Ion(element) => fragments::monatomic_ion(&element),
        MonomerRequest::Bead {
            name,
            ports,
            bond_length,
        } => coarse::bead(&name, ports, bond_length),
        MonomerRequest::Betaine(options) => coarse::betaine(options),
    }
}

fn summarize(compound: &Compound) -> String {
    let composition: Vec<String> = compound
        .composition()
        .into_iter()
        .map(|(element, count)| format!("{}{}", element, count))
        .collect();

    let mut lines = vec![
        format!("Compound: {}", compound.name()),
        format!("  Atoms: {}", compound.atom_count()),
        format!("  Bonds: {}", compound.bond_count()),
        format!("  Composition: {}", composition.join(" ")),
    ];

    let ports = compound.ports_of(compound.root());
    let exposed: HashSet<_> = ports.iter().map(|(_, id)| *id).collect();
    if ports.is_empty() {
        lines.push("  Open ports: none".to_string());
    } else {
        let labels: Vec<_> = ports.into_iter().map(|(label, _)| label).collect();
        lines.push(format!("  Open ports: {}", labels.join(", ")));
    }
    let hidden = compound.port_count().saturating_sub(exposed.len());
    if hidden > 0 {
        lines.push(format!("  Unexposed ports: {}", hidden));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
