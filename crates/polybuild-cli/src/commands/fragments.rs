use crate::cli::FragmentsArgs;
use crate::error::Result;
use polybuild::core::fragments::library::FragmentLibrary;
use polybuild::workflows::fragments::fragment;

pub fn run(args: FragmentsArgs) -> Result<()> {
    let mut library = FragmentLibrary::builtin()?;
    if let Some(path) = &args.library {
        library.merge(FragmentLibrary::load(path)?);
    }
    for line in describe(&library)? {
        println!("{}", line);
    }
    Ok(())
}

/// One line per fragment: its name, atom count and exposed port labels.
fn describe(library: &FragmentLibrary) -> Result<Vec<String>> {
    let width = library.names().map(str::len).max().unwrap_or(0);
    library
        .names()
        .map(|name| {
            let compound = fragment(library, name)?;
            let ports: Vec<_> = compound
                .ports_of(compound.root())
                .into_iter()
                .map(|(label, _)| label)
                .collect();
            Ok(format!(
                "{:<width$}  {:>3} atoms  ports: {}",
                name,
                compound.atom_count(),
                ports.join(", "),
                width = width
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fragments_are_described() {
        let library = FragmentLibrary::builtin().unwrap();
        let lines = describe(&library).unwrap();

        assert_eq!(lines.len(), library.len());
        let ester = lines.iter().find(|line| line.starts_with("ester")).unwrap();
        assert!(ester.ends_with("ports: port[0], port[1]"));
        let ch2 = lines.iter().find(|line| line.starts_with("ch2")).unwrap();
        assert!(ch2.ends_with("ports: up, down"));
    }
}
