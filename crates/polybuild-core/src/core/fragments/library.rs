use super::DEFAULT_SENTINEL;
use super::template::{FragmentTemplate, TemplateLoadError};
use crate::core::models::compound::Compound;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const BUILTIN_FRAGMENTS: &str = include_str!("../../../data/fragments.toml");
const BUILTIN_ORIGIN: &str = "<builtin>";

/// A named collection of fragment templates plus the sentinel atom name that
/// marks cut points in them.
#[derive(Debug, Clone)]
pub struct FragmentLibrary {
    templates: BTreeMap<String, FragmentTemplate>,
    sentinel: String,
}

impl FragmentLibrary {
    /// The library compiled into the crate.
    pub fn builtin() -> Result<Self, TemplateLoadError> {
        Self::from_toml_str(BUILTIN_FRAGMENTS, BUILTIN_ORIGIN)
    }

    /// Loads a library from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `TemplateLoadError::Io` if the file cannot be read,
    /// `TemplateLoadError::Toml` if it is not a valid template document, and
    /// `TemplateLoadError::InvalidTemplate` if any template is inconsistent.
    pub fn load(path: &Path) -> Result<Self, TemplateLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Parses a library document. `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, TemplateLoadError> {
        let templates: BTreeMap<String, FragmentTemplate> =
            toml::from_str(content).map_err(|e| TemplateLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;

        for (name, template) in &templates {
            template.build(name)?;
        }
        debug!("Loaded {} fragment templates from {}", templates.len(), origin);

        Ok(Self {
            templates,
            sentinel: DEFAULT_SENTINEL.to_string(),
        })
    }

    pub fn with_sentinel(mut self, sentinel: &str) -> Self {
        self.sentinel = sentinel.to_string();
        self
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Adds every template of `other`, replacing same-named ones.
    pub fn merge(&mut self, other: FragmentLibrary) {
        for (name, template) in other.templates {
            if self.templates.insert(name.clone(), template).is_some() {
                debug!("Fragment '{}' shadowed by merged library", name);
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn template(&self, name: &str) -> Option<&FragmentTemplate> {
        self.templates.get(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Builds the named fragment, translated so that its first atom sits at
    /// the origin. Cut atoms are still present in the result.
    pub fn instantiate(&self, name: &str) -> Result<Compound, TemplateLoadError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateLoadError::UnknownFragment(name.to_string()))?;
        let mut compound = template.build(name)?;
        compound.center_on_first_atom();
        Ok(compound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CUSTOM_LIBRARY: &str = r#"
[ch2]
atoms = [{ name = "C", position = [5.0, 5.0, 5.0] }]

[methanol]
atoms = [
    { name = "C", position = [1.0, 0.0, 0.0] },
    { name = "O", position = [2.43, 0.0, 0.0] },
]
bonds = [[0, 1]]
"#;

    #[test]
    fn builtin_library_contains_every_core_fragment() {
        let library = FragmentLibrary::builtin().unwrap();
        let names: Vec<_> = library.names().collect();
        for expected in [
            "amide",
            "ammonium",
            "c_quaternary",
            "ch2",
            "ester",
            "hydrogen",
            "phenyl",
            "sulfonate",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert_eq!(library.sentinel(), DEFAULT_SENTINEL);
    }

    #[test]
    fn instantiate_centers_on_first_atom() {
        let library = FragmentLibrary::builtin().unwrap();
        let phenyl = library.instantiate("phenyl").unwrap();

        let (_, first) = phenyl.atoms()[0];
        assert!(first.position.coords.norm() < 1e-12);
        assert_eq!(phenyl.atom_count(), 12);
    }

    #[test]
    fn instantiate_unknown_fragment_fails() {
        let library = FragmentLibrary::builtin().unwrap();
        assert!(matches!(
            library.instantiate("unobtainium"),
            Err(TemplateLoadError::UnknownFragment(name)) if name == "unobtainium"
        ));
    }

    #[test]
    fn loads_library_from_file_and_merges_over_builtin() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", CUSTOM_LIBRARY).unwrap();
        let custom = FragmentLibrary::load(file.path()).unwrap();
        assert_eq!(custom.len(), 2);

        let mut library = FragmentLibrary::builtin().unwrap();
        let builtin_count = library.len();
        library.merge(custom);

        assert_eq!(library.len(), builtin_count + 1);
        assert_eq!(library.template("ch2").unwrap().atoms.len(), 1);
        assert!(library.template("methanol").is_some());
    }

    #[test]
    fn load_reports_missing_file() {
        let result = FragmentLibrary::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(TemplateLoadError::Io { .. })));
    }

    #[test]
    fn load_reports_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[ch2\natoms = ").unwrap();
        let result = FragmentLibrary::load(file.path());
        assert!(matches!(result, Err(TemplateLoadError::Toml { .. })));
    }

    #[test]
    fn load_rejects_inconsistent_template() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "[bad]\natoms = [{{ name = \"C\", position = [0.0, 0.0, 0.0] }}]\nbonds = [[0, 1]]\n"
        )
        .unwrap();
        let result = FragmentLibrary::load(file.path());
        assert!(matches!(
            result,
            Err(TemplateLoadError::InvalidTemplate { fragment, .. }) if fragment == "bad"
        ));
    }

    #[test]
    fn custom_sentinel_is_kept() {
        let library = FragmentLibrary::builtin().unwrap().with_sentinel("X");
        assert_eq!(library.sentinel(), "X");
    }
}
