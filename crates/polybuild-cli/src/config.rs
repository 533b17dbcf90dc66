use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use polybuild::core::fragments::library::FragmentLibrary;
use polybuild::engine::config as core_config;
use polybuild::workflows::fragments;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A library fragment used as a substituent, optionally with the port to bond
/// through.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialFragment {
    fragment: String,
    port: Option<String>,
}

impl PartialFragment {
    fn resolve(&self, library: &FragmentLibrary) -> Result<core_config::Substituent> {
        let compound = fragments::fragment(library, &self.fragment)?;
        let substituent = core_config::Substituent::new(compound);
        Ok(match &self.port {
            Some(port) => substituent.with_port(port),
            None => substituent,
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialVinylConfig {
    functional_group: Option<PartialFragment>,
    cap_branch: Option<bool>,
    cap_ternary: Option<bool>,
    cap_primary: Option<bool>,
    chiral_switch: Option<bool>,
}

impl PartialVinylConfig {
    fn resolve(&self, library: &FragmentLibrary) -> Result<core_config::VinylOptions> {
        let mut builder = core_config::VinylOptions::builder();
        if let Some(group) = &self.functional_group {
            builder = builder.functional_group(group.resolve(library)?);
        }
        if let Some(cap) = self.cap_branch {
            builder = builder.cap_branch(cap);
        }
        if let Some(cap) = self.cap_ternary {
            builder = builder.cap_ternary(cap);
        }
        if let Some(cap) = self.cap_primary {
            builder = builder.cap_primary(cap);
        }
        if let Some(switch) = self.chiral_switch {
            builder = builder.chiral_switch(switch);
        }
        Ok(builder.build()?)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialAmmoniumConfig {
    substituents: Option<usize>,
    alkane: Option<Vec<usize>>,
    custom: Option<Vec<PartialFragment>>,
}

impl PartialAmmoniumConfig {
    fn resolve(&self, library: &FragmentLibrary) -> Result<core_config::AmmoniumOptions> {
        let mut builder =
            core_config::AmmoniumOptions::builder().substituents(self.substituents.unwrap_or(0));
        match (&self.alkane, &self.custom) {
            (Some(_), Some(_)) => {
                return Err(CliError::Config(
                    "An ammonium takes either 'alkane' or 'custom' substituents, not both."
                        .to_string(),
                ));
            }
            (Some(lengths), None) => builder = builder.alkane(lengths.clone()),
            (None, Some(custom)) => {
                let compounds = custom
                    .iter()
                    .map(|entry| fragments::fragment(library, &entry.fragment))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                let ports = custom
                    .iter()
                    .any(|entry| entry.port.is_some())
                    .then(|| custom.iter().map(|entry| entry.port.clone()).collect());
                builder = builder.custom(compounds, ports);
            }
            (None, None) => {}
        }
        Ok(builder.build()?)
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialZwitterionConfig {
    spacer_backbone: Option<usize>,
    spacer_ion: Option<usize>,
    switch_backbone_chiral: Option<bool>,
}

impl From<PartialZwitterionConfig> for core_config::ZwitterionOptions {
    fn from(p: PartialZwitterionConfig) -> Self {
        let defaults = Self::default();
        Self {
            spacer_backbone: p.spacer_backbone.unwrap_or(defaults.spacer_backbone),
            spacer_ion: p.spacer_ion.unwrap_or(defaults.spacer_ion),
            switch_backbone_chiral: p
                .switch_backbone_chiral
                .unwrap_or(defaults.switch_backbone_chiral),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialBetaineConfig {
    backbone_length: Option<usize>,
    spacer_backbone: Option<usize>,
    spacer_ion: Option<usize>,
    polar_backbone: Option<bool>,
    cap_group: Option<bool>,
}

impl PartialBetaineConfig {
    fn resolve(self) -> Result<core_config::BetaineOptions> {
        let mut builder = core_config::BetaineOptions::builder();
        if let Some(n) = self.backbone_length {
            builder = builder.backbone_length(n);
        }
        if let Some(n) = self.spacer_backbone {
            builder = builder.spacer_backbone(n);
        }
        if let Some(n) = self.spacer_ion {
            builder = builder.spacer_ion(n);
        }
        if let Some(polar) = self.polar_backbone {
            builder = builder.polar_backbone(polar);
        }
        if let Some(cap) = self.cap_group {
            builder = builder.cap_group(cap);
        }
        Ok(builder.build()?)
    }
}

/// The `[monomer]` table of a build file.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum PartialMonomer {
    Ethylene(PartialVinylConfig),
    Acrylamide(PartialVinylConfig),
    Methacrylate(PartialVinylConfig),
    Ammonium(PartialAmmoniumConfig),
    Cbma(PartialZwitterionConfig),
    Sbaa(PartialZwitterionConfig),
    Sbma(PartialZwitterionConfig),
    Alkane(PartialAlkaneConfig),
    Fragment(PartialFragmentConfig),
    Ion(PartialIonConfig),
    Bead(PartialBeadConfig),
    Betaine(PartialBetaineConfig),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialAlkaneConfig {
    n: usize,
    #[serde(default = "default_true")]
    cap_front: bool,
    #[serde(default = "default_true")]
    cap_end: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialFragmentConfig {
    name: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialIonConfig {
    element: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialBeadConfig {
    name: String,
    #[serde(default = "default_bead_ports")]
    ports: usize,
    bond_length: Option<f64>,
}

fn default_true() -> bool {
    true
}

fn default_bead_ports() -> usize {
    2
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialBuildConfig {
    library: Option<PathBuf>,
    sentinel: Option<String>,
    terminate: Option<bool>,
    monomer: PartialMonomer,
}

/// A build request with every option resolved against the fragment library.
#[derive(Debug)]
pub struct BuildRequest {
    pub library: FragmentLibrary,
    pub monomer: MonomerRequest,
    pub terminate: bool,
}

#[derive(Debug)]
pub enum MonomerRequest {
    Ethylene(core_config::VinylOptions),
    Acrylamide(core_config::VinylOptions),
    Methacrylate(core_config::VinylOptions),
    Ammonium(core_config::AmmoniumOptions),
    Cbma(core_config::ZwitterionOptions),
    Sbaa(core_config::ZwitterionOptions),
    Sbma(core_config::ZwitterionOptions),
    Alkane { n: usize, cap_front: bool, cap_end: bool },
    Fragment(String),
    Ion(String),
    Bead { name: String, ports: usize, bond_length: f64 },
    Betaine(core_config::BetaineOptions),
}

impl PartialBuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading build configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, path)
    }

    fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(self, args: &BuildArgs) -> Result<BuildRequest> {
        let mut library = FragmentLibrary::builtin()?;
        if let Some(path) = args.library.as_ref().or(self.library.as_ref()) {
            debug!("Merging fragment library from {:?}", path);
            library.merge(FragmentLibrary::load(path)?);
        }
        if let Some(sentinel) = &self.sentinel {
            if sentinel.trim().is_empty() {
                return Err(CliError::Config(
                    "The sentinel atom type must not be empty.".to_string(),
                ));
            }
            library = library.with_sentinel(sentinel);
        }

        let monomer = match self.monomer {
            PartialMonomer::Ethylene(p) => MonomerRequest::Ethylene(p.resolve(&library)?),
            PartialMonomer::Acrylamide(p) => MonomerRequest::Acrylamide(p.resolve(&library)?),
            PartialMonomer::Methacrylate(p) => MonomerRequest::Methacrylate(p.resolve(&library)?),
            PartialMonomer::Ammonium(p) => MonomerRequest::Ammonium(p.resolve(&library)?),
            PartialMonomer::Cbma(p) => MonomerRequest::Cbma(p.into()),
            PartialMonomer::Sbaa(p) => MonomerRequest::Sbaa(p.into()),
            PartialMonomer::Sbma(p) => MonomerRequest::Sbma(p.into()),
            PartialMonomer::Alkane(p) => MonomerRequest::Alkane {
                n: p.n,
                cap_front: p.cap_front,
                cap_end: p.cap_end,
            },
            PartialMonomer::Fragment(p) => MonomerRequest::Fragment(p.name),
            PartialMonomer::Ion(p) => MonomerRequest::Ion(p.element),
            PartialMonomer::Bead(p) => MonomerRequest::Bead {
                name: p.name,
                ports: p.ports,
                bond_length: p
                    .bond_length
                    .unwrap_or(polybuild::workflows::coarse::DEFAULT_BOND_LENGTH),
            },
            PartialMonomer::Betaine(p) => MonomerRequest::Betaine(p.resolve()?),
        };

        Ok(BuildRequest {
            library,
            monomer,
            terminate: args.terminate || self.terminate.unwrap_or(false),
        })
    }
}
