use crate::core::models::compound::Compound;
use thiserror::Error;

/// The largest number of substituents an ammonium centre accepts.
pub const MAX_AMMONIUM_SUBSTITUENTS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error(
        "{provided} substituents were given for {requested} requested slots; provide exactly 1 or {requested}"
    )]
    SubstituentCount { requested: usize, provided: usize },

    #[error("The number of substituents is zero but {provided} substituent(s) were given")]
    SubstituentsWithoutCount { provided: usize },

    #[error("{requested} substituents were requested but only {available} positions exist")]
    TooManySubstituents { requested: usize, available: usize },

    #[error("Fragment '{fragment}' has ports {candidates:?}; name the one to bond through")]
    AmbiguousPort {
        fragment: String,
        candidates: Vec<String>,
    },

    #[error("Fragment '{fragment}' has no free port to bond through")]
    NoFreePort { fragment: String },

    #[error("Port '{port}' is not one of the ports {candidates:?} of fragment '{fragment}'")]
    UnknownPort {
        fragment: String,
        port: String,
        candidates: Vec<String>,
    },

    #[error("The port list has {provided} entries but {expected} custom fragments were given")]
    PortListLength { expected: usize, provided: usize },

    #[error("'{element}' is not a supported monatomic ion")]
    UnknownElement { element: String },
}

/// A fragment to be bonded into a composite, and optionally the label of the
/// port it should bond through.
#[derive(Debug, Clone)]
pub struct Substituent {
    pub compound: Compound,
    pub port: Option<String>,
}

impl Substituent {
    pub fn new(compound: Compound) -> Self {
        Self {
            compound,
            port: None,
        }
    }

    pub fn with_port(mut self, port: &str) -> Self {
        self.port = Some(port.to_string());
        self
    }
}

/// Options shared by the vinyl backbone monomers.
#[derive(Debug, Clone)]
pub struct VinylOptions {
    /// Group bonded to the open branch position instead of a cap.
    pub functional_group: Option<Substituent>,
    /// Cap the open branch position with hydrogen when no group is given.
    pub cap_branch: bool,
    /// Cap the ternary backbone carbon instead of exposing `up`.
    pub cap_ternary: bool,
    /// Cap the secondary backbone carbon instead of exposing `down`.
    pub cap_primary: bool,
    /// Swap the branch and the filler between the two chiral positions.
    pub chiral_switch: bool,
}

impl Default for VinylOptions {
    fn default() -> Self {
        Self {
            functional_group: None,
            cap_branch: true,
            cap_ternary: false,
            cap_primary: false,
            chiral_switch: false,
        }
    }
}

impl VinylOptions {
    pub fn builder() -> VinylOptionsBuilder {
        VinylOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(Substituent {
            port: Some(port), ..
        }) = &self.functional_group
        {
            if port.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter: "port_name",
                    reason: "port name must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct VinylOptionsBuilder {
    functional_group: Option<Substituent>,
    cap_branch: Option<bool>,
    cap_ternary: Option<bool>,
    cap_primary: Option<bool>,
    chiral_switch: Option<bool>,
}

impl VinylOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn functional_group(mut self, group: Substituent) -> Self {
        self.functional_group = Some(group);
        self
    }
    pub fn cap_branch(mut self, cap: bool) -> Self {
        self.cap_branch = Some(cap);
        self
    }
    pub fn cap_ternary(mut self, cap: bool) -> Self {
        self.cap_ternary = Some(cap);
        self
    }
    pub fn cap_primary(mut self, cap: bool) -> Self {
        self.cap_primary = Some(cap);
        self
    }
    pub fn chiral_switch(mut self, switch: bool) -> Self {
        self.chiral_switch = Some(switch);
        self
    }

    pub fn build(self) -> Result<VinylOptions, ConfigError> {
        let defaults = VinylOptions::default();
        let options = VinylOptions {
            functional_group: self.functional_group,
            cap_branch: self.cap_branch.unwrap_or(defaults.cap_branch),
            cap_ternary: self.cap_ternary.unwrap_or(defaults.cap_ternary),
            cap_primary: self.cap_primary.unwrap_or(defaults.cap_primary),
            chiral_switch: self.chiral_switch.unwrap_or(defaults.chiral_switch),
        };
        options.validate()?;
        Ok(options)
    }
}

/// Where the substituents of an ammonium centre come from.
#[derive(Debug, Clone, Default)]
pub enum SubstituentSource {
    #[default]
    None,
    /// Alkyl chains of the given lengths. A single length is used for every slot.
    Alkane(Vec<usize>),
    /// Arbitrary fragments. A single fragment is cloned into every slot.
    /// `ports`, when given, must have one entry per fragment.
    Custom {
        fragments: Vec<Compound>,
        ports: Option<Vec<Option<String>>>,
    },
}

impl SubstituentSource {
    /// Number of substituents the caller actually supplied.
    pub fn provided(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Alkane(lengths) => lengths.len(),
            Self::Custom { fragments, .. } => fragments.len(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AmmoniumOptions {
    pub substituents: usize,
    pub source: SubstituentSource,
}

impl AmmoniumOptions {
    pub fn builder() -> AmmoniumOptionsBuilder {
        AmmoniumOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.substituents > MAX_AMMONIUM_SUBSTITUENTS {
            return Err(ConfigError::TooManySubstituents {
                requested: self.substituents,
                available: MAX_AMMONIUM_SUBSTITUENTS,
            });
        }
        if let SubstituentSource::Alkane(lengths) = &self.source {
            if lengths.contains(&0) {
                return Err(ConfigError::InvalidParameter {
                    parameter: "alkane",
                    reason: "chain lengths must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct AmmoniumOptionsBuilder {
    substituents: Option<usize>,
    source: SubstituentSource,
}

impl AmmoniumOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn substituents(mut self, n: usize) -> Self {
        self.substituents = Some(n);
        self
    }
    pub fn alkane(mut self, lengths: Vec<usize>) -> Self {
        self.source = SubstituentSource::Alkane(lengths);
        self
    }
    pub fn custom(mut self, fragments: Vec<Compound>, ports: Option<Vec<Option<String>>>) -> Self {
        self.source = SubstituentSource::Custom { fragments, ports };
        self
    }

    pub fn build(self) -> Result<AmmoniumOptions, ConfigError> {
        let options = AmmoniumOptions {
            substituents: self.substituents.unwrap_or(0),
            source: self.source,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Options of the zwitterionic monomers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZwitterionOptions {
    /// CH2 units between the backbone branch and the ammonium.
    pub spacer_backbone: usize,
    /// CH2 units between the ammonium and the anion.
    pub spacer_ion: usize,
    pub switch_backbone_chiral: bool,
}

impl Default for ZwitterionOptions {
    fn default() -> Self {
        Self {
            spacer_backbone: 2,
            spacer_ion: 2,
            switch_backbone_chiral: false,
        }
    }
}

impl ZwitterionOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (parameter, value) in [
            ("spacer_backbone", self.spacer_backbone),
            ("spacer_ion", self.spacer_ion),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidParameter {
                    parameter,
                    reason: "spacer length must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Options of the coarse-grained betaine monomer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetaineOptions {
    /// Beads in the backbone chain.
    pub backbone_length: usize,
    /// Beads between the backbone and the cation, including the polar bead.
    pub spacer_backbone: usize,
    /// Beads between the cation and the anion.
    pub spacer_ion: usize,
    pub polar_backbone: bool,
    /// Drop the `down` port to make a chain-terminating monomer.
    pub cap_group: bool,
}

impl Default for BetaineOptions {
    fn default() -> Self {
        Self {
            backbone_length: 1,
            spacer_backbone: 2,
            spacer_ion: 1,
            polar_backbone: false,
            cap_group: false,
        }
    }
}

impl BetaineOptions {
    pub fn builder() -> BetaineOptionsBuilder {
        BetaineOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backbone_length == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "backbone_length",
                reason: "a betaine needs at least one backbone bead".to_string(),
            });
        }
        if self.polar_backbone && self.spacer_backbone == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "polar_backbone",
                reason: "a polar pendant bead cannot be added with a backbone spacer of zero"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct BetaineOptionsBuilder {
    backbone_length: Option<usize>,
    spacer_backbone: Option<usize>,
    spacer_ion: Option<usize>,
    polar_backbone: Option<bool>,
    cap_group: Option<bool>,
}

impl BetaineOptionsBuilder {
    pub fn backbone_length(mut self, n: usize) -> Self {
        self.backbone_length = Some(n);
        self
    }
    pub fn spacer_backbone(mut self, n: usize) -> Self {
        self.spacer_backbone = Some(n);
        self
    }
    pub fn spacer_ion(mut self, n: usize) -> Self {
        self.spacer_ion = Some(n);
        self
    }
    pub fn polar_backbone(mut self, polar: bool) -> Self {
        self.polar_backbone = Some(polar);
        self
    }
    pub fn cap_group(mut self, cap: bool) -> Self {
        self.cap_group = Some(cap);
        self
    }

    pub fn build(self) -> Result<BetaineOptions, ConfigError> {
        let defaults = BetaineOptions::default();
        let options = BetaineOptions {
            backbone_length: self.backbone_length.unwrap_or(defaults.backbone_length),
            spacer_backbone: self.spacer_backbone.unwrap_or(defaults.spacer_backbone),
            spacer_ion: self.spacer_ion.unwrap_or(defaults.spacer_ion),
            polar_backbone: self.polar_backbone.unwrap_or(defaults.polar_backbone),
            cap_group: self.cap_group.unwrap_or(defaults.cap_group),
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vinyl_builder_applies_defaults_and_overrides() {
        let options = VinylOptions::builder()
            .cap_ternary(true)
            .chiral_switch(true)
            .build()
            .unwrap();

        assert!(options.cap_branch);
        assert!(options.cap_ternary);
        assert!(!options.cap_primary);
        assert!(options.chiral_switch);
        assert!(options.functional_group.is_none());
    }

    #[test]
    fn vinyl_builder_rejects_blank_port_name() {
        let group = Substituent::new(Compound::new("R")).with_port("  ");
        let result = VinylOptions::builder().functional_group(group).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "port_name",
                ..
            })
        ));
    }

    #[test]
    fn ammonium_builder_limits_substituents() {
        let result = AmmoniumOptions::builder().substituents(5).build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::TooManySubstituents {
                requested: 5,
                available: 4
            }
        );
    }

    #[test]
    fn ammonium_builder_rejects_zero_length_chain() {
        let result = AmmoniumOptions::builder()
            .substituents(2)
            .alkane(vec![1, 0])
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "alkane",
                ..
            })
        ));
    }

    #[test]
    fn substituent_source_counts_supplied_entries() {
        assert_eq!(SubstituentSource::None.provided(), 0);
        assert_eq!(SubstituentSource::Alkane(vec![1, 2, 3]).provided(), 3);
        let custom = SubstituentSource::Custom {
            fragments: vec![Compound::new("R")],
            ports: None,
        };
        assert_eq!(custom.provided(), 1);
    }

    #[test]
    fn zwitterion_spacers_must_be_positive() {
        assert!(ZwitterionOptions::default().validate().is_ok());
        let options = ZwitterionOptions {
            spacer_ion: 0,
            ..ZwitterionOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidParameter {
                parameter: "spacer_ion",
                ..
            })
        ));
    }

    #[test]
    fn betaine_builder_validates_polar_spacer_combination() {
        let result = BetaineOptions::builder()
            .polar_backbone(true)
            .spacer_backbone(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "polar_backbone",
                ..
            })
        ));

        let result = BetaineOptions::builder().backbone_length(0).build();
        assert!(result.is_err());

        let options = BetaineOptions::builder()
            .backbone_length(3)
            .polar_backbone(true)
            .build()
            .unwrap();
        assert_eq!(options.spacer_backbone, 2);
        assert_eq!(options.spacer_ion, 1);
    }
}
