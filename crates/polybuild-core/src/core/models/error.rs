use super::ids::NodeId;
use thiserror::Error;

/// Failures of structural operations on a [`Compound`](super::compound::Compound).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {id:?} does not exist in this compound")]
    NodeNotFound { id: NodeId },

    #[error("Node {id:?} is a {found}, not a {expected}")]
    WrongKind {
        id: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Port {id:?} does not exist or has already been consumed")]
    MissingPort { id: NodeId },

    #[error("Anchor atom {anchor:?} of port {port:?} no longer exists")]
    AnchorMissing { port: NodeId, anchor: NodeId },

    #[error("Cannot add a port anchored on {anchor:?}: it is not an atom of this compound")]
    InvalidAnchor { anchor: NodeId },

    #[error("Label '{label}' cannot be resolved")]
    LabelNotFound { label: String },

    #[error("Label '{label}' already exists in group '{group}'")]
    LabelExists { label: String, group: String },

    #[error("Node {target:?} is not contained in group {group:?}")]
    NotDescendant { target: NodeId, group: NodeId },

    #[error("The root group of a compound cannot be removed")]
    RootRemoval,

    #[error("Port orientation is degenerate (zero length)")]
    DegenerateOrientation,
}
