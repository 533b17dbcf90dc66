use super::atom::Atom;
use super::ids::NodeId;
use super::labels::{LabelRegistry, LabelSpec};
use super::port::Port;

/// A nested sub-compound: a named, ordered set of children with its own
/// label namespace.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub name: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) labels: LabelRegistry,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Atom(Atom),
    Port(Port),
    Group(Group),
}

impl NodeKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Atom(_) => "atom",
            Self::Port(_) => "port",
            Self::Group(_) => "group",
        }
    }
}

/// An entry of a compound's arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) label: LabelSpec,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn label_spec(&self) -> &LabelSpec {
        &self.label
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match &self.kind {
            NodeKind::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_port(&self) -> Option<&Port> {
        match &self.kind {
            NodeKind::Port(port) => Some(port),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }
}
