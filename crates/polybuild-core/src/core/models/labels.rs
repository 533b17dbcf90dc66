use super::ids::NodeId;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// How a node asks to be named inside its parent group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LabelSpec {
    /// The node is registered under exactly this name.
    Fixed(String),
    /// The node joins the sequence `base`, and is also reachable as `base[i]`
    /// where `i` is its position among same-based siblings.
    Indexed(String),
}

impl LabelSpec {
    pub fn fixed(name: impl Into<String>) -> Self {
        Self::Fixed(name.into())
    }

    pub fn indexed(base: impl Into<String>) -> Self {
        Self::Indexed(base.into())
    }

    pub fn base(&self) -> &str {
        match self {
            Self::Fixed(name) | Self::Indexed(name) => name,
        }
    }
}

impl From<&str> for LabelSpec {
    fn from(name: &str) -> Self {
        Self::Fixed(name.to_string())
    }
}

impl From<String> for LabelSpec {
    fn from(name: String) -> Self {
        Self::Fixed(name)
    }
}

impl fmt::Display for LabelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(name) => write!(f, "{}", name),
            Self::Indexed(base) => write!(f, "{}[$]", base),
        }
    }
}

/// What a label resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTarget {
    Node(NodeId),
    Sequence(Vec<NodeId>),
}

/// The namespace of one group.
///
/// Entries are never patched in place: they are derived from the group's
/// children (in insertion order) and its alias list every time the group's
/// structure changes, so indexed names always stay contiguous.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    entries: Vec<(String, LabelTarget)>,
    index: HashMap<String, usize>,
    aliases: Vec<(String, NodeId)>,
}

impl LabelRegistry {
    pub fn get(&self, label: &str) -> Option<&LabelTarget> {
        self.index.get(label).map(|&i| &self.entries[i].1)
    }

    /// Resolves a label that names a single node.
    pub fn node(&self, label: &str) -> Option<NodeId> {
        match self.get(label)? {
            LabelTarget::Node(id) => Some(*id),
            LabelTarget::Sequence(_) => None,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelTarget)> {
        self.entries.iter().map(|(name, target)| (name.as_str(), target))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self) -> &[(String, NodeId)] {
        &self.aliases
    }

    /// The first single-node label bound to `id`.
    pub fn label_of(&self, id: NodeId) -> Option<&str> {
        self.entries.iter().find_map(|(name, target)| match target {
            LabelTarget::Node(node) if *node == id => Some(name.as_str()),
            _ => None,
        })
    }

    /// Whether adding one more child with `spec` would clash with an existing
    /// name.
    pub(crate) fn would_collide(&self, spec: &LabelSpec) -> bool {
        match spec {
            LabelSpec::Fixed(name) => self.contains(name),
            LabelSpec::Indexed(base) => match self.get(base) {
                Some(LabelTarget::Node(_)) => true,
                Some(LabelTarget::Sequence(seq)) => {
                    self.contains(&indexed_name(base, seq.len()))
                }
                None => self.contains(&indexed_name(base, 0)),
            },
        }
    }

    pub(crate) fn push_alias(&mut self, label: &str, target: NodeId) {
        self.aliases.push((label.to_string(), target));
    }

    pub(crate) fn rebuild<'a, I, F>(&mut self, children: I, is_alive: F)
    where
        I: IntoIterator<Item = (NodeId, &'a LabelSpec)>,
        F: Fn(NodeId) -> bool,
    {
        self.entries.clear();
        self.index.clear();

        for (id, spec) in children {
            match spec {
                LabelSpec::Fixed(name) => {
                    if !self.insert(name.clone(), LabelTarget::Node(id)) {
                        warn!("Duplicate label '{}' skipped during rebuild", name);
                    }
                }
                LabelSpec::Indexed(base) => {
                    let position = match self.index.get(base.as_str()) {
                        Some(&i) => i,
                        None => {
                            self.insert(base.clone(), LabelTarget::Sequence(Vec::new()));
                            self.entries.len() - 1
                        }
                    };
                    let count = match &mut self.entries[position].1 {
                        LabelTarget::Sequence(seq) => {
                            seq.push(id);
                            seq.len() - 1
                        }
                        LabelTarget::Node(_) => {
                            warn!("Label '{}' is not a sequence; indexed child skipped", base);
                            continue;
                        }
                    };
                    self.insert(indexed_name(base, count), LabelTarget::Node(id));
                }
            }
        }

        self.aliases.retain(|(_, target)| is_alive(*target));
        for (name, target) in self.aliases.clone() {
            if !self.insert(name.clone(), LabelTarget::Node(target)) {
                warn!("Alias '{}' shadowed by a child label; skipped", name);
            }
        }
    }

    pub(crate) fn remap(&mut self, map: &HashMap<NodeId, NodeId>) {
        let lookup = |id: &mut NodeId| {
            if let Some(new) = map.get(id) {
                *id = *new;
            }
        };
        for (_, target) in &mut self.entries {
            match target {
                LabelTarget::Node(id) => lookup(id),
                LabelTarget::Sequence(ids) => ids.iter_mut().for_each(lookup),
            }
        }
        for (_, target) in &mut self.aliases {
            lookup(target);
        }
    }

    fn insert(&mut self, name: String, target: LabelTarget) -> bool {
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, target));
        true
    }
}

pub fn indexed_name(base: &str, index: usize) -> String {
    format!("{}[{}]", base, index)
}
