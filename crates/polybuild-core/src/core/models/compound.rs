use super::atom::Atom;
use super::error::GraphError;
use super::ids::NodeId;
use super::labels::{LabelRegistry, LabelSpec, LabelTarget};
use super::node::{Group, Node, NodeKind};
use super::port::Port;
use super::topology::{Bond, BondOrder};
use nalgebra::{Isometry3, Vector3};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const PORT_LABEL_BASE: &str = "port";

/// A hierarchical molecular graph: atoms, ports and nested groups stored in a
/// single arena, plus the bonds between atoms.
///
/// Every node is addressed by a stable [`NodeId`]. Handles stay valid until the
/// node they name is removed, so callers can capture them before a sequence of
/// edits and keep using them while labels are renumbered underneath.
#[derive(Debug, Clone)]
pub struct Compound {
    /// Primary storage for every node of the tree.
    nodes: SlotMap<NodeId, Node>,
    /// The top-level group that owns the whole tree.
    root: NodeId,
    /// List of all bonds in the compound.
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<NodeId, Vec<NodeId>>,
}

impl Compound {
    /// Creates an empty compound whose root group is called `name`.
    pub fn new(name: &str) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            kind: NodeKind::Group(Group::new(name)),
            parent: None,
            label: LabelSpec::fixed(name),
        });
        Self {
            nodes,
            root,
            bonds: Vec::new(),
            bond_adjacency: SecondaryMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self) -> &str {
        self.group(self.root).map(|g| g.name.as_str()).unwrap_or_default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the node exists and is an atom, otherwise `None`.
    pub fn atom(&self, id: NodeId) -> Option<&Atom> {
        self.nodes.get(id)?.as_atom()
    }

    pub fn atom_mut(&mut self, id: NodeId) -> Option<&mut Atom> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn port(&self, id: NodeId) -> Option<&Port> {
        self.nodes.get(id)?.as_port()
    }

    pub fn group(&self, id: NodeId) -> Option<&Group> {
        self.nodes.get(id)?.as_group()
    }

    /// Returns a slice of all bonds in the compound.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Retrieves the bonded neighbors of an atom.
    ///
    /// # Return
    ///
    /// Returns `Some(&[NodeId])` if the atom exists, otherwise `None`.
    pub fn bonded_neighbors(&self, atom_id: NodeId) -> Option<&[NodeId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Adds an atom to a group.
    ///
    /// Without an explicit label the atom joins the indexed sequence named
    /// after it (`C[0]`, `C[1]`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not a group of this compound or the
    /// label is already taken.
    pub fn add_atom(
        &mut self,
        parent: NodeId,
        atom: Atom,
        label: Option<LabelSpec>,
    ) -> Result<NodeId, GraphError> {
        let label = label.unwrap_or_else(|| LabelSpec::indexed(atom.name.clone()));
        let id = self.insert_child(parent, NodeKind::Atom(atom), label)?;
        self.bond_adjacency.insert(id, Vec::new());
        Ok(id)
    }

    /// Adds a port to a group. Unlabelled ports join the `port[i]` sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidAnchor`] if the port's anchor is not an atom
    /// of this compound.
    pub fn add_port(
        &mut self,
        parent: NodeId,
        port: Port,
        label: Option<LabelSpec>,
    ) -> Result<NodeId, GraphError> {
        if self.atom(port.anchor).is_none() {
            return Err(GraphError::InvalidAnchor {
                anchor: port.anchor,
            });
        }
        let label = label.unwrap_or_else(|| LabelSpec::indexed(PORT_LABEL_BASE));
        self.insert_child(parent, NodeKind::Port(port), label)
    }

    /// Adds an empty nested group.
    pub fn add_group(
        &mut self,
        parent: NodeId,
        name: &str,
        label: Option<LabelSpec>,
    ) -> Result<NodeId, GraphError> {
        let label = label.unwrap_or_else(|| LabelSpec::indexed(name));
        self.insert_child(parent, NodeKind::Group(Group::new(name)), label)
    }

    /// Adds a bond between two atoms.
    ///
    /// This method is idempotent; adding an existing bond succeeds without
    /// creating a duplicate.
    pub fn add_bond(
        &mut self,
        atom1_id: NodeId,
        atom2_id: NodeId,
        order: BondOrder,
    ) -> Result<(), GraphError> {
        for id in [atom1_id, atom2_id] {
            self.expect_atom(id)?;
        }

        if self.bond_adjacency[atom1_id].contains(&atom2_id) {
            return Ok(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Ok(())
    }

    /// Removes the bond between two atoms, returning it if it existed.
    pub fn remove_bond(&mut self, atom1_id: NodeId, atom2_id: NodeId) -> Option<Bond> {
        let position = self
            .bonds
            .iter()
            .position(|bond| bond.connects(atom1_id, atom2_id))?;
        let bond = self.bonds.remove(position);

        if let Some(adjacency) = self.bond_adjacency.get_mut(atom1_id) {
            adjacency.retain(|&id| id != atom2_id);
        }
        if let Some(adjacency) = self.bond_adjacency.get_mut(atom2_id) {
            adjacency.retain(|&id| id != atom1_id);
        }
        Some(bond)
    }

    /// Moves another compound into this one as a child group of `parent`.
    ///
    /// The other compound's root becomes a group labelled `label` (or indexed by
    /// its name). Every handle of `other` is invalidated; the returned ID names
    /// the new group.
    pub fn add(
        &mut self,
        parent: NodeId,
        other: Compound,
        label: Option<LabelSpec>,
    ) -> Result<NodeId, GraphError> {
        self.graft(parent, other, label).map(|(id, _)| id)
    }

    pub(crate) fn graft(
        &mut self,
        parent: NodeId,
        other: Compound,
        label: Option<LabelSpec>,
    ) -> Result<(NodeId, HashMap<NodeId, NodeId>), GraphError> {
        let label = label.unwrap_or_else(|| LabelSpec::indexed(other.name()));
        self.check_label_free(parent, &label)?;

        let order = other.descendants(other.root);
        let Compound {
            mut nodes,
            root: other_root,
            bonds,
            ..
        } = other;

        let mut map = HashMap::with_capacity(order.len());
        let mut moved = Vec::with_capacity(order.len());
        for old_id in order {
            if let Some(node) = nodes.remove(old_id) {
                let new_id = self.nodes.insert(node);
                map.insert(old_id, new_id);
                moved.push(new_id);
            }
        }

        for &new_id in &moved {
            let node = &mut self.nodes[new_id];
            node.parent = node.parent.and_then(|p| map.get(&p).copied());
            match &mut node.kind {
                NodeKind::Atom(_) => {
                    self.bond_adjacency.insert(new_id, Vec::new());
                }
                NodeKind::Port(port) => {
                    if let Some(&anchor) = map.get(&port.anchor) {
                        port.anchor = anchor;
                    }
                }
                NodeKind::Group(group) => {
                    for child in &mut group.children {
                        if let Some(&new_child) = map.get(child) {
                            *child = new_child;
                        }
                    }
                    group.labels.remap(&map);
                }
            }
        }

        for bond in bonds {
            if let (Some(&a), Some(&b)) = (map.get(&bond.atom1_id), map.get(&bond.atom2_id)) {
                self.bonds.push(Bond::new(a, b, bond.order));
                self.bond_adjacency[a].push(b);
                self.bond_adjacency[b].push(a);
            }
        }

        let new_root = *map
            .get(&other_root)
            .ok_or(GraphError::NodeNotFound { id: other_root })?;
        let node = &mut self.nodes[new_root];
        node.parent = Some(parent);
        node.label = label;
        self.group_mut(parent)?.children.push(new_root);
        self.refresh_labels(parent);

        Ok((new_root, map))
    }

    /// Removes a node and its whole subtree.
    ///
    /// Bonds touching removed atoms are destroyed, as are ports anchored on
    /// them anywhere in the compound. The label registries of every affected
    /// group and its ancestors are rebuilt afterwards.
    pub fn remove(&mut self, id: NodeId) -> Result<(), GraphError> {
        if id == self.root {
            return Err(GraphError::RootRemoval);
        }
        let parent = self
            .nodes
            .get(id)
            .ok_or(GraphError::NodeNotFound { id })?
            .parent
            .ok_or(GraphError::NodeNotFound { id })?;

        let subtree = self.descendants(id);
        let subtree_set: HashSet<NodeId> = subtree.iter().copied().collect();
        let removed_atoms: HashSet<NodeId> = subtree
            .iter()
            .copied()
            .filter(|&n| self.atom(n).is_some())
            .collect();

        // Ports outside the subtree that would be left without an anchor.
        let orphaned_ports: Vec<NodeId> = self
            .nodes
            .iter()
            .filter_map(|(n, node)| match &node.kind {
                NodeKind::Port(port)
                    if removed_atoms.contains(&port.anchor) && !subtree_set.contains(&n) =>
                {
                    Some(n)
                }
                _ => None,
            })
            .collect();

        let mut touched_groups = vec![parent];
        for port_id in orphaned_ports {
            if let Some(port_parent) = self.detach(port_id) {
                touched_groups.push(port_parent);
            }
            self.nodes.remove(port_id);
        }

        self.detach(id);
        for n in subtree {
            self.nodes.remove(n);
        }

        if !removed_atoms.is_empty() {
            self.bonds.retain(|bond| {
                !removed_atoms.contains(&bond.atom1_id) && !removed_atoms.contains(&bond.atom2_id)
            });
            for atom_id in &removed_atoms {
                if let Some(neighbors) = self.bond_adjacency.remove(*atom_id) {
                    for neighbor_id in neighbors {
                        if let Some(adjacency) = self.bond_adjacency.get_mut(neighbor_id) {
                            adjacency.retain(|n| n != atom_id);
                        }
                    }
                }
            }
        }

        for group in touched_groups {
            self.refresh_lineage(group);
        }
        Ok(())
    }

    pub fn labels(&self, group: NodeId) -> Option<&LabelRegistry> {
        self.group(group).map(|g| &g.labels)
    }

    /// Resolves a single-node label in the root namespace.
    pub fn get(&self, label: &str) -> Option<NodeId> {
        self.get_in(self.root, label)
    }

    /// Resolves a single-node label in the namespace of `group`.
    pub fn get_in(&self, group: NodeId, label: &str) -> Option<NodeId> {
        self.group(group)?.labels.node(label)
    }

    pub fn lookup(&self, label: &str) -> Result<NodeId, GraphError> {
        self.lookup_in(self.root, label)
    }

    pub fn lookup_in(&self, group: NodeId, label: &str) -> Result<NodeId, GraphError> {
        self.get_in(group, label)
            .ok_or_else(|| GraphError::LabelNotFound {
                label: label.to_string(),
            })
    }

    /// Resolves a label path from the root, descending through nested groups
    /// (e.g. `["quaternary C", "port[3]"]`).
    pub fn resolve(&self, path: &[&str]) -> Result<NodeId, GraphError> {
        let mut current = self.root;
        for (depth, segment) in path.iter().enumerate() {
            current = self
                .get_in(current, segment)
                .ok_or_else(|| GraphError::LabelNotFound {
                    label: path[..=depth].join("/"),
                })?;
        }
        Ok(current)
    }

    /// The label under which `id` is registered in its parent's namespace.
    pub fn label_of(&self, id: NodeId) -> Option<&str> {
        let parent = self.nodes.get(id)?.parent?;
        self.labels(parent)?.label_of(id)
    }

    /// Registers `target` under `label` in the namespace of `group` without
    /// moving it. Ownership stays with the group that contains `target`; the
    /// alias disappears when `target` is removed.
    pub fn hoist(&mut self, group: NodeId, target: NodeId, label: &str) -> Result<(), GraphError> {
        if !self.contains(target) {
            return Err(GraphError::NodeNotFound { id: target });
        }
        if target == group || !self.is_descendant(target, group) {
            return Err(GraphError::NotDescendant { target, group });
        }
        self.check_label_free(group, &LabelSpec::fixed(label))?;

        self.group_mut(group)?.labels.push_alias(label, target);
        self.refresh_labels(group);
        Ok(())
    }

    /// The labelled ports of a group's namespace, in registry order. Hoisted
    /// aliases are included.
    pub fn ports_of(&self, group: NodeId) -> Vec<(String, NodeId)> {
        let Some(registry) = self.labels(group) else {
            return Vec::new();
        };
        registry
            .iter()
            .filter_map(|(name, target)| match target {
                LabelTarget::Node(id) if self.port(*id).is_some() => Some((name.to_string(), *id)),
                _ => None,
            })
            .collect()
    }

    /// Every node below (and including) `id` in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            if let NodeKind::Group(group) = &node.kind {
                stack.extend(group.children.iter().rev());
            }
        }
        out
    }

    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes.get(n).and_then(|node| node.parent);
        }
        false
    }

    /// Returns all atoms in traversal order.
    pub fn atoms(&self) -> Vec<(NodeId, &Atom)> {
        self.descendants(self.root)
            .into_iter()
            .filter_map(|id| self.atom(id).map(|atom| (id, atom)))
            .collect()
    }

    /// Returns every port that has not been consumed, in traversal order.
    pub fn ports(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.port(id).is_some())
            .collect()
    }

    pub fn atom_count(&self) -> usize {
        self.bond_adjacency.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn port_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| matches!(node.kind, NodeKind::Port(_)))
            .count()
    }

    /// Element (or bead name) counts of all atoms.
    pub fn composition(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes.values() {
            if let NodeKind::Atom(atom) = &node.kind {
                *counts.entry(atom.composition_key().to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn translate(&mut self, by: &Vector3<f64>) {
        let isometry = Isometry3::new(*by, Vector3::zeros());
        self.transform_subtree(self.root, &isometry);
    }

    /// Applies a rigid transform to every atom and port below `id`.
    pub fn transform_subtree(&mut self, id: NodeId, isometry: &Isometry3<f64>) {
        for n in self.descendants(id) {
            match &mut self.nodes[n].kind {
                NodeKind::Atom(atom) => atom.position = isometry * atom.position,
                NodeKind::Port(port) => port.transform(isometry),
                NodeKind::Group(_) => {}
            }
        }
    }

    /// Translates the compound so that its first atom sits at the origin.
    pub fn center_on_first_atom(&mut self) {
        if let Some(first) = self.atoms().first().map(|(_, atom)| atom.position) {
            self.translate(&(-first.coords));
        }
    }

    pub(crate) fn expect_atom(&self, id: NodeId) -> Result<&Atom, GraphError> {
        let node = self.nodes.get(id).ok_or(GraphError::NodeNotFound { id })?;
        node.as_atom().ok_or(GraphError::WrongKind {
            id,
            expected: "atom",
            found: node.kind.kind_name(),
        })
    }

    pub(crate) fn expect_port(&self, id: NodeId) -> Result<&Port, GraphError> {
        let node = self.nodes.get(id).ok_or(GraphError::MissingPort { id })?;
        node.as_port().ok_or(GraphError::WrongKind {
            id,
            expected: "port",
            found: node.kind.kind_name(),
        })
    }

    fn group_mut(&mut self, id: NodeId) -> Result<&mut Group, GraphError> {
        match self.nodes.get_mut(id) {
            Some(Node {
                kind: NodeKind::Group(group),
                ..
            }) => Ok(group),
            Some(node) => Err(GraphError::WrongKind {
                id,
                expected: "group",
                found: node.kind.kind_name(),
            }),
            None => Err(GraphError::NodeNotFound { id }),
        }
    }

    pub(crate) fn check_label_free(&self, group: NodeId, label: &LabelSpec) -> Result<(), GraphError> {
        let node = self.nodes.get(group).ok_or(GraphError::NodeNotFound { id: group })?;
        let group_data = node.as_group().ok_or(GraphError::WrongKind {
            id: group,
            expected: "group",
            found: node.kind.kind_name(),
        })?;
        if group_data.labels.would_collide(label) {
            return Err(GraphError::LabelExists {
                label: label.to_string(),
                group: group_data.name.clone(),
            });
        }
        Ok(())
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        label: LabelSpec,
    ) -> Result<NodeId, GraphError> {
        self.check_label_free(parent, &label)?;
        let id = self.nodes.insert(Node {
            kind,
            parent: Some(parent),
            label,
        });
        self.group_mut(parent)?.children.push(id);
        self.refresh_labels(parent);
        Ok(id)
    }

    /// Unlinks a node from its parent's child list, returning the parent.
    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(id)?.parent?;
        if let Ok(group) = self.group_mut(parent) {
            group.children.retain(|&child| child != id);
        }
        Some(parent)
    }

    fn refresh_labels(&mut self, group_id: NodeId) {
        let Ok(group) = self.group_mut(group_id) else {
            return;
        };
        let mut registry = std::mem::take(&mut group.labels);
        let children = group.children.clone();

        let nodes = &self.nodes;
        registry.rebuild(
            children
                .iter()
                .filter_map(|&child| nodes.get(child).map(|node| (child, &node.label))),
            |id| nodes.contains_key(id),
        );

        if let Ok(group) = self.group_mut(group_id) {
            group.labels = registry;
        }
    }

    fn refresh_lineage(&mut self, group_id: NodeId) {
        let mut current = Some(group_id);
        while let Some(id) = current {
            self.refresh_labels(id);
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
    }
}
