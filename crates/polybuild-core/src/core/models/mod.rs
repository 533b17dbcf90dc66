//! # Core Models Module
//!
//! This module contains the data structures used to represent hierarchical
//! molecular graphs: atoms, bonds, oriented ports and nested groups.
//!
//! ## Overview
//!
//! Every molecule is a [`compound::Compound`]: a single arena of nodes addressed
//! by stable [`ids::NodeId`] handles. A node is an atom, a port, or a group;
//! groups own their children and carry their own label namespace. These models
//! are designed to:
//!
//! - **Keep handles stable** - A handle stays valid until the node it names is removed
//! - **Keep labels consistent** - Namespaces are rebuilt after every structural edit
//! - **Make ports explicit** - Attachment points are a node variant, never inferred
//!
//! ## Key Components
//!
//! - [`atom`] - Particles with name, element and coordinates
//! - [`port`] - Oriented attachment points anchored on an atom
//! - [`topology`] - Bonds and bond orders
//! - [`labels`] - Label specs and per-group registries with indexed names
//! - [`node`] - The tagged node variant and nested groups
//! - [`compound`] - The arena owning the whole tree and its bonds
//! - [`ids`] - Handle types
//!
//! ## Usage
//!
//! ```ignore
//! use polybuild::core::models::{atom::Atom, compound::Compound};
//!
//! let mut compound = Compound::new("CH2");
//! let root = compound.root();
//! let carbon = compound.add_atom(root, Atom::new("C", Point3::origin()), None)?;
//! assert_eq!(compound.get("C[0]"), Some(carbon));
//! ```

pub mod atom;
pub mod compound;
pub mod error;
pub mod ids;
pub mod labels;
pub mod node;
pub mod port;
pub mod topology;
