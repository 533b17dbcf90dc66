//! # Core Module
//!
//! The stateless foundation of the library: the molecular graph model, the
//! rigid-body math used to align fragments, and the fragment template library.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Arena-backed compounds with atoms, ports, bonds and labels
//! - **Geometry** ([`utils`]) - Rigid transforms that bring one port onto another
//! - **Fragment Templates** ([`fragments`]) - TOML-defined rigid fragments and their loader

pub mod fragments;
pub mod models;
pub mod utils;
