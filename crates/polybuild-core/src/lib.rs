//! # Polybuild Core Library
//!
//! A port-based composition engine for assembling polymer building blocks
//! (monomers, functional groups, coarse-grained beads) from small rigid
//! fragments.
//!
//! ## Architectural Philosophy
//!
//! The library is organised in three layers, leaves first.
//!
//! - **[`core`]: The Foundation.** Arena-backed molecular graphs with atoms,
//!   bonds, oriented ports and nested label namespaces; rigid-body alignment
//!   math; and the TOML fragment template library.
//!
//! - **[`engine`]: The Composition Engine.** Converts cut atoms into ports,
//!   fuses fragments port to port, validates build requests before anything is
//!   mutated, and defines the error taxonomy.
//!
//! - **[`workflows`]: The Public API.** Concrete assembly recipes (alkanes,
//!   vinyl monomers, ammonium centres, zwitterionic monomers, coarse-grained
//!   betaines, copolymer sequences) built from the engine.

pub mod core;
pub mod engine;
pub mod workflows;
