//! # Workflows Module
//!
//! Ready-made assembly recipes built on the engine.
//!
//! ## Overview
//!
//! Every recipe follows the same sequence: load fragments and convert their cut
//! atoms into ports, check the request (substituent counts, port choices,
//! labels that will be exposed), then fuse the pieces and expose whatever ports
//! remain open under stable top-level names. A request that fails its checks
//! returns an error before any compound is assembled.
//!
//! ## Recipes
//!
//! - **Fragments** ([`fragments`]) - Library fragments, alkanes, hydrogen caps, monatomic ions
//! - **Vinyl Monomers** ([`vinyl`]) - Ethylene, acrylamide and methacrylate repeat units
//! - **Ammonium** ([`ammonium`]) - Quaternary ammonium centres with alkyl or custom substituents
//! - **Zwitterions** ([`zwitterion`]) - CBMA, SBAA and SBMA
//! - **Coarse-Grained** ([`coarse`]) - Beads and the coarse-grained betaine
//! - **Sequences** ([`sequence`]) - Random copolymer sequences from a caller-supplied generator

pub mod ammonium;
pub mod coarse;
pub mod fragments;
pub mod sequence;
pub mod vinyl;
pub mod zwitterion;
