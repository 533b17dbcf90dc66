//! # Engine Module
//!
//! The composition engine: everything that turns loaded fragment geometry into
//! connected composites.
//!
//! ## Overview
//!
//! A fragment comes out of the template library with cut atoms still in place.
//! The engine converts those into oriented ports, decides which ports a build
//! may use, and joins fragments by bringing two ports together with a rigid
//! transform and bonding their anchors.
//!
//! ## Architecture
//!
//! - **Port Conversion** ([`convert`]) - Cut atoms become ports on their bonded partners
//! - **Fusion** ([`fusion`]) - Rigid alignment of two ports followed by bonding
//! - **Selection** ([`selection`]) - Substituent counts and port disambiguation, checked before any mutation
//! - **Configuration** ([`config`]) - Typed build options with builders
//! - **Error Handling** ([`error`]) - The error taxonomy shared by all builds

pub mod config;
pub mod convert;
pub mod error;
pub mod fusion;
pub mod selection;
