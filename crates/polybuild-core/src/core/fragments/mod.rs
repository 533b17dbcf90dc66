//! Rigid fragment templates.
//!
//! Fragments are described as data (atoms, bonds and optional explicit ports)
//! in TOML documents keyed by fragment name. A built-in library is embedded at
//! compile time; user libraries are loaded from disk and can extend or shadow
//! it. Atoms whose name matches the library's sentinel mark cut points that the
//! engine turns into ports.

pub mod library;
pub mod template;

/// Atom name marking a cut point in fragment geometry.
pub const DEFAULT_SENTINEL: &str = "NO";
