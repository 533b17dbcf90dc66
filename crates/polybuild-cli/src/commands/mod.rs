pub mod build;
pub mod fragments;
pub mod sequence;
