//! Schema module - Configuration types for lattice Boltzmann runs.

mod config;

pub use config::*;
