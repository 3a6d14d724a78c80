//! Snapshot output for macroscopic fields.

mod snapshot;

pub use snapshot::*;
