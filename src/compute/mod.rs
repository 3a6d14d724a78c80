//! Compute module - Numerical engine for the D2Q9 lattice Boltzmann method.

mod diagnostics;
mod equilibrium;
mod kernel;
mod lattice;
mod performance;
mod propagator;
mod taylor_green;

pub use diagnostics::*;
pub use equilibrium::*;
pub use kernel::*;
pub use lattice::*;
pub use performance::*;
pub use propagator::*;
pub use taylor_green::*;
