//! Taylor-Green vortex decay with the D2Q9 lattice Boltzmann method.
//!
//! This crate implements a single-relaxation-time (BGK) lattice Boltzmann
//! solver on a fully periodic 2D grid, validated against the analytical
//! decaying Taylor-Green vortex.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration and validation
//! - `compute`: Numerical engine (lattice model, equilibrium, kernel,
//!   analytical solution, diagnostics, propagator)
//! - `io`: Raw binary snapshots of the macroscopic fields
//!
//! # Example
//!
//! ```rust,no_run
//! use tgv_lbm::{compute::CpuPropagator, schema::SimulationConfig};
//!
//! let config = SimulationConfig {
//!     nu: 0.01,
//!     u_max: 0.01,
//!     ..Default::default()
//! };
//!
//! let propagator = CpuPropagator::new(config)?;
//! let mut state = propagator.initial_state();
//! propagator.run(&mut state, 100)?;
//!
//! let props = propagator.flow_properties(&state);
//! println!("Kinetic energy after 100 steps: {}", props.energy);
//! # Ok::<(), tgv_lbm::compute::SimulationError>(())
//! ```

pub mod compute;
pub mod io;
pub mod schema;

// Re-export commonly used types
pub use compute::{CpuPropagator, FlowProperties, SimulationError, SimulationState};
pub use io::SnapshotWriter;
pub use schema::{ConfigError, SimulationConfig};
