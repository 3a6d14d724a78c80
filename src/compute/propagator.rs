//! CPU Propagator - Main simulation driver for the Taylor-Green vortex.
//!
//! Owns the lattice buffers and advances them one kernel pass per step.

use crate::schema::{ConfigError, SimulationConfig};

use super::{
    FlowProperties, Grid, MacroscopicFields, NodeDivergence, PopulationField, Relaxation,
    ScalarField, TaylorGreen, init_equilibrium, stream_collide_save,
};

/// Simulation errors.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Numerical divergence at timestep {step}: non-positive or non-finite {source}")]
    Divergence {
        step: u64,
        #[source]
        source: NodeDivergence,
    },
}

/// Simulation state container.
///
/// The populations live in two named slots each; `rest`/`current` are read
/// and `rest_next`/`next` written during a step, then the slots are swapped.
/// A step that fails leaves `rest`, `current` and `step` as they were.
pub struct SimulationState {
    /// Rest population at the current timestep.
    pub rest: ScalarField,
    /// Scratch slot receiving the next rest population.
    rest_next: ScalarField,
    /// Moving populations at the current timestep.
    pub current: PopulationField,
    /// Scratch slot receiving the next timestep.
    next: PopulationField,
    /// Density and velocity as of the last saving step.
    pub fields: MacroscopicFields,
    /// Step count.
    pub step: u64,
}

impl SimulationState {
    /// Allocate zeroed buffers for `grid`.
    pub fn zeros(grid: Grid) -> Self {
        Self {
            rest: ScalarField::zeros(grid),
            rest_next: ScalarField::zeros(grid),
            current: PopulationField::zeros(grid),
            next: PopulationField::zeros(grid),
            fields: MacroscopicFields::zeros(grid),
            step: 0,
        }
    }

    /// Taylor-Green fields at t = 0 and their equilibrium populations.
    pub fn taylor_green(config: &SimulationConfig) -> Self {
        let mut state = Self::zeros(Grid::new(config.nx, config.ny));
        TaylorGreen::new(config).fill(0, &mut state.fields);
        init_equilibrium(&state.fields, &mut state.rest, &mut state.current);
        state
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.fields.grid()
    }

    /// Sum of all populations.
    pub fn total_mass(&self) -> f64 {
        self.rest.sum() + self.current.sum()
    }

    /// Bytes held by all buffers.
    pub fn allocated_bytes(&self) -> usize {
        let scalars = self.rest.as_slice().len()
            + self.rest_next.as_slice().len()
            + 3 * self.fields.rho.as_slice().len();
        let moving = self.current.as_slice().len() + self.next.as_slice().len();
        (scalars + moving) * std::mem::size_of::<f64>()
    }
}

/// CPU-based lattice Boltzmann propagator.
pub struct CpuPropagator {
    config: SimulationConfig,
    relaxation: Relaxation,
    reference: TaylorGreen,
}

impl CpuPropagator {
    /// Create new propagator from configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let relaxation = Relaxation::from_viscosity(config.nu);
        let reference = TaylorGreen::new(&config);
        log::info!(
            "{}x{} lattice, nu = {}, tau = {}, decay time = {:.1} steps",
            config.nx,
            config.ny,
            config.nu,
            config.tau(),
            reference.decay_time()
        );

        Ok(Self {
            config,
            relaxation,
            reference,
        })
    }

    /// Initial state for this configuration.
    pub fn initial_state(&self) -> SimulationState {
        SimulationState::taylor_green(&self.config)
    }

    /// Perform one simulation step, refreshing `state.fields` when `save` is set.
    ///
    /// On divergence the populations and step count are left at the last good
    /// timestep; `state.fields` may hold partial moments if `save` was set.
    pub fn step(&self, state: &mut SimulationState, save: bool) -> Result<(), SimulationError> {
        stream_collide_save(
            self.relaxation,
            &state.rest,
            &mut state.rest_next,
            &state.current,
            &mut state.next,
            &mut state.fields,
            save,
        )
        .map_err(|source| SimulationError::Divergence {
            step: state.step + 1,
            source,
        })?;

        // Swap slots (no allocation, just pointer swap)
        std::mem::swap(&mut state.rest, &mut state.rest_next);
        std::mem::swap(&mut state.current, &mut state.next);
        state.step += 1;
        Ok(())
    }

    /// Run simulation for specified number of steps, saving moments on the last one.
    pub fn run(&self, state: &mut SimulationState, steps: u64) -> Result<(), SimulationError> {
        for i in 0..steps {
            self.step(state, i + 1 == steps)?;
        }
        Ok(())
    }

    /// Energy and error norms of the state's macroscopic fields.
    pub fn flow_properties(&self, state: &SimulationState) -> FlowProperties {
        FlowProperties::compute(state.step, &state.fields, &self.reference)
    }

    /// Get configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Analytical reference solution.
    pub fn reference(&self) -> &TaylorGreen {
        &self.reference
    }
}
