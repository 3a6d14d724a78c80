//! Configuration types for Taylor-Green lattice Boltzmann runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Mach-number guard: above this peak velocity the low-Mach expansion in the
/// equilibrium breaks down and runs tend to blow up.
const MAX_STABLE_VELOCITY: f64 = 0.1;

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Top-level simulation configuration.
///
/// Immutable for the duration of a run and passed by reference to every
/// component that needs lattice parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in nodes (X dimension).
    pub nx: usize,
    /// Grid height in nodes (Y dimension).
    pub ny: usize,
    /// Kinematic viscosity in lattice units.
    pub nu: f64,
    /// Peak velocity of the initial vortex.
    pub u_max: f64,
    /// Reference density.
    pub rho0: f64,
    /// Total number of timesteps.
    pub steps: u64,
    /// Write snapshots every N steps (0 disables).
    pub save_every: u64,
    /// Report progress every N steps (0 disables).
    pub message_every: u64,
    /// Suppress per-save and per-message console output.
    #[serde(default)]
    pub quiet: bool,
    /// Print energy and error norms at each message step.
    #[serde(default)]
    pub compute_flow_properties: bool,
    /// Directory receiving `.bin` snapshots.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nx: 32,
            ny: 32,
            nu: 1.0 / 6.0,
            u_max: 0.04,
            rho0: 1.0,
            steps: 200,
            save_every: 50,
            message_every: 50,
            quiet: false,
            compute_flow_properties: false,
            output_dir: default_output_dir(),
        }
    }
}

impl SimulationConfig {
    /// BGK relaxation time, `tau = 3 nu + 1/2`.
    #[inline]
    pub fn tau(&self) -> f64 {
        3.0 * self.nu + 0.5
    }

    /// Number of lattice nodes (`nx * ny`).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Whether the step that advances `n -> n + 1` should write snapshots.
    #[inline]
    pub fn is_save_step(&self, n: u64) -> bool {
        self.save_every != 0 && (n + 1) % self.save_every == 0
    }

    /// Whether the step that advances `n -> n + 1` should report progress.
    #[inline]
    pub fn is_message_step(&self, n: u64) -> bool {
        self.message_every != 0 && (n + 1) % self.message_every == 0
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        // Populations need nx * ny * 9 slots; every other buffer is smaller.
        if self
            .nx
            .checked_mul(self.ny)
            .and_then(|n| n.checked_mul(9))
            .is_none()
        {
            return Err(ConfigError::GridTooLarge {
                nx: self.nx,
                ny: self.ny,
            });
        }
        let tau = self.tau();
        if !(tau.is_finite() && tau > 0.5) {
            return Err(ConfigError::UnstableRelaxation { tau });
        }
        if !(self.rho0.is_finite() && self.rho0 > 0.0) {
            return Err(ConfigError::InvalidDensity(self.rho0));
        }
        if !self.u_max.is_finite() {
            return Err(ConfigError::InvalidVelocity(self.u_max));
        }
        if self.u_max.abs() > MAX_STABLE_VELOCITY {
            log::warn!(
                "u_max = {} exceeds {}; expect compressibility errors or divergence",
                self.u_max,
                MAX_STABLE_VELOCITY
            );
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (nx, ny) must be non-zero")]
    InvalidDimensions,
    #[error("Grid {nx}x{ny} is too large to address")]
    GridTooLarge { nx: usize, ny: usize },
    #[error("Relaxation time tau = {tau} must exceed 0.5 (viscosity must be positive)")]
    UnstableRelaxation { tau: f64 },
    #[error("Reference density must be finite and positive, got {0}")]
    InvalidDensity(f64),
    #[error("Peak velocity must be finite, got {0}")]
    InvalidVelocity(f64),
}
