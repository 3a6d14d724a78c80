//! Analytical decaying Taylor-Green vortex.
//!
//! Used both to seed the initial fields and as ground truth for the error
//! norms, so both paths go through [`TaylorGreen::at`].

use std::f64::consts::PI;

use super::{Grid, MacroscopicFields, Moments};
use crate::schema::SimulationConfig;

/// Closed-form Taylor-Green solution for one lattice configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaylorGreen {
    grid: Grid,
    kx: f64,
    ky: f64,
    /// Velocity decay time `1 / (nu (kx^2 + ky^2))`.
    td: f64,
    u_max: f64,
    rho0: f64,
}

impl TaylorGreen {
    pub fn new(config: &SimulationConfig) -> Self {
        let kx = 2.0 * PI / config.nx as f64;
        let ky = 2.0 * PI / config.ny as f64;
        let td = 1.0 / (config.nu * (kx * kx + ky * ky));
        Self {
            grid: Grid::new(config.nx, config.ny),
            kx,
            ky,
            td,
            u_max: config.u_max,
            rho0: config.rho0,
        }
    }

    /// Lattice the wave numbers were built for.
    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Velocity decay time.
    #[inline]
    pub fn decay_time(&self) -> f64 {
        self.td
    }

    #[inline]
    pub fn rho0(&self) -> f64 {
        self.rho0
    }

    /// Exact solution at timestep `t` for node `(x, y)`, sampled at the cell center.
    pub fn at(&self, t: u64, x: usize, y: usize) -> Moments {
        let (kx, ky, td, u_max, rho0) = (self.kx, self.ky, self.td, self.u_max, self.rho0);
        let t = t as f64;

        let x = x as f64 + 0.5;
        let y = y as f64 + 0.5;
        let ux = -u_max * (ky / kx).sqrt() * (kx * x).cos() * (ky * y).sin() * (-t / td).exp();
        let uy = u_max * (kx / ky).sqrt() * (kx * x).sin() * (ky * y).cos() * (-t / td).exp();
        let p = -0.25
            * rho0
            * u_max
            * u_max
            * ((ky / kx) * (2.0 * kx * x).cos() + (kx / ky) * (2.0 * ky * y).cos())
            * (-2.0 * t / td).exp();

        Moments {
            rho: rho0 + 3.0 * p,
            ux,
            uy,
        }
    }

    /// Evaluate the solution at timestep `t` into every node of `fields`.
    pub fn fill(&self, t: u64, fields: &mut MacroscopicFields) {
        let grid = fields.grid();
        assert_eq!(grid, self.grid, "field grid differs from the reference lattice");
        for x in 0..grid.nx {
            for y in 0..grid.ny {
                fields.set(x, y, self.at(t, x, y));
            }
        }
    }
}
