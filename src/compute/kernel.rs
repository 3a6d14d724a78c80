//! Fused stream-collide-save kernel.
//!
//! One pass per timestep: pull the populations arriving at each node from its
//! periodic upstream neighbors, take moments, optionally store them, and relax
//! toward the local equilibrium. Nodes read only the previous slices and write
//! only their own slots of the next ones, so columns are processed in parallel.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::equilibrium::equilibrium;
use super::lattice::{Grid, MOVING, Q};
use super::{MacroscopicFields, PopulationField, ScalarField};

/// BGK relaxation coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxation {
    /// `1 / tau`
    pub tauinv: f64,
    /// `1 - 1 / tau`
    pub omtauinv: f64,
}

impl Relaxation {
    /// Coefficients for kinematic viscosity `nu` (`tau = 3 nu + 1/2`).
    pub fn from_viscosity(nu: f64) -> Self {
        let tauinv = 2.0 / (6.0 * nu + 1.0);
        Self {
            tauinv,
            omtauinv: 1.0 - tauinv,
        }
    }
}

/// Density collapsed to a non-positive or non-finite value.
///
/// When several nodes fail in the same step the one with the lowest `(x, y)`
/// is reported, independent of thread scheduling.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("density {rho} at node ({x}, {y})")]
pub struct NodeDivergence {
    pub x: usize,
    pub y: usize,
    pub rho: f64,
}

/// Input and output slices for a single x-column.
struct Column<'a> {
    x: usize,
    rest: &'a [f64],
    rest_next: &'a mut [f64],
    next: &'a mut [f64],
    rho: &'a mut [f64],
    ux: &'a mut [f64],
    uy: &'a mut [f64],
}

/// Advance the populations by one timestep.
///
/// Reads the populations of timestep `t` from `rest` and `current` and writes
/// those of `t + 1` to `rest_next` and `next`; inputs are never modified.
/// When `save` is set the moments of every node are written to `fields`,
/// otherwise `fields` is left untouched.
///
/// On divergence the output slots hold a partial update and must be
/// discarded, as must `fields` if `save` was set. On success the caller
/// swaps both pairs of buffers.
pub fn stream_collide_save(
    relaxation: Relaxation,
    rest: &ScalarField,
    rest_next: &mut ScalarField,
    current: &PopulationField,
    next: &mut PopulationField,
    fields: &mut MacroscopicFields,
    save: bool,
) -> Result<(), NodeDivergence> {
    let grid = current.grid();
    assert_eq!(next.grid(), grid, "population buffers differ in shape");
    assert_eq!(rest.grid(), grid, "rest field grid mismatch");
    assert_eq!(rest_next.grid(), grid, "rest field grid mismatch");
    assert_eq!(fields.grid(), grid, "macroscopic field grid mismatch");

    let ny = grid.ny;
    let current = current.as_slice();
    let MacroscopicFields { rho, ux, uy } = fields;

    // Every column runs to completion, so the reported node does not depend
    // on which worker fails first.
    #[cfg(not(target_arch = "wasm32"))]
    let failure = next
        .as_mut_slice()
        .par_chunks_mut(ny * MOVING)
        .zip(rest.as_slice().par_chunks(ny))
        .zip(rest_next.as_mut_slice().par_chunks_mut(ny))
        .zip(rho.as_mut_slice().par_chunks_mut(ny))
        .zip(ux.as_mut_slice().par_chunks_mut(ny))
        .zip(uy.as_mut_slice().par_chunks_mut(ny))
        .enumerate()
        .filter_map(|(x, (((((next, rest), rest_next), rho), ux), uy))| {
            let column = Column {
                x,
                rest,
                rest_next,
                next,
                rho,
                ux,
                uy,
            };
            collide_column(grid, relaxation, current, column, save).err()
        })
        .min_by_key(|e| (e.x, e.y));

    // WASM: same per-column update, sequentially
    #[cfg(target_arch = "wasm32")]
    let failure = next
        .as_mut_slice()
        .chunks_mut(ny * MOVING)
        .zip(rest.as_slice().chunks(ny))
        .zip(rest_next.as_mut_slice().chunks_mut(ny))
        .zip(rho.as_mut_slice().chunks_mut(ny))
        .zip(ux.as_mut_slice().chunks_mut(ny))
        .zip(uy.as_mut_slice().chunks_mut(ny))
        .enumerate()
        .filter_map(|(x, (((((next, rest), rest_next), rho), ux), uy))| {
            let column = Column {
                x,
                rest,
                rest_next,
                next,
                rho,
                ux,
                uy,
            };
            collide_column(grid, relaxation, current, column, save).err()
        })
        .min_by_key(|e| (e.x, e.y));

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Update one column, stopping at its first divergent node.
#[inline]
fn collide_column(
    grid: Grid,
    relaxation: Relaxation,
    current: &[f64],
    column: Column<'_>,
    save: bool,
) -> Result<(), NodeDivergence> {
    let Relaxation { tauinv, omtauinv } = relaxation;
    let ny = grid.ny;
    let x = column.x;
    let load = |sx: usize, sy: usize, i: usize| current[(sx * ny + sy) * MOVING + i - 1];

    for y in 0..ny {
        let n = grid.neighbors(x, y);

        // Pull each population from the node it left last step (position - c_i).
        let ft: [f64; Q] = [
            column.rest[y],
            load(n.xm1, y, 1),
            load(x, n.ym1, 2),
            load(n.xp1, y, 3),
            load(x, n.yp1, 4),
            load(n.xm1, n.ym1, 5),
            load(n.xp1, n.ym1, 6),
            load(n.xp1, n.yp1, 7),
            load(n.xm1, n.yp1, 8),
        ];

        let rho: f64 = ft.iter().sum();
        if !(rho > 0.0 && rho.is_finite()) {
            return Err(NodeDivergence { x, y, rho });
        }
        let rhoinv = 1.0 / rho;
        let ux = rhoinv * (ft[1] + ft[5] + ft[8] - (ft[3] + ft[6] + ft[7]));
        let uy = rhoinv * (ft[2] + ft[5] + ft[6] - (ft[4] + ft[7] + ft[8]));

        if save {
            column.rho[y] = rho;
            column.ux[y] = ux;
            column.uy[y] = uy;
        }

        let feq = equilibrium(rho, ux, uy);
        column.rest_next[y] = omtauinv * ft[0] + tauinv * feq[0];
        let out = &mut column.next[y * MOVING..(y + 1) * MOVING];
        for i in 1..Q {
            out[i - 1] = omtauinv * ft[i] + tauinv * feq[i];
        }
    }

    Ok(())
}
