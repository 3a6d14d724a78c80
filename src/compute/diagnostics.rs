//! Kinetic energy and error norms against the analytical solution.

use std::fmt;

use super::{MacroscopicFields, TaylorGreen};

/// Flow properties at a single timestep.
///
/// Error norms are `None` when the analytical reference has zero magnitude
/// for that quantity (e.g. `u_max = 0`), in which case the relative error is
/// undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowProperties {
    /// Total kinetic energy `sum rho |u|^2`.
    pub energy: f64,
    /// Relative L2 error in density perturbation.
    pub err_rho: Option<f64>,
    /// Relative L2 error in x velocity.
    pub err_ux: Option<f64>,
    /// Relative L2 error in y velocity.
    pub err_uy: Option<f64>,
}

impl FlowProperties {
    /// Compute energy and error norms for `fields` at timestep `t`.
    ///
    /// Read-only. Only meaningful when `fields` are current, i.e. after the
    /// initial fill or a step that saved moments. Panics if `fields` and
    /// `reference` were built for different lattices.
    pub fn compute(t: u64, fields: &MacroscopicFields, reference: &TaylorGreen) -> Self {
        let grid = fields.grid();
        assert_eq!(grid, reference.grid(), "field grid differs from the reference lattice");
        let rho0 = reference.rho0();

        let mut energy = 0.0;

        let mut sum_rho_err2 = 0.0;
        let mut sum_ux_err2 = 0.0;
        let mut sum_uy_err2 = 0.0;

        let mut sum_rho_ref2 = 0.0;
        let mut sum_ux_ref2 = 0.0;
        let mut sum_uy_ref2 = 0.0;

        for y in 0..grid.ny {
            for x in 0..grid.nx {
                let m = fields.get(x, y);
                energy += m.rho * (m.ux * m.ux + m.uy * m.uy);

                let a = reference.at(t, x, y);
                sum_rho_err2 += (m.rho - a.rho) * (m.rho - a.rho);
                sum_ux_err2 += (m.ux - a.ux) * (m.ux - a.ux);
                sum_uy_err2 += (m.uy - a.uy) * (m.uy - a.uy);

                sum_rho_ref2 += (a.rho - rho0) * (a.rho - rho0);
                sum_ux_ref2 += a.ux * a.ux;
                sum_uy_ref2 += a.uy * a.uy;
            }
        }

        Self {
            energy,
            err_rho: relative_l2(sum_rho_err2, sum_rho_ref2),
            err_ux: relative_l2(sum_ux_err2, sum_ux_ref2),
            err_uy: relative_l2(sum_uy_err2, sum_uy_ref2),
        }
    }

    /// CSV report line `t,E,err_rho,err_ux,err_uy`.
    pub fn csv_row(&self, t: u64) -> String {
        format!(
            "{},{},{},{},{}",
            t,
            self.energy,
            Norm(self.err_rho),
            Norm(self.err_ux),
            Norm(self.err_uy)
        )
    }
}

/// Free-function form of [`FlowProperties::compute`].
pub fn compute_flow_properties(
    t: u64,
    fields: &MacroscopicFields,
    reference: &TaylorGreen,
) -> FlowProperties {
    FlowProperties::compute(t, fields, reference)
}

#[inline]
fn relative_l2(err2: f64, ref2: f64) -> Option<f64> {
    (ref2 > 0.0).then(|| (err2 / ref2).sqrt())
}

struct Norm(Option<f64>);

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("undefined"),
        }
    }
}
