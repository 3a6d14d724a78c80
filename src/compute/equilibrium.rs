//! BGK equilibrium distribution.
//!
//! feq_i = w_i rho [1 + 3(c_i.u) + 9/2 (c_i.u)^2 - 3/2 (u.u)]
//!       = w_i rho [1 - 3/2 (u.u) + t_i (1 + t_i / 2)],   t_i = 3 (c_i.u)
//!
//! The factored form is evaluated everywhere so initialization and collision
//! produce bit-identical equilibria.

use super::lattice::{C, Q, W};
use super::{MacroscopicFields, PopulationField, ScalarField};

/// Equilibrium populations for local density `rho` and velocity `(ux, uy)`.
#[inline]
pub fn equilibrium(rho: f64, ux: f64, uy: f64) -> [f64; Q] {
    let omusq = 1.0 - 1.5 * (ux * ux + uy * uy);
    let tux = 3.0 * ux;
    let tuy = 3.0 * uy;

    let mut feq = [0.0; Q];
    for (i, f) in feq.iter_mut().enumerate() {
        let [cx, cy] = C[i];
        let cidot3u = f64::from(cx) * tux + f64::from(cy) * tuy;
        *f = W[i] * rho * (omusq + cidot3u * (1.0 + 0.5 * cidot3u));
    }
    feq
}

/// Fill the rest and moving populations with the equilibrium of `fields`.
pub fn init_equilibrium(
    fields: &MacroscopicFields,
    rest: &mut ScalarField,
    populations: &mut PopulationField,
) {
    let grid = fields.grid();
    assert_eq!(rest.grid(), grid, "rest field grid mismatch");
    assert_eq!(populations.grid(), grid, "population field grid mismatch");

    let rho = fields.rho.as_slice();
    let ux = fields.ux.as_slice();
    let uy = fields.uy.as_slice();

    for ((node, r), f) in rest
        .as_mut_slice()
        .iter_mut()
        .enumerate()
        .zip(populations.as_mut_slice().chunks_exact_mut(Q - 1))
    {
        let feq = equilibrium(rho[node], ux[node], uy[node]);
        *r = feq[0];
        f.copy_from_slice(&feq[1..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Grid;
    use proptest::prelude::*;

    fn moments(f: &[f64; Q]) -> (f64, f64, f64) {
        let mut rho = 0.0;
        let mut jx = 0.0;
        let mut jy = 0.0;
        for (i, &fi) in f.iter().enumerate() {
            rho += fi;
            jx += f64::from(C[i][0]) * fi;
            jy += f64::from(C[i][1]) * fi;
        }
        (rho, jx, jy)
    }

    #[test]
    fn test_rest_state() {
        let feq = equilibrium(1.0, 0.0, 0.0);
        for i in 0..Q {
            assert_eq!(feq[i], W[i]);
        }
    }

    #[test]
    fn test_matches_expanded_formula() {
        let (rho, ux, uy) = (1.02, 0.03, -0.045);
        let feq = equilibrium(rho, ux, uy);
        let usq = ux * ux + uy * uy;
        for i in 0..Q {
            let cu = f64::from(C[i][0]) * ux + f64::from(C[i][1]) * uy;
            let expected = W[i] * rho * (1.0 + 3.0 * cu + 4.5 * cu * cu - 1.5 * usq);
            assert!(
                (feq[i] - expected).abs() < 1e-15,
                "direction {}: {} vs {}",
                i,
                feq[i],
                expected
            );
        }
    }

    #[test]
    fn test_opposite_directions_symmetric_at_rest() {
        let feq = equilibrium(0.9, 0.0, 0.0);
        assert_eq!(feq[1], feq[3]);
        assert_eq!(feq[2], feq[4]);
        assert_eq!(feq[5], feq[7]);
        assert_eq!(feq[6], feq[8]);
    }

    #[test]
    fn test_init_equilibrium_matches_direct_call() {
        let grid = Grid::new(5, 3);
        let mut fields = MacroscopicFields::zeros(grid);
        for x in 0..grid.nx {
            for y in 0..grid.ny {
                fields.rho[(x, y)] = 1.0 + 0.01 * (x + y) as f64;
                fields.ux[(x, y)] = 0.001 * x as f64;
                fields.uy[(x, y)] = -0.002 * y as f64;
            }
        }

        let mut rest = ScalarField::zeros(grid);
        let mut pops = PopulationField::zeros(grid);
        init_equilibrium(&fields, &mut rest, &mut pops);

        for x in 0..grid.nx {
            for y in 0..grid.ny {
                let feq = equilibrium(fields.rho[(x, y)], fields.ux[(x, y)], fields.uy[(x, y)]);
                assert_eq!(rest[(x, y)].to_bits(), feq[0].to_bits());
                for i in 1..Q {
                    assert_eq!(pops[(x, y, i)].to_bits(), feq[i].to_bits());
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_mass_conserved(
            rho in 0.5f64..1.5,
            ux in -0.1f64..0.1,
            uy in -0.1f64..0.1,
        ) {
            let (m, _, _) = moments(&equilibrium(rho, ux, uy));
            prop_assert!((m - rho).abs() < 1e-12 * rho);
        }

        #[test]
        fn prop_momentum_conserved(
            rho in 0.5f64..1.5,
            ux in -0.1f64..0.1,
            uy in -0.1f64..0.1,
        ) {
            let (m, jx, jy) = moments(&equilibrium(rho, ux, uy));
            prop_assert!((jx / m - ux).abs() < 1e-12);
            prop_assert!((jy / m - uy).abs() < 1e-12);
        }
    }
}
