//! D2Q9 lattice model and periodic grid storage.
//!
//! Direction numbering:
//!
//! ```text
//!     6   2   5
//!       \ | /
//!     3 - 0 - 1
//!       / | \
//!     7   4   8
//! ```
//!
//! The kernel and equilibrium both depend on this ordering.

use std::ops::{Index, IndexMut};

/// Number of discrete velocities.
pub const Q: usize = 9;

/// Number of moving (non-rest) directions.
pub const MOVING: usize = Q - 1;

/// Discrete velocity vectors.
pub const C: [[i32; 2]; Q] = [
    [0, 0],
    [1, 0],
    [0, 1],
    [-1, 0],
    [0, -1],
    [1, 1],
    [-1, 1],
    [-1, -1],
    [1, -1],
];

/// Rest weight.
pub const W0: f64 = 4.0 / 9.0;
/// Weight shared by the axis-aligned directions 1-4.
pub const WS: f64 = 1.0 / 9.0;
/// Weight shared by the diagonal directions 5-8.
pub const WD: f64 = 1.0 / 36.0;

/// Weights indexed by direction.
pub const W: [f64; Q] = [W0, WS, WS, WS, WS, WD, WD, WD, WD];

/// Velocity vector of direction `i`.
#[inline]
pub fn velocity(i: usize) -> [i32; 2] {
    C[i]
}

/// Weight of direction `i`.
#[inline]
pub fn weight(i: usize) -> f64 {
    W[i]
}

/// Periodic 2D grid geometry.
///
/// All storage is laid out with x as the outer index and y as the inner one,
/// so node `(x, y)` lives at `x * ny + y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
}

/// Periodic neighbor coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub xp1: usize,
    pub xm1: usize,
    pub yp1: usize,
    pub ym1: usize,
}

impl Grid {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    /// Total node count.
    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat node index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.nx && y < self.ny,
            "node ({}, {}) outside {}x{} grid",
            x,
            y,
            self.nx,
            self.ny
        );
        x * self.ny + y
    }

    /// Neighbor coordinates with toroidal wrap.
    #[inline]
    pub fn neighbors(&self, x: usize, y: usize) -> Neighbors {
        Neighbors {
            xp1: (x + 1) % self.nx,
            xm1: (self.nx + x - 1) % self.nx,
            yp1: (y + 1) % self.ny,
            ym1: (self.ny + y - 1) % self.ny,
        }
    }

    /// Node reached from `(x, y)` by a unit offset `(dx, dy)`, wrapping periodically.
    #[inline]
    pub fn offset(&self, x: usize, y: usize, dx: i32, dy: i32) -> (usize, usize) {
        let n = self.neighbors(x, y);
        let sx = match dx {
            1 => n.xp1,
            -1 => n.xm1,
            _ => x,
        };
        let sy = match dy {
            1 => n.yp1,
            -1 => n.ym1,
            _ => y,
        };
        (sx, sy)
    }

    /// Node whose direction-`i` population arrives at `(x, y)` this step.
    #[inline]
    pub fn upstream(&self, x: usize, y: usize, i: usize) -> (usize, usize) {
        let [cx, cy] = C[i];
        self.offset(x, y, -cx, -cy)
    }
}

/// One `f64` per node.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    grid: Grid,
    data: Vec<f64>,
}

impl ScalarField {
    /// Zero-initialized field.
    pub fn zeros(grid: Grid) -> Self {
        Self {
            grid,
            data: vec![0.0; grid.len()],
        }
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Checked lookup.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.grid.nx && y < self.grid.ny).then(|| self.data[x * self.grid.ny + y])
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.data.len() as f64
    }
}

impl Index<(usize, usize)> for ScalarField {
    type Output = f64;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &f64 {
        &self.data[self.grid.index(x, y)]
    }
}

impl IndexMut<(usize, usize)> for ScalarField {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f64 {
        let idx = self.grid.index(x, y);
        &mut self.data[idx]
    }
}

/// Moving populations (directions 1-8), eight per node.
///
/// The rest population streams onto itself and is kept in a separate
/// [`ScalarField`] that needs no second time slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationField {
    grid: Grid,
    data: Vec<f64>,
}

impl PopulationField {
    pub fn zeros(grid: Grid) -> Self {
        Self {
            grid,
            data: vec![0.0; grid.len() * MOVING],
        }
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Flat index of direction `i` (1-8) at `(x, y)`.
    #[inline]
    pub fn slot(&self, x: usize, y: usize, i: usize) -> usize {
        assert!((1..Q).contains(&i), "direction {} is not a moving direction", i);
        self.grid.index(x, y) * MOVING + (i - 1)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

impl Index<(usize, usize, usize)> for PopulationField {
    type Output = f64;

    #[inline]
    fn index(&self, (x, y, i): (usize, usize, usize)) -> &f64 {
        &self.data[self.slot(x, y, i)]
    }
}

impl IndexMut<(usize, usize, usize)> for PopulationField {
    #[inline]
    fn index_mut(&mut self, (x, y, i): (usize, usize, usize)) -> &mut f64 {
        let idx = self.slot(x, y, i);
        &mut self.data[idx]
    }
}

/// Density and velocity at a single node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub rho: f64,
    pub ux: f64,
    pub uy: f64,
}

/// Density and velocity fields.
///
/// Derived from the populations; only refreshed on steps that request a save.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroscopicFields {
    pub rho: ScalarField,
    pub ux: ScalarField,
    pub uy: ScalarField,
}

impl MacroscopicFields {
    pub fn zeros(grid: Grid) -> Self {
        Self {
            rho: ScalarField::zeros(grid),
            ux: ScalarField::zeros(grid),
            uy: ScalarField::zeros(grid),
        }
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.rho.grid()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Moments {
        Moments {
            rho: self.rho[(x, y)],
            ux: self.ux[(x, y)],
            uy: self.uy[(x, y)],
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, m: Moments) {
        self.rho[(x, y)] = m.rho;
        self.ux[(x, y)] = m.ux;
        self.uy[(x, y)] = m.uy;
    }

    /// Named views in snapshot order.
    pub fn named(&self) -> [(&'static str, &ScalarField); 3] {
        [("rho", &self.rho), ("ux", &self.ux), ("uy", &self.uy)]
    }
}
