// src/grid.rs

/// Cubic finite-volume grid with ghost padding.
///
/// `n` interior cells per axis, `n_ghost` ghost cells on each side,
/// physical domain length `length`. The three axes are identical.
#[derive(Debug, Clone, Copy)]
pub struct Grid3D {
    pub n: usize,
    pub n_ghost: usize,
    pub length: f64,
}

impl Grid3D {
    /// Create a grid with n interior cells per axis and n_ghost ghost cells per side.
    pub fn new(n: usize, n_ghost: usize, length: f64) -> Self {
        Self { n, n_ghost, length }
    }

    /// Total cells per axis, ghost pad included: N = n + 2*n_ghost.
    pub fn n_total(&self) -> usize {
        self.n + 2 * self.n_ghost
    }

    /// Cell spacing dL = length / n.
    pub fn spacing(&self) -> f64 {
        self.length / self.n as f64
    }

    /// Cell-center coordinates along one axis, ghost cells included.
    ///
    /// A uniform sequence of `n_total()` values with spacing dL, running from
    /// -dL*(2*nG-1)/2 to length + dL*(2*nG-1)/2. The first interior center
    /// sits at dL/2. Same array for x, y and z (cubic domain).
    pub fn axis_coords(&self) -> Vec<f64> {
        let dl = self.spacing();
        let start = -dl * (2.0 * self.n_ghost as f64 - 1.0) / 2.0;
        (0..self.n_total()).map(|i| start + i as f64 * dl).collect()
    }

    /// Index of the mid-plane along any axis (N/2, rounding down).
    pub fn mid_plane(&self) -> usize {
        self.n_total() / 2
    }

    /// Cell shape (nz, ny, nx) for cell-centered storage.
    pub fn cell_shape(&self) -> (usize, usize, usize) {
        let n = self.n_total();
        (n, n, n)
    }
}
