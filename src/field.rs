// src/field.rs
//
// Cell-centered and face-centered (staggered) field storage.
//
// Conventions:
// - Flat row-major [z,y,x] storage: x is the fastest index.
// - Cell-centered fields have one sample per grid cell.
// - A staggered component has N+1 samples along its own axis (faces between
//   cells) and N along the other two. The two representations are kept as
//   distinct types; `StaggeredField3D::cell_centred` is the only bridge.

/// Cartesian axis of a staggered component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Scalar field sampled at cell centers, shape (nz, ny, nx).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField3D {
    pub nz: usize,
    pub ny: usize,
    pub nx: usize,
    pub data: Vec<f64>,
}

impl ScalarField3D {
    /// Zero-filled field with the given (nz, ny, nx) shape.
    pub fn zeros(shape: (usize, usize, usize)) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Constant-filled field with the given (nz, ny, nx) shape.
    pub fn filled(shape: (usize, usize, usize), value: f64) -> Self {
        let (nz, ny, nx) = shape;
        Self {
            nz,
            ny,
            nx,
            data: vec![value; nz * ny * nx],
        }
    }

    /// Rebuild a field from flat row-major data and a known shape.
    pub fn from_flat(shape: (usize, usize, usize), data: Vec<f64>) -> Self {
        let (nz, ny, nx) = shape;
        assert_eq!(data.len(), nz * ny * nx, "flat length does not match shape");
        Self { nz, ny, nx, data }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }

    /// Flat index for (z, y, x).
    #[inline]
    pub fn idx(&self, z: usize, y: usize, x: usize) -> usize {
        debug_assert!(z < self.nz && y < self.ny && x < self.nx);
        (z * self.ny + y) * self.nx + x
    }

    #[inline]
    pub fn get(&self, z: usize, y: usize, x: usize) -> f64 {
        self.data[self.idx(z, y, x)]
    }

    #[inline]
    pub fn set(&mut self, z: usize, y: usize, x: usize, value: f64) {
        let i = self.idx(z, y, x);
        self.data[i] = value;
    }

    /// Copy of the z = k plane, flat [y,x] order, length ny*nx.
    pub fn z_slice(&self, k: usize) -> Vec<f64> {
        assert!(k < self.nz, "slice index {} out of range ({})", k, self.nz);
        let plane = self.ny * self.nx;
        self.data[k * plane..(k + 1) * plane].to_vec()
    }
}

/// One Cartesian component of a face-centered vector field.
///
/// The component lives on the faces normal to `axis`: nominal cell count
/// (n, n, n) becomes (n, n, n+1) for X, (n, n+1, n) for Y, (n+1, n, n) for Z.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggeredField3D {
    pub axis: Axis,
    pub nz: usize,
    pub ny: usize,
    pub nx: usize,
    pub data: Vec<f64>,
}

impl StaggeredField3D {
    /// Staggered shape for a component along `axis` on a grid of
    /// (nz, ny, nx) cells.
    pub fn staggered_shape(axis: Axis, cells: (usize, usize, usize)) -> (usize, usize, usize) {
        let (nz, ny, nx) = cells;
        match axis {
            Axis::X => (nz, ny, nx + 1),
            Axis::Y => (nz, ny + 1, nx),
            Axis::Z => (nz + 1, ny, nx),
        }
    }

    /// Zero-filled component for a grid of (nz, ny, nx) cells.
    pub fn zeros(axis: Axis, cells: (usize, usize, usize)) -> Self {
        Self::filled(axis, cells, 0.0)
    }

    /// Constant-filled component: every face sample takes `value`.
    pub fn filled(axis: Axis, cells: (usize, usize, usize), value: f64) -> Self {
        let (nz, ny, nx) = Self::staggered_shape(axis, cells);
        Self {
            axis,
            nz,
            ny,
            nx,
            data: vec![value; nz * ny * nx],
        }
    }

    /// Rebuild a component from flat row-major data and the cell count.
    pub fn from_flat(axis: Axis, cells: (usize, usize, usize), data: Vec<f64>) -> Self {
        let (nz, ny, nx) = Self::staggered_shape(axis, cells);
        assert_eq!(data.len(), nz * ny * nx, "flat length does not match shape");
        Self { axis, nz, ny, nx, data }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }

    /// Flat index for (z, y, x) in the staggered shape.
    #[inline]
    pub fn idx(&self, z: usize, y: usize, x: usize) -> usize {
        debug_assert!(z < self.nz && y < self.ny && x < self.nx);
        (z * self.ny + y) * self.nx + x
    }

    #[inline]
    pub fn get(&self, z: usize, y: usize, x: usize) -> f64 {
        self.data[self.idx(z, y, x)]
    }

    /// Cell-centered copy: arithmetic mean of the two bounding faces along
    /// the staggered axis, cell[i] = (face[i] + face[i+1]) / 2.
    pub fn cell_centred(&self) -> ScalarField3D {
        let cells = match self.axis {
            Axis::X => (self.nz, self.ny, self.nx - 1),
            Axis::Y => (self.nz, self.ny - 1, self.nx),
            Axis::Z => (self.nz - 1, self.ny, self.nx),
        };
        let (nz, ny, nx) = cells;
        let mut out = ScalarField3D::zeros(cells);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let (lo, hi) = match self.axis {
                        Axis::X => (self.get(z, y, x), self.get(z, y, x + 1)),
                        Axis::Y => (self.get(z, y, x), self.get(z, y + 1, x)),
                        Axis::Z => (self.get(z, y, x), self.get(z + 1, y, x)),
                    };
                    out.set(z, y, x, 0.5 * (lo + hi));
                }
            }
        }
        out
    }
}
