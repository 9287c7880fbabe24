// src/params.rs

use crate::grid::Grid3D;

/// Scalar simulation parameters carried by every snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub cfl: f64,            // CFL number (recorded for the evolver, unused here)
    pub evolution_time: f64, // physical time of the snapshot
    pub n_cells: usize,      // interior cells per axis
    pub n_ghost: usize,      // ghost cells per side
    pub domain_length: f64,  // physical domain length
    pub gamma: f64,          // heat-capacity ratio
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            cfl: 0.5,
            evolution_time: 0.0,
            n_cells: 64,
            n_ghost: 2,
            domain_length: 1.0,
            gamma: 5.0 / 3.0,
        }
    }
}

impl SimParams {
    /// Grid described by these parameters.
    pub fn grid(&self) -> Grid3D {
        Grid3D::new(self.n_cells, self.n_ghost, self.domain_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_setup() {
        let p = SimParams::default();
        assert_eq!(p.cfl, 0.5);
        assert_eq!(p.evolution_time, 0.0);
        assert_eq!(p.n_cells, 64);
        assert_eq!(p.n_ghost, 2);
        assert_eq!(p.domain_length, 1.0);
        assert!((p.gamma - 5.0 / 3.0).abs() < 1e-15);
        assert_eq!(p.grid().n_total(), 68);
    }
}
