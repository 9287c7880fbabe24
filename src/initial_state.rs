// src/initial_state.rs
//
// Rotor initial condition: a dense, rigidly rotating disk blended into a
// static ambient medium across a thin transition band, threaded by a uniform
// x-aligned magnetic field.
//
// Conventions:
// - The radial profile is 2D (distance from the rotation axis in the x-y
//   plane) and extruded uniformly along z, ghost cells included.
// - The magnetic field is built face-centered and averaged to cell centers
//   afterwards; both representations go into the snapshot.

use std::f64::consts::PI;

use crate::field::{Axis, ScalarField3D, StaggeredField3D};
use crate::grid::Grid3D;
use crate::params::SimParams;
use crate::snapshot::Snapshot;

/// Rotor radius: rigid rotation and density 10 inside.
pub const ROTOR_RADIUS: f64 = 0.1;
/// Outer edge of the transition band; ambient medium beyond.
pub const TAPER_RADIUS: f64 = 0.115;
/// Rim speed of the rotor at ROTOR_RADIUS.
pub const ROTOR_SPEED: f64 = 2.0;
/// Rotation axis position in the x-y plane.
pub const CENTRE: f64 = 0.5;

/// Linear taper weight across the transition band: 1 at ROTOR_RADIUS,
/// 0 at TAPER_RADIUS. Only meaningful for ROTOR_RADIUS <= r <= TAPER_RADIUS.
#[inline]
pub fn taper_weight(r: f64) -> f64 {
    (TAPER_RADIUS - r) / (TAPER_RADIUS - ROTOR_RADIUS)
}

/// Distance from the rotation axis in the x-y plane, per cell.
///
/// Independent of z: every z-plane carries the same values.
pub fn radial_distance(grid: &Grid3D) -> ScalarField3D {
    let l = grid.axis_coords();
    let mut r = ScalarField3D::zeros(grid.cell_shape());
    for z in 0..r.nz {
        for y in 0..r.ny {
            let dy = l[y] - CENTRE;
            for x in 0..r.nx {
                let dx = l[x] - CENTRE;
                r.set(z, y, x, (dx * dx + dy * dy).sqrt());
            }
        }
    }
    r
}

/// Piecewise rotor density: 10 inside the rotor, 1 + 9*taper in the band,
/// 1 in the ambient medium. Continuous at both band edges.
pub fn rotor_density(r: &ScalarField3D) -> ScalarField3D {
    let mut rho = ScalarField3D::zeros(r.shape());
    for (out, &ri) in rho.data.iter_mut().zip(r.data.iter()) {
        *out = if ri < ROTOR_RADIUS {
            10.0
        } else if ri <= TAPER_RADIUS {
            1.0 + 9.0 * taper_weight(ri)
        } else {
            1.0
        };
    }
    rho
}

/// Rigid-body rotation about (CENTRE, CENTRE) inside the rotor, tapered to
/// rest across the transition band, static outside. velocity_z is zero
/// everywhere. Returns (velocity_x, velocity_y, velocity_z).
pub fn rotor_velocity(
    grid: &Grid3D,
    r: &ScalarField3D,
) -> (ScalarField3D, ScalarField3D, ScalarField3D) {
    let l = grid.axis_coords();
    let omega = ROTOR_SPEED / ROTOR_RADIUS; // angular rate of the rigid disk
    let mut vx = ScalarField3D::zeros(grid.cell_shape());
    let mut vy = ScalarField3D::zeros(grid.cell_shape());
    let vz = ScalarField3D::zeros(grid.cell_shape());

    for z in 0..vx.nz {
        for y in 0..vx.ny {
            for x in 0..vx.nx {
                let ri = r.get(z, y, x);
                let scale = if ri < ROTOR_RADIUS {
                    1.0
                } else if ri <= TAPER_RADIUS {
                    taper_weight(ri)
                } else {
                    0.0
                };
                vx.set(z, y, x, scale * omega * (CENTRE - l[y]));
                vy.set(z, y, x, scale * omega * (l[x] - CENTRE));
            }
        }
    }
    (vx, vy, vz)
}

/// Build the complete t = 0 rotor state for the given parameters.
///
/// Thermal pressure is uniform 1. The magnetic field is uniform along x with
/// magnitude 5/sqrt(4*pi), stored on faces; the cell-centered copies are the
/// face averages.
pub fn build_initial_state(params: &SimParams) -> Snapshot {
    let grid = params.grid();
    let cells = grid.cell_shape();

    let r = radial_distance(&grid);
    let density = rotor_density(&r);
    let (velocity_x, velocity_y, velocity_z) = rotor_velocity(&grid, &r);
    let thermal_pressure = ScalarField3D::filled(cells, 1.0);

    let b0 = 5.0 / (4.0 * PI).sqrt();
    let face_bx = StaggeredField3D::filled(Axis::X, cells, b0);
    let face_by = StaggeredField3D::zeros(Axis::Y, cells);
    let face_bz = StaggeredField3D::zeros(Axis::Z, cells);

    let bx = face_bx.cell_centred();
    let by = face_by.cell_centred();
    let bz = face_bz.cell_centred();

    Snapshot {
        params: *params,
        density,
        velocity_x,
        velocity_y,
        velocity_z,
        thermal_pressure,
        face_bx,
        face_by,
        face_bz,
        bx,
        by,
        bz,
    }
}
