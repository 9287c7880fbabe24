// tests/validation.rs
//
// Integration-style validation tests for the rotor pipeline.
// Run with: cargo test
// Or only these tests: cargo test --test validation

use std::fs;
use std::path::PathBuf;

use mhd_rotor::field::{Axis, StaggeredField3D};
use mhd_rotor::grid::Grid3D;
use mhd_rotor::initial_state::{build_initial_state, ROTOR_RADIUS, TAPER_RADIUS};
use mhd_rotor::params::SimParams;
use mhd_rotor::snapshot::{read_snapshot, snapshot_path, sorted_snapshots, write_snapshot};

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "mhd-rotor-validation-{}-{}",
        tag,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn small_build_matches_the_reference_scenario() {
    // n=4, nG=1 -> N=6; all shapes follow; the far ghost corner is ambient.
    let params = SimParams {
        n_cells: 4,
        n_ghost: 1,
        ..SimParams::default()
    };
    let grid = params.grid();
    assert_eq!(grid.n_total(), 6);
    assert_eq!(grid.axis_coords().len(), 6);
    assert_eq!(grid.mid_plane(), 3);

    let snap = build_initial_state(&params);
    assert_eq!(snap.density.shape(), (6, 6, 6));
    assert_eq!(snap.velocity_x.shape(), (6, 6, 6));
    assert_eq!(snap.thermal_pressure.shape(), (6, 6, 6));
    assert_eq!(snap.face_bx.shape(), (6, 6, 7));
    assert_eq!(snap.face_by.shape(), (6, 7, 6));
    assert_eq!(snap.face_bz.shape(), (7, 6, 6));

    // Far ghost corner sits at radius ~0.88, deep in the ambient medium
    assert_eq!(snap.density.get(0, 0, 0), 1.0);
    assert_eq!(snap.velocity_x.get(0, 0, 0), 0.0);
    assert_eq!(snap.velocity_y.get(0, 0, 0), 0.0);
}

#[test]
fn rotor_core_is_dense_once_cells_resolve_it() {
    // At n=32 the cell centers nearest the axis sit at radius ~0.022 < r0.
    let params = SimParams {
        n_cells: 32,
        ..SimParams::default()
    };
    let snap = build_initial_state(&params);
    let grid = params.grid();
    let l = grid.axis_coords();
    let mid = grid.mid_plane();

    let r_mid = ((l[mid] - 0.5).powi(2) * 2.0).sqrt();
    assert!(
        r_mid < ROTOR_RADIUS,
        "test premise: nearest center inside the rotor (r={})",
        r_mid
    );
    assert_eq!(snap.density.get(mid, mid, mid), 10.0);

    // And the ambient region is untouched
    assert_eq!(snap.density.get(0, 0, 0), 1.0);
    assert!(TAPER_RADIUS < 0.5, "band stays inside the domain");
}

#[test]
fn staggered_averaging_holds_for_every_interior_cell() {
    // Deterministic non-uniform face data; the cell value must be the mean
    // of its two bounding faces along the staggered axis, everywhere.
    let cells = (5, 5, 5);
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        let mut f = StaggeredField3D::zeros(axis, cells);
        for (i, v) in f.data.iter_mut().enumerate() {
            *v = (i as f64 * 0.37).sin();
        }
        let c = f.cell_centred();
        assert_eq!(c.shape(), cells);
        for z in 0..c.nz {
            for y in 0..c.ny {
                for x in 0..c.nx {
                    let (lo, hi) = match axis {
                        Axis::X => (f.get(z, y, x), f.get(z, y, x + 1)),
                        Axis::Y => (f.get(z, y, x), f.get(z, y + 1, x)),
                        Axis::Z => (f.get(z, y, x), f.get(z + 1, y, x)),
                    };
                    assert!(
                        approx_eq(c.get(z, y, x), 0.5 * (lo + hi), 1e-15),
                        "axis {:?}, cell ({},{},{})",
                        axis,
                        z,
                        y,
                        x
                    );
                }
            }
        }
    }
}

#[test]
fn write_scan_read_pipeline_keeps_time_order_and_data() {
    let dir = temp_dir("pipeline");
    let params = SimParams {
        n_cells: 4,
        n_ghost: 1,
        ..SimParams::default()
    };
    let snap = build_initial_state(&params);

    // Out-of-order writes plus a file the scan must ignore
    for index in [10, 2, 1] {
        write_snapshot(&snapshot_path(&dir, index), &snap).unwrap();
    }
    fs::write(dir.join("x.snap"), b"junk").unwrap();

    let files = sorted_snapshots(&dir).unwrap();
    let stems: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(stems, vec!["1.snap", "2.snap", "10.snap"]);

    // Every listed snapshot deserializes back to the built state
    for path in &files {
        let back = read_snapshot(path).unwrap();
        assert_eq!(back.params.n_cells, 4);
        assert_eq!(back.params.n_ghost, 1);
        assert_eq!(back.density, snap.density);
        assert_eq!(back.face_bx, snap.face_bx);
        assert_eq!(back.bx, snap.bx);
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn grid_metadata_reconstructs_identically_after_a_round_trip() {
    let dir = temp_dir("grid-meta");
    let params = SimParams {
        n_cells: 8,
        n_ghost: 2,
        domain_length: 2.0,
        ..SimParams::default()
    };
    let snap = build_initial_state(&params);
    let path = snapshot_path(&dir, 0);
    write_snapshot(&path, &snap).unwrap();
    let back = read_snapshot(&path).unwrap();

    let a = params.grid();
    let b = back.params.grid();
    assert_eq!(a.n_total(), b.n_total());
    assert_eq!(a.spacing().to_bits(), b.spacing().to_bits());
    assert_eq!(
        Grid3D::new(8, 2, 2.0).axis_coords(),
        b.axis_coords(),
        "renderer-side coordinates must match builder-side coordinates"
    );
    let _ = fs::remove_dir_all(&dir);
}
