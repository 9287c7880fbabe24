// src/snapshot.rs
//
// Snapshot container for the rotor state: one file per integer time index,
// text header + little-endian binary f64 payloads.
//
// Layout:
//   # MHD snapshot 1.0
//   # Begin: Parameters          (scalar entries, one per line)
//   # End: Parameters
//   # Begin: Variables
//   <8-byte f64 check value>     (endianness guard, 123456789012345.0)
//   # Begin: Dataset <name> <count>
//   <count * 8 bytes>
//   # End: Dataset
//   ...
//   # End: Variables
//   # End: File
//
// Floats in the header use %.17e, which round-trips f64 exactly; binary
// payloads are bit-identical by construction.

use std::fs::{self, File, create_dir_all};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{SnapshotError, SnapshotResult};
use crate::field::{Axis, ScalarField3D, StaggeredField3D};
use crate::params::SimParams;

pub const SNAPSHOT_EXTENSION: &str = "snap";

const MAGIC: &str = "# MHD snapshot 1.0";
const CHECK_VALUE: f64 = 123456789012345.0;

/// One immutable capture of the full field state at a given time index.
///
/// Both magnetic representations are stored: the face-centered components
/// (`face_b*`, divergence-consistent storage) and their cell-centered
/// averages (`b*`, used by the renderer).
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub params: SimParams,
    pub density: ScalarField3D,
    pub velocity_x: ScalarField3D,
    pub velocity_y: ScalarField3D,
    pub velocity_z: ScalarField3D,
    pub thermal_pressure: ScalarField3D,
    pub face_bx: StaggeredField3D,
    pub face_by: StaggeredField3D,
    pub face_bz: StaggeredField3D,
    pub bx: ScalarField3D,
    pub by: ScalarField3D,
    pub bz: ScalarField3D,
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    Ok(())
}

/// Path of the snapshot for `index` inside `dir` (no IO).
pub fn snapshot_path(dir: &Path, index: i64) -> PathBuf {
    dir.join(format!("{}.{}", index, SNAPSHOT_EXTENSION))
}

/// Time index encoded in a snapshot file name, if the stem parses as a
/// base-10 integer. Files whose stem does not parse are not snapshots.
pub fn time_index(path: &Path) -> Option<i64> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Snapshot files in `dir`, ascending by time index. Files with the right
/// extension but a non-integer stem are silently skipped; listing order of
/// the directory is irrelevant.
pub fn sorted_snapshots(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found: Vec<(i64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
            continue;
        }
        if let Some(k) = time_index(&path) {
            found.push((k, path));
        }
    }
    found.sort_by_key(|&(k, _)| k);
    Ok(found.into_iter().map(|(_, p)| p).collect())
}

fn write_dataset<W: Write>(w: &mut W, name: &str, data: &[f64]) -> io::Result<()> {
    writeln!(w, "# Begin: Dataset {} {}", name, data.len())?;
    for v in data {
        w.write_all(&v.to_le_bytes())?;
    }
    writeln!(w)?;
    writeln!(w, "# End: Dataset")?;
    Ok(())
}

/// Serialize a snapshot, creating parent directories if needed.
///
/// Dataset names and order follow the reference container layout; all
/// payloads are flat row-major [z,y,x] f64 sequences.
pub fn write_snapshot(path: &Path, snap: &Snapshot) -> SnapshotResult<()> {
    let grid = snap.params.grid();
    let n = grid.n_total();
    let n_cell = n * n * n;
    let n_face = n * n * (n + 1);

    let cell_vars: [(&str, &ScalarField3D); 8] = [
        ("density", &snap.density),
        ("velocityX", &snap.velocity_x),
        ("velocityY", &snap.velocity_y),
        ("velocityZ", &snap.velocity_z),
        ("thermalPressure", &snap.thermal_pressure),
        ("magneticFieldX", &snap.bx),
        ("magneticFieldY", &snap.by),
        ("magneticFieldZ", &snap.bz),
    ];
    for (name, f) in &cell_vars {
        if f.data.len() != n_cell {
            return Err(SnapshotError::ShapeMismatch {
                name: (*name).to_string(),
                got: f.data.len(),
                expected: n_cell,
            });
        }
    }
    let face_vars: [(&str, &StaggeredField3D); 3] = [
        ("staggeredMagneticFieldX", &snap.face_bx),
        ("staggeredMagneticFieldY", &snap.face_by),
        ("staggeredMagneticFieldZ", &snap.face_bz),
    ];
    for (name, f) in &face_vars {
        if f.data.len() != n_face {
            return Err(SnapshotError::ShapeMismatch {
                name: (*name).to_string(),
                got: f.data.len(),
                expected: n_face,
            });
        }
    }

    ensure_parent_dir(path)?;
    let mut w = BufWriter::new(File::create(path)?);

    writeln!(w, "{}", MAGIC)?;
    writeln!(w, "# Begin: Parameters")?;
    writeln!(w, "# CFL: {:.17e}", snap.params.cfl)?;
    writeln!(w, "# evolutionTime: {:.17e}", snap.params.evolution_time)?;
    writeln!(w, "# numberOfCells: {}", snap.params.n_cells)?;
    writeln!(w, "# numberOfGhostCells: {}", snap.params.n_ghost)?;
    writeln!(w, "# domainLength: {:.17e}", snap.params.domain_length)?;
    writeln!(w, "# heatCapacityRatio: {:.17e}", snap.params.gamma)?;
    writeln!(w, "# End: Parameters")?;

    writeln!(w, "# Begin: Variables")?;
    w.write_all(&CHECK_VALUE.to_le_bytes())?;
    writeln!(w)?;

    write_dataset(&mut w, "density", &snap.density.data)?;
    write_dataset(&mut w, "velocityX", &snap.velocity_x.data)?;
    write_dataset(&mut w, "velocityY", &snap.velocity_y.data)?;
    write_dataset(&mut w, "velocityZ", &snap.velocity_z.data)?;
    write_dataset(&mut w, "thermalPressure", &snap.thermal_pressure.data)?;
    write_dataset(&mut w, "staggeredMagneticFieldX", &snap.face_bx.data)?;
    write_dataset(&mut w, "staggeredMagneticFieldY", &snap.face_by.data)?;
    write_dataset(&mut w, "staggeredMagneticFieldZ", &snap.face_bz.data)?;
    write_dataset(&mut w, "magneticFieldX", &snap.bx.data)?;
    write_dataset(&mut w, "magneticFieldY", &snap.by.data)?;
    write_dataset(&mut w, "magneticFieldZ", &snap.bz.data)?;

    writeln!(w, "# End: Variables")?;
    writeln!(w, "# End: File")?;
    w.flush()?;
    Ok(())
}

fn read_header_line<R: BufRead>(r: &mut R) -> SnapshotResult<String> {
    let mut line = String::new();
    let n = r.read_line(&mut line)?;
    if n == 0 {
        return Err(SnapshotError::MalformedHeader(
            "unexpected end of file".to_string(),
        ));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

fn expect_line<R: BufRead>(r: &mut R, expected: &str) -> SnapshotResult<()> {
    let line = read_header_line(r)?;
    if line != expected {
        return Err(SnapshotError::MalformedHeader(line));
    }
    Ok(())
}

struct ParamsBuilder {
    cfl: Option<f64>,
    evolution_time: Option<f64>,
    n_cells: Option<usize>,
    n_ghost: Option<usize>,
    domain_length: Option<f64>,
    gamma: Option<f64>,
}

impl ParamsBuilder {
    fn apply(&mut self, line: &str) -> SnapshotResult<()> {
        let body = line
            .strip_prefix("# ")
            .ok_or_else(|| SnapshotError::MalformedHeader(line.to_string()))?;
        let (key, value) = body
            .split_once(": ")
            .ok_or_else(|| SnapshotError::MalformedHeader(line.to_string()))?;
        let bad = || SnapshotError::MalformedHeader(line.to_string());
        match key {
            "CFL" => self.cfl = Some(value.parse().map_err(|_| bad())?),
            "evolutionTime" => self.evolution_time = Some(value.parse().map_err(|_| bad())?),
            "numberOfCells" => self.n_cells = Some(value.parse().map_err(|_| bad())?),
            "numberOfGhostCells" => self.n_ghost = Some(value.parse().map_err(|_| bad())?),
            "domainLength" => self.domain_length = Some(value.parse().map_err(|_| bad())?),
            "heatCapacityRatio" => self.gamma = Some(value.parse().map_err(|_| bad())?),
            _ => return Err(SnapshotError::MalformedHeader(line.to_string())),
        }
        Ok(())
    }

    fn finish(self) -> SnapshotResult<SimParams> {
        Ok(SimParams {
            cfl: self.cfl.ok_or(SnapshotError::MissingParameter("CFL"))?,
            evolution_time: self
                .evolution_time
                .ok_or(SnapshotError::MissingParameter("evolutionTime"))?,
            n_cells: self
                .n_cells
                .ok_or(SnapshotError::MissingParameter("numberOfCells"))?,
            n_ghost: self
                .n_ghost
                .ok_or(SnapshotError::MissingParameter("numberOfGhostCells"))?,
            domain_length: self
                .domain_length
                .ok_or(SnapshotError::MissingParameter("domainLength"))?,
            gamma: self
                .gamma
                .ok_or(SnapshotError::MissingParameter("heatCapacityRatio"))?,
        })
    }
}

fn read_f64<R: BufRead>(r: &mut R) -> SnapshotResult<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn take_dataset(
    datasets: &mut Vec<(String, Vec<f64>)>,
    name: &'static str,
    expected: usize,
) -> SnapshotResult<Vec<f64>> {
    let pos = datasets
        .iter()
        .position(|(n, _)| n == name)
        .ok_or(SnapshotError::MissingDataset(name))?;
    let (_, data) = datasets.swap_remove(pos);
    if data.len() != expected {
        return Err(SnapshotError::ShapeMismatch {
            name: name.to_string(),
            got: data.len(),
            expected,
        });
    }
    Ok(data)
}

/// Deserialize a snapshot written by `write_snapshot`.
pub fn read_snapshot(path: &Path) -> SnapshotResult<Snapshot> {
    let mut r = BufReader::new(File::open(path)?);

    let magic = read_header_line(&mut r)?;
    if magic != MAGIC {
        return Err(SnapshotError::BadMagic(magic));
    }

    expect_line(&mut r, "# Begin: Parameters")?;
    let mut builder = ParamsBuilder {
        cfl: None,
        evolution_time: None,
        n_cells: None,
        n_ghost: None,
        domain_length: None,
        gamma: None,
    };
    loop {
        let line = read_header_line(&mut r)?;
        if line == "# End: Parameters" {
            break;
        }
        builder.apply(&line)?;
    }
    let params = builder.finish()?;

    expect_line(&mut r, "# Begin: Variables")?;
    let check = read_f64(&mut r)?;
    if check.to_bits() != CHECK_VALUE.to_bits() {
        return Err(SnapshotError::BadCheckValue(check));
    }
    expect_line(&mut r, "")?;

    let mut datasets: Vec<(String, Vec<f64>)> = Vec::new();
    loop {
        let line = read_header_line(&mut r)?;
        if line == "# End: Variables" {
            break;
        }
        let rest = line
            .strip_prefix("# Begin: Dataset ")
            .ok_or_else(|| SnapshotError::MalformedHeader(line.clone()))?;
        let (name, count) = rest
            .rsplit_once(' ')
            .ok_or_else(|| SnapshotError::MalformedHeader(line.clone()))?;
        let count: usize = count
            .parse()
            .map_err(|_| SnapshotError::MalformedHeader(line.clone()))?;

        let mut data = Vec::with_capacity(count);
        for _ in 0..count {
            data.push(read_f64(&mut r)?);
        }
        expect_line(&mut r, "")?;
        expect_line(&mut r, "# End: Dataset")?;
        datasets.push((name.to_string(), data));
    }

    let grid = params.grid();
    let cells = grid.cell_shape();
    let n = grid.n_total();
    let n_cell = n * n * n;
    let n_face = n * n * (n + 1);

    let mut cell = |name| take_dataset(&mut datasets, name, n_cell);
    let density = ScalarField3D::from_flat(cells, cell("density")?);
    let velocity_x = ScalarField3D::from_flat(cells, cell("velocityX")?);
    let velocity_y = ScalarField3D::from_flat(cells, cell("velocityY")?);
    let velocity_z = ScalarField3D::from_flat(cells, cell("velocityZ")?);
    let thermal_pressure = ScalarField3D::from_flat(cells, cell("thermalPressure")?);
    let bx = ScalarField3D::from_flat(cells, cell("magneticFieldX")?);
    let by = ScalarField3D::from_flat(cells, cell("magneticFieldY")?);
    let bz = ScalarField3D::from_flat(cells, cell("magneticFieldZ")?);

    let face_bx = StaggeredField3D::from_flat(
        Axis::X,
        cells,
        take_dataset(&mut datasets, "staggeredMagneticFieldX", n_face)?,
    );
    let face_by = StaggeredField3D::from_flat(
        Axis::Y,
        cells,
        take_dataset(&mut datasets, "staggeredMagneticFieldY", n_face)?,
    );
    let face_bz = StaggeredField3D::from_flat(
        Axis::Z,
        cells,
        take_dataset(&mut datasets, "staggeredMagneticFieldZ", n_face)?,
    );

    Ok(Snapshot {
        params,
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
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial_state::build_initial_state;
    use std::fs;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mhd-rotor-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn time_index_parses_integer_stems_only() {
        assert_eq!(time_index(Path::new("data/0.snap")), Some(0));
        assert_eq!(time_index(Path::new("data/10.snap")), Some(10));
        assert_eq!(time_index(Path::new("data/-3.snap")), Some(-3));
        assert_eq!(time_index(Path::new("data/x.snap")), None);
        assert_eq!(time_index(Path::new("data/1a.snap")), None);
    }

    #[test]
    fn sorted_snapshots_orders_numerically_and_skips_junk() {
        let dir = temp_dir("sort");
        for name in ["10.snap", "2.snap", "1.snap", "x.snap", "readme.txt"] {
            fs::write(dir.join(name), b"junk").unwrap();
        }
        let files = sorted_snapshots(&dir).unwrap();
        let stems: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(stems, vec!["1.snap", "2.snap", "10.snap"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn round_trip_is_bit_identical() {
        let dir = temp_dir("roundtrip");
        let params = SimParams {
            n_cells: 4,
            n_ghost: 1,
            ..SimParams::default()
        };
        let snap = build_initial_state(&params);
        let path = snapshot_path(&dir, 0);
        write_snapshot(&path, &snap).unwrap();
        let back = read_snapshot(&path).unwrap();

        assert_eq!(back.params.cfl.to_bits(), snap.params.cfl.to_bits());
        assert_eq!(
            back.params.evolution_time.to_bits(),
            snap.params.evolution_time.to_bits()
        );
        assert_eq!(back.params.n_cells, snap.params.n_cells);
        assert_eq!(back.params.n_ghost, snap.params.n_ghost);
        assert_eq!(
            back.params.domain_length.to_bits(),
            snap.params.domain_length.to_bits()
        );
        assert_eq!(back.params.gamma.to_bits(), snap.params.gamma.to_bits());

        assert_eq!(back.density, snap.density);
        assert_eq!(back.velocity_x, snap.velocity_x);
        assert_eq!(back.velocity_y, snap.velocity_y);
        assert_eq!(back.velocity_z, snap.velocity_z);
        assert_eq!(back.thermal_pressure, snap.thermal_pressure);
        assert_eq!(back.face_bx, snap.face_bx);
        assert_eq!(back.face_by, snap.face_by);
        assert_eq!(back.face_bz, snap.face_bz);
        assert_eq!(back.bx, snap.bx);
        assert_eq!(back.by, snap.by);
        assert_eq!(back.bz, snap.bz);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn reading_junk_fails_with_bad_magic() {
        let dir = temp_dir("magic");
        let path = dir.join("0.snap");
        fs::write(&path, b"not a snapshot\n").unwrap();
        match read_snapshot(&path) {
            Err(SnapshotError::BadMagic(_)) => {}
            other => panic!("expected BadMagic, got {:?}", other.map(|_| ())),
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
