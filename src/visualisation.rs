// src/visualisation.rs

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::snapshot::{read_snapshot, sorted_snapshots, Snapshot};

/// Output images are named FIGURE_PREFIX + source file name + ".png".
pub const FIGURE_PREFIX: &str = "fig";

/// Vector overlay sampling: every 4th grid point along each axis.
const QUIVER_STRIDE: usize = 4;

/// Fixed light color for the field arrows (readable on the heat ramp).
const ARROW_COLOR: RGBColor = RGBColor(176, 196, 222);

/// Min/max over finite values, with a *local* range so small variations are
/// still visible. Degenerate ranges (uniform field, all-NaN) are widened so
/// the color scale never collapses.
fn finite_min_max(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-12 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

/// Map a value in [lo, hi] onto a dark-violet-orange-yellow heat ramp.
fn value_to_color(v: f64, lo: f64, hi: f64) -> RGBColor {
    let (mut lo, mut hi) = (lo, hi);
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < 1e-12 {
        lo = 0.0;
        hi = 1.0;
    }
    let t = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);

    const ANCHORS: [(f64, (u8, u8, u8)); 5] = [
        (0.0, (0, 0, 4)),
        (0.25, (87, 16, 110)),
        (0.5, (188, 55, 84)),
        (0.75, (249, 142, 9)),
        (1.0, (252, 255, 164)),
    ];
    for w in ANCHORS.windows(2) {
        let (t0, c0) = w[0];
        let (t1, c1) = w[1];
        if t <= t1 {
            let s = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
            let lerp = |a: u8, b: u8| (a as f64 + s * (b as f64 - a as f64)).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    let (_, c) = ANCHORS[ANCHORS.len() - 1];
    RGBColor(c.0, c.1, c.2)
}

/// Vertical gradient bar with min/max labels and the field name.
fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    lo: f64,
    hi: f64,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (w, h) = area.dim_in_pixel();
    let x0 = 8;
    let x1 = (w as i32 - 46).max(x0 + 8);
    let top = 24;
    let bottom = (h as i32 - 44).max(top + 1);

    for i in top..bottom {
        // top row = hi, bottom row = lo
        let t = 1.0 - (i - top) as f64 / (bottom - top - 1).max(1) as f64;
        let v = lo + t * (hi - lo);
        area.draw(&Rectangle::new(
            [(x0, i), (x1, i + 1)],
            value_to_color(v, lo, hi).filled(),
        ))?;
    }
    area.draw(&Rectangle::new([(x0, top), (x1, bottom)], BLACK.stroke_width(1)))?;
    area.draw(&Text::new(
        format!("{:.3}", hi),
        (x0, top - 16),
        ("sans-serif", 12),
    ))?;
    area.draw(&Text::new(
        format!("{:.3}", lo),
        (x0, bottom + 4),
        ("sans-serif", 12),
    ))?;
    area.draw(&Text::new(
        label.to_string(),
        (x0, bottom + 20),
        ("sans-serif", 14),
    ))?;
    Ok(())
}

/// Arrow geometry (shaft + two head strokes) for the subsampled in-plane
/// field, in physical coordinates. One scale for the whole plane, chosen so
/// the longest arrow spans ~0.9 sampling intervals.
fn quiver_segments(
    l: &[f64],
    bx: &[f64],
    by: &[f64],
    n: usize,
    dl: f64,
) -> Vec<((f64, f64), (f64, f64))> {
    let mut max_mag: f64 = 0.0;
    for yj in (0..n).step_by(QUIVER_STRIDE) {
        for xi in (0..n).step_by(QUIVER_STRIDE) {
            let i = yj * n + xi;
            max_mag = max_mag.max(bx[i].hypot(by[i]));
        }
    }
    let mut segments = Vec::new();
    if max_mag <= 0.0 || !max_mag.is_finite() {
        return segments;
    }
    let scale = 0.9 * QUIVER_STRIDE as f64 * dl / max_mag;

    for yj in (0..n).step_by(QUIVER_STRIDE) {
        for xi in (0..n).step_by(QUIVER_STRIDE) {
            let i = yj * n + xi;
            let ux = bx[i] * scale;
            let uy = by[i] * scale;
            let len = ux.hypot(uy);
            if len == 0.0 {
                continue;
            }
            let tail = (l[xi] - 0.5 * ux, l[yj] - 0.5 * uy);
            let tip = (l[xi] + 0.5 * ux, l[yj] + 0.5 * uy);
            segments.push((tail, tip));

            let ang = uy.atan2(ux);
            let head = 0.3 * len;
            for da in [2.6, -2.6] {
                let end = (tip.0 + head * (ang + da).cos(), tip.1 + head * (ang + da).sin());
                segments.push((tip, end));
            }
        }
    }
    segments
}

/// Render one snapshot as a 2-panel figure (density, pressure) of the
/// mid-plane slice, ghost cells included, with the in-plane cell-centered
/// magnetic field overlaid on both panels.
pub fn render_snapshot(
    snap: &Snapshot,
    filename: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid = snap.params.grid();
    let n = grid.n_total();
    let k = grid.mid_plane();
    let l = grid.axis_coords();
    let dl = grid.spacing();

    let density = snap.density.z_slice(k);
    let pressure = snap.thermal_pressure.z_slice(k);
    let bx = snap.bx.z_slice(k);
    let by = snap.by.z_slice(k);
    let arrows = quiver_segments(&l, &bx, &by, n, dl);

    let root = BitMapBackend::new(filename, (1440, 650)).into_drawing_area();
    root.fill(&WHITE)?;
    let title = format!("MHD rotor test problem (nx=ny=nz={})", snap.params.n_cells);
    let root = root.titled(&title, ("sans-serif", 24))?;
    let panels = root.split_evenly((1, 2));

    let fields: [(&[f64], &str); 2] = [(&density, "Density"), (&pressure, "Pressure")];
    for (panel, (plane, label)) in panels.iter().zip(fields) {
        let (w, _) = panel.dim_in_pixel();
        let (chart_area, bar_area) = panel.split_horizontally(w as i32 - 90);

        let (lo, hi) = finite_min_max(plane);

        let mut chart = ChartBuilder::on(&chart_area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(l[0]..l[n - 1], l[0]..l[n - 1])?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("x")
            .y_desc("y")
            .axis_desc_style(("sans-serif", 15))
            .draw()?;

        // One filled rectangle per cell, physical coordinates
        let l_ref = &l;
        chart.draw_series((0..n).flat_map(|yj| {
            (0..n).map(move |xi| {
                let color = value_to_color(plane[yj * n + xi], lo, hi);
                Rectangle::new(
                    [
                        (l_ref[xi] - 0.5 * dl, l_ref[yj] - 0.5 * dl),
                        (l_ref[xi] + 0.5 * dl, l_ref[yj] + 0.5 * dl),
                    ],
                    color.filled(),
                )
            })
        }))?;

        chart.draw_series(
            arrows
                .iter()
                .map(|&(a, b)| PathElement::new(vec![a, b], ARROW_COLOR.stroke_width(1))),
        )?;

        draw_colorbar(&bar_area, lo, hi, label)?;
    }

    root.present()?;
    Ok(())
}

/// Render every snapshot in `dir`, ascending by time index, one PNG per
/// snapshot written next to its source. Returns the written image paths.
/// The first malformed snapshot aborts the batch.
pub fn render_directory(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut written = Vec::new();
    for path in sorted_snapshots(dir)? {
        let snap = read_snapshot(&path)?;
        let source = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("snapshot");
        let out = dir.join(format!("{}{}.png", FIGURE_PREFIX, source));
        render_snapshot(&snap, &out)?;
        written.push(out);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_ramp_covers_both_endpoints() {
        let lo_color = value_to_color(0.0, 0.0, 1.0);
        let hi_color = value_to_color(1.0, 0.0, 1.0);
        assert_eq!((lo_color.0, lo_color.1, lo_color.2), (0, 0, 4));
        assert_eq!((hi_color.0, hi_color.1, hi_color.2), (252, 255, 164));
        // Out-of-range values clamp instead of wrapping
        let below = value_to_color(-5.0, 0.0, 1.0);
        assert_eq!((below.0, below.1, below.2), (0, 0, 4));
    }

    #[test]
    fn finite_min_max_widens_degenerate_ranges() {
        // Uniform plane (e.g. pressure at t=0) must not collapse the scale
        let (lo, hi) = finite_min_max(&[1.0, 1.0, 1.0]);
        assert!(hi > lo);
        let (lo, hi) = finite_min_max(&[f64::NAN, f64::NAN]);
        assert!((lo, hi) == (0.0, 1.0));
    }

    #[test]
    fn quiver_skips_zero_fields_and_scales_to_stride() {
        let n = 8;
        let l: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let zeros = vec![0.0; n * n];
        assert!(quiver_segments(&l, &zeros, &zeros, n, 1.0).is_empty());

        let bx = vec![2.0; n * n];
        let by = vec![0.0; n * n];
        let segments = quiver_segments(&l, &bx, &by, n, 1.0);
        assert!(!segments.is_empty());
        // Every shaft is at most 0.9 * stride * dl long
        let max_len = segments
            .iter()
            .map(|&((x0, y0), (x1, y1))| (x1 - x0).hypot(y1 - y0))
            .fold(0.0f64, f64::max);
        assert!(max_len <= 0.9 * QUIVER_STRIDE as f64 + 1e-12);
    }
}
