//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - true function: `-` line
//! - approximants: one marker per sample (`*`, `o`, `+`, ...)
//! - poles of a rational approximant: `|` column

use crate::domain::SampleSet;

const MARKERS: [char; 6] = ['*', 'o', '+', 'x', '#', '@'];

/// Render the true function and every approximant in `sets`.
///
/// All sets are assumed to share one domain; the truth curve is taken from the first.
/// Points outside the y-range (explicit or derived from the truth) are not drawn.
pub fn render_ascii_plot(
    sets: &[SampleSet],
    truth_label: &str,
    width: usize,
    height: usize,
    y_range: Option<(f64, f64)>,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let truth: Vec<(f64, f64)> = sets.first().map(SampleSet::truth_points).unwrap_or_default();
    let (x_min, x_max) = x_range(sets).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = match y_range {
        Some((lo, hi)) if lo.is_finite() && hi.is_finite() && hi > lo => (lo, hi),
        _ => {
            let (lo, hi) = value_range(&truth)
                .or_else(|| value_range(&sets.iter().flat_map(SampleSet::approx_points).collect::<Vec<_>>()))
                .unwrap_or((0.0, 1.0));
            pad_range(lo, hi, 0.05)
        }
    };

    let mut grid = vec![vec![' '; width]; height];

    // Truth first so markers overlay it.
    draw_curve(&mut grid, &truth, x_min, x_max, y_min, y_max);

    let mut any_pole = false;
    for set in sets {
        for pole in set.undefined() {
            any_pole = true;
            let col = map_x(pole.x, x_min, x_max, width);
            for row in grid.iter_mut() {
                if row[col] == ' ' {
                    row[col] = '|';
                }
            }
        }
    }

    for (i, set) in sets.iter().enumerate() {
        let ch = MARKERS[i % MARKERS.len()];
        for (x, y) in set.approx_points() {
            if let Some(row) = map_y(y, y_min, y_max, height) {
                grid[row][map_x(x, x_min, x_max, width)] = ch;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&format!("Legend: - {truth_label}"));
    for (i, set) in sets.iter().enumerate() {
        out.push_str(&format!("  {} {}", MARKERS[i % MARKERS.len()], set.label));
    }
    if any_pole {
        out.push_str("  | pole");
    }
    out.push('\n');

    out
}

fn x_range(sets: &[SampleSet]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for s in sets.iter().flat_map(|set| set.samples.iter()) {
        min_x = min_x.min(s.x);
        max_x = max_x.max(s.x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn value_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

/// `None` when `y` falls outside `[y_min, y_max]`.
fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> Option<usize> {
    if !(y >= y_min && y <= y_max) {
        return None;
    }
    let height = height.max(2);
    let u = (y - y_min) / (y_max - y_min);
    // y=top is max -> row 0
    Some((height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize)
}

/// Connect consecutive in-range points; a point outside the range breaks the line.
fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let Some(row) = map_y(y, y_min, y_max, height) else {
            prev = None;
            continue;
        };
        let col = map_x(x, x_min, x_max, width);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
