//! SVG chart of the true function against its approximants.
//!
//! The chart is data-driven: bounds, series and labels are all computed before
//! drawing, so the render function only talks to Plotters.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::SampleSet;
use crate::error::AppError;

const PALETTE: [RGBColor; 6] = [
    RGBColor(214, 39, 40),
    RGBColor(31, 119, 180),
    RGBColor(44, 160, 44),
    RGBColor(255, 127, 14),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// What to draw and how.
pub struct SvgChart<'a> {
    pub title: String,
    pub truth_label: &'a str,
    pub sets: &'a [SampleSet],
    pub size: (u32, u32),
    /// Explicit y-range; derived from the true function otherwise.
    pub y_range: Option<(f64, f64)>,
    /// Label x ticks as multiples of π.
    pub trig_axis: bool,
}

/// Render `chart` to `path`.
pub fn write_svg(path: &Path, chart: &SvgChart<'_>) -> Result<(), AppError> {
    draw(path, chart)
        .map_err(|e| AppError::new(2, format!("Failed to render SVG '{}': {e}", path.display())))?;
    log::info!("Wrote SVG chart to {}", path.display());
    Ok(())
}

fn draw(path: &Path, spec: &SvgChart<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let truth: Vec<(f64, f64)> = spec.sets.first().map(SampleSet::truth_points).unwrap_or_default();
    let (x0, x1) = bounds(spec.sets.iter().flat_map(|s| s.samples.iter().map(|p| p.x))).unwrap_or((-1.0, 1.0));
    let (y0, y1) = match spec.y_range {
        Some((lo, hi)) if lo.is_finite() && hi.is_finite() && hi > lo => (lo, hi),
        _ => {
            let (lo, hi) = bounds(truth.iter().map(|&(_, y)| y)).unwrap_or((-1.0, 1.0));
            let pad = ((hi - lo) * 0.1).max(1e-9);
            (lo - pad, hi + pad)
        }
    };

    let root = SVGBackend::new(path, spec.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let fmt_x = |v: &f64| if spec.trig_axis { fmt_pi(*v) } else { format!("{v:.2}") };
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f(x)")
        .x_labels(9)
        .y_labels(9)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let in_range = |y: f64| y >= y0 && y <= y1;

    chart
        .draw_series(
            segments(truth.iter().map(|&(x, y)| in_range(y).then_some((x, y))))
                .into_iter()
                .map(|seg| PathElement::new(seg, BLACK.stroke_width(3))),
        )?
        .label(spec.truth_label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(3)));

    for (i, set) in spec.sets.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        // A pole or an off-chart value breaks the line.
        let points = set
            .samples
            .iter()
            .map(|s| s.approx.ok().filter(|&y| in_range(y)).map(|y| (s.x, y)));
        chart
            .draw_series(
                segments(points)
                    .into_iter()
                    .map(move |seg| PathElement::new(seg, color.stroke_width(2))),
            )?
            .label(set.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Split a sequence of optional points into runs of consecutive `Some`.
fn segments<I>(points: I) -> Vec<Vec<(f64, f64)>>
where
    I: IntoIterator<Item = Option<(f64, f64)>>,
{
    let mut out = Vec::new();
    let mut current = Vec::new();
    for p in points {
        match p {
            Some(p) => current.push(p),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn bounds<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo.is_finite() && hi > lo).then_some((lo, hi))
}

/// Tick label as a multiple of π (`-π`, `π/2`, `3π/4`); falls back to decimals.
pub fn fmt_pi(v: f64) -> String {
    let quarters = v / std::f64::consts::FRAC_PI_4;
    let n = quarters.round();
    if (quarters - n).abs() > 1e-6 {
        return format!("{v:.2}");
    }
    let n = n as i64;
    if n == 0 {
        return "0".to_string();
    }
    let (num, den) = reduce(n, 4);
    let sign = if num < 0 { "-" } else { "" };
    let num = num.abs();
    let head = if num == 1 { "π".to_string() } else { format!("{num}π") };
    if den == 1 { format!("{sign}{head}") } else { format!("{sign}{head}/{den}") }
}

fn reduce(num: i64, den: i64) -> (i64, i64) {
    let (mut a, mut b) = (num.abs(), den);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    (num / a, den / a)
}
