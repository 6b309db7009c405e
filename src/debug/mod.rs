//! Debug bundle writer for inspecting coefficients and sample grids.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::{Approximant, RunConfig};
use crate::error::AppError;
use crate::report::fmt_vec;

/// Write a markdown bundle under `debug/` and return its path.
pub fn write_debug_bundle(config: &RunConfig, output: &RunOutput) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), config, output)
}

pub fn write_debug_bundle_in(dir: &Path, config: &RunConfig, output: &RunOutput) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(2, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!(
        "approx_debug_{}_a{}_{ts}.md",
        format!("{:?}", config.function).to_lowercase(),
        config.center
    ));

    let mut file =
        File::create(&path).map_err(|e| AppError::new(2, format!("Failed to create debug file: {e}")))?;
    write_bundle(&mut file, config, output)
        .map_err(|e| AppError::new(2, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn write_bundle<W: Write>(out: &mut W, config: &RunConfig, output: &RunOutput) -> std::io::Result<()> {
    let cmp = &output.comparison;

    writeln!(out, "# approx debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- function: {} ({:?})", output.target.name(), config.strategy)?;
    writeln!(out, "- center: {}", config.center)?;
    writeln!(
        out,
        "- domain: [{}, {}] x {} points",
        config.domain.x_min, config.domain.x_max, config.domain.points
    )?;
    writeln!(
        out,
        "- tolerances: singular_rcond={:e}, pole_tol={:e}, max_numeric_order={}",
        config.singular_rcond, config.pole_tol, config.max_numeric_order
    )?;

    writeln!(out, "\n## Taylor coefficients (N={})", cmp.taylor.order())?;
    writeln!(out, "| k | c_k |")?;
    writeln!(out, "| - | - |")?;
    for (k, c) in cmp.taylor.coeffs.iter().enumerate() {
        writeln!(out, "| {k} | {c:.17e} |")?;
    }

    writeln!(out, "\n## Approximants")?;
    writeln!(out, "| label | max_abs_err | rmse | defined | poles | coefficients |")?;
    writeln!(out, "| - | - | - | - | - | - |")?;
    for r in &cmp.results {
        let coeffs = match &r.approximant {
            Approximant::Taylor(seq) => fmt_vec(&seq.coeffs),
            Approximant::Pade(pade) => {
                format!("P={} Q={}", fmt_vec(&pade.numerator), fmt_vec(&pade.denominator))
            }
        };
        writeln!(
            out,
            "| {} | {:.6e} | {:.6e} | {} | {} | {} |",
            r.approximant.label(),
            r.quality.max_abs_err,
            r.quality.rmse,
            r.quality.n_defined,
            r.quality.n_undefined,
            coeffs
        )?;
    }
    for (request, reason) in &cmp.skipped {
        writeln!(out, "- skipped {request}: {reason}")?;
    }

    writeln!(out, "\n## Sample grid")?;
    write!(out, "| x | truth |")?;
    for r in &cmp.results {
        write!(out, " {} |", r.approximant.label())?;
    }
    writeln!(out)?;
    write!(out, "| - | - |")?;
    for _ in &cmp.results {
        write!(out, " - |")?;
    }
    writeln!(out)?;

    for (i, &x) in output.domain.iter().enumerate() {
        let truth = cmp.results.first().map(|r| r.samples.samples[i].truth);
        write!(out, "| {x:.6} | {} |", fmt_opt(truth))?;
        for r in &cmp.results {
            write!(out, " {} |", fmt_opt(r.samples.samples[i].approx.ok()))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline;
    use crate::domain::{ApproxRequest, DomainSpec, FunctionKind, Strategy};

    #[test]
    fn bundle_lists_coefficients_and_poles() {
        let config = RunConfig {
            function: FunctionKind::Exp,
            strategy: Strategy::ClosedForm,
            center: 0.0,
            requests: vec![ApproxRequest::Pade { p: 1, q: 1 }, ApproxRequest::Taylor { order: 2 }],
            domain: DomainSpec { x_min: 0.0, x_max: 4.0, points: 5 },
            singular_rcond: 1e-12,
            pole_tol: 1e-12,
            max_numeric_order: 10,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            y_range: None,
            trig_axis: false,
            svg: None,
            export_json: None,
            export_csv: None,
            debug_bundle: true,
        };
        let output = pipeline::run(&config).unwrap();

        let mut buf = Vec::new();
        write_bundle(&mut buf, &config, &output).unwrap();
        let md = String::from_utf8(buf).unwrap();

        assert!(md.contains("## Taylor coefficients (N=3)"));
        assert!(md.contains("| Pade [1/1] |"));
        // x = 2 is the pole of (1 + x/2) / (1 - x/2).
        assert!(md.contains("| 2.000000 | 7.389056 | - | 3.000000 |"), "{md}");

        let dir = std::env::temp_dir().join(format!("approx_debug_test_{}", std::process::id()));
        let path = write_debug_bundle_in(&dir, &config, &output).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let _ = std::fs::remove_dir_all(&dir);
        assert!(name.starts_with("approx_debug_exp_a0_"), "{name}");
    }
}
