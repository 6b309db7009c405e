//! Export evaluated samples to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per (approximant, x), undefined samples keep their row with empty values.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::SampleSet;
use crate::error::AppError;

/// Write every sample of every set to a CSV file.
pub fn write_samples_csv(path: &Path, sets: &[SampleSet]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_samples(&mut file, sets)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))?;
    log::info!("Wrote samples CSV to {}", path.display());
    Ok(())
}

fn write_samples<W: Write>(out: &mut W, sets: &[SampleSet]) -> std::io::Result<()> {
    writeln!(out, "label,x,approx,truth,abs_err,defined")?;
    for set in sets {
        for s in &set.samples {
            writeln!(
                out,
                "{},{:.12},{},{},{},{}",
                set.label,
                s.x,
                s.approx.map(|v| format!("{v:.12}")).unwrap_or_default(),
                fmt_opt(Some(s.truth)),
                fmt_opt(s.abs_err()),
                s.is_defined(),
            )?;
        }
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.12}"),
        _ => String::new(),
    }
}
