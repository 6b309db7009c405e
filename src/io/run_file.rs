//! Read/write approximation run JSON files.
//!
//! A run file is the portable representation of what was computed:
//! - target function + expansion point
//! - every approximant's coefficients
//! - the evaluation domain, so the samples can be rebuilt exactly
//!
//! The schema is defined by `domain::ApproxRunFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{Approximant, ApproxRunFile, DomainSpec, FunctionKind};
use crate::error::AppError;

pub const TOOL_NAME: &str = "approx";

pub fn build_run_file(
    function: FunctionKind,
    center: f64,
    domain: DomainSpec,
    approximants: Vec<Approximant>,
) -> ApproxRunFile {
    ApproxRunFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        function,
        center,
        domain,
        approximants,
    }
}

/// Write a run JSON file.
pub fn write_run_json(path: &Path, run: &ApproxRunFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create run JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, run)
        .map_err(|e| AppError::new(2, format!("Failed to write run JSON: {e}")))?;
    log::info!("Wrote run JSON to {}", path.display());
    Ok(())
}

/// Read a run JSON file.
pub fn read_run_json(path: &Path) -> Result<ApproxRunFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open run JSON '{}': {e}", path.display())))?;
    let run: ApproxRunFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid run JSON: {e}")))?;
    if run.approximants.is_empty() {
        return Err(AppError::new(2, "Run JSON contains no approximants."));
    }
    Ok(run)
}
