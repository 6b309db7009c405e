//! Shared "approximation pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! target function -> domain -> coefficients -> approximants -> samples -> ranking
//!
//! The subcommand handlers can then focus on presentation (printing, plotting, exports).

use crate::compare::grid::domain_points;
use crate::compare::{Comparison, run_comparison};
use crate::domain::{ApproxRunFile, RunConfig, SampleSet, Strategy};
use crate::error::AppError;
use crate::math::{EngineOptions, EvalOptions, PadeOptions, SeriesOptions, TargetFunction, evaluate};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub target: TargetFunction,
    pub domain: Vec<f64>,
    pub comparison: Comparison,
}

impl RunOutput {
    pub fn sample_sets(&self) -> Vec<SampleSet> {
        self.comparison.results.iter().map(|r| r.samples.clone()).collect()
    }
}

/// Engine tolerances taken from the run configuration.
pub fn engine_options(config: &RunConfig) -> EngineOptions {
    EngineOptions {
        series: SeriesOptions {
            max_numeric_order: config.max_numeric_order,
        },
        pade: PadeOptions {
            singular_rcond: config.singular_rcond,
        },
        eval: EvalOptions {
            pole_tol: config.pole_tol,
        },
    }
}

/// The callable the engine differentiates and compares against.
pub fn target_function(config: &RunConfig) -> TargetFunction {
    match config.strategy {
        Strategy::ClosedForm => TargetFunction::closed_form(config.function),
        Strategy::Numeric => TargetFunction::numeric_from(config.function),
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Resolve the target and the evaluation grid.
    let target = target_function(config);
    let domain = domain_points(&config.domain)?;
    log::debug!(
        "Run: {} ({:?}) about a={} over {} points, requests={:?}",
        target.name(),
        config.strategy,
        config.center,
        domain.len(),
        config.requests
    );

    // 2) Coefficients, approximants, samples and ranking.
    let comparison = run_comparison(
        &target,
        config.center,
        &config.requests,
        &domain,
        &engine_options(config),
    )?;

    Ok(RunOutput {
        target,
        domain,
        comparison,
    })
}

/// Re-evaluate the approximants saved in `run` over its saved domain.
pub fn replay(run: &ApproxRunFile, pole_tol: f64) -> Result<Vec<SampleSet>, AppError> {
    let domain = domain_points(&run.domain)?;
    let truth = TargetFunction::closed_form(run.function);
    let opts = EvalOptions { pole_tol };
    opts.validate()?;
    Ok(run
        .approximants
        .iter()
        .map(|a| evaluate(a, &truth, &domain, &opts))
        .collect())
}
